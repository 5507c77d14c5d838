//! Great-circle distance between places

use haversine::{Location as HaversineLocation, Units, distance};
use tracing::debug;

use crate::models::{Coordinates, LocationQuery};
use crate::providers::{Geocoder, ProviderOutcome};

/// Air distance in kilometres.
///
/// An unresolved endpoint yields `0.0` so callers need no special case.
#[must_use]
pub fn estimate_great_circle_distance_km(
    origin: Option<Coordinates>,
    destination: Option<Coordinates>,
) -> f64 {
    let (Some(from), Some(to)) = (origin, destination) else {
        return 0.0;
    };

    distance(
        HaversineLocation {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        HaversineLocation {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        Units::Kilometers,
    )
}

/// Geocode two free-text places and estimate the flight distance between them
pub async fn estimate_flight_distance(
    geocoder: &dyn Geocoder,
    origin: &LocationQuery,
    destination: &LocationQuery,
) -> f64 {
    let origin_point = resolve_point(geocoder, origin).await;
    let destination_point = resolve_point(geocoder, destination).await;
    estimate_great_circle_distance_km(origin_point, destination_point)
}

async fn resolve_point(geocoder: &dyn Geocoder, query: &LocationQuery) -> Option<Coordinates> {
    match geocoder.resolve(query).await {
        ProviderOutcome::Ok(location) | ProviderOutcome::Fallback { value: location, .. } => {
            Some(location.coordinates())
        }
        ProviderOutcome::Error(reason) => {
            debug!("Could not resolve '{}' for distance: {}", query, reason);
            None
        }
    }
}
