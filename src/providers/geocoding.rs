//! Google Maps geocoding
//!
//! Queries are scoped to one country by appending it to the address, so
//! "Puri Beach" resolves within India rather than anywhere in the world.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::{Geocoder, ProviderOutcome, http_client};
use crate::cache::{ProviderCache, provider_cache};
use crate::config::BeachSafeConfig;
use crate::models::{LocationQuery, ResolvedLocation};

pub const MISSING_KEY: &str = "No Google Maps API key configured";

pub struct GoogleGeocoder {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    region: String,
    cache: ProviderCache<ResolvedLocation>,
}

impl GoogleGeocoder {
    pub fn new(config: &BeachSafeConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.geocoding.timeout())?,
            api_key: config.geocoding.api_key.clone(),
            base_url: config.geocoding.base_url.clone(),
            region: config.geocoding.region.clone(),
            cache: provider_cache(
                "geocoding",
                Duration::from_secs(config.cache.geocoding_ttl_seconds),
            ),
        })
    }

    #[instrument(skip(self, api_key), fields(region = %self.region))]
    async fn request(&self, query: &LocationQuery, api_key: &str) -> Result<ResolvedLocation> {
        let start_time = Instant::now();
        let address = format!("{}, {}", query, self.region);
        let url = format!(
            "{}?address={}&key={}",
            self.base_url,
            urlencoding::encode(&address),
            urlencoding::encode(api_key)
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            // the URL carries the API key
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Geocoding request failed for '{query}'"))?
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;

        let body: GeocodeResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        let location = body.into_location()?;
        info!(
            "Geocoded '{}' to {} ({}) in {:.3}s",
            query,
            location.formatted_address,
            location.format_coordinates(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(location)
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, query: &LocationQuery) -> ProviderOutcome<ResolvedLocation> {
        let Some(api_key) = self.api_key.as_deref() else {
            return ProviderOutcome::Error(MISSING_KEY.to_string());
        };

        if let Some(location) = self.cache.get(query.as_str()).await {
            debug!("Geocoding cache hit for '{}'", query);
            return ProviderOutcome::Ok(location);
        }

        match self.request(query, api_key).await {
            Ok(location) => {
                self.cache
                    .insert(query.as_str().to_string(), location.clone())
                    .await;
                ProviderOutcome::Ok(location)
            }
            Err(e) => {
                warn!("Geocoding error for '{}': {:#}", query, e);
                ProviderOutcome::Error(format!("Geocoding error: {e}"))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeResponse {
    /// Take the best (first) result
    fn into_location(self) -> Result<ResolvedLocation> {
        let status = self.status;
        let error_message = self.error_message;
        let first = self.results.into_iter().next().ok_or_else(|| match error_message {
            Some(message) => anyhow!("{status}: {message}"),
            None => anyhow!("{status}: no results"),
        })?;

        Ok(ResolvedLocation::new(
            first.geometry.location.lat,
            first.geometry.location.lng,
            first.formatted_address,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub;
    use axum::Router;
    use axum::extract::Query;
    use axum::routing::get;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_first_result_is_used() {
        let body = r#"{
            "results": [
                {
                    "formatted_address": "Puri Beach, Puri, Odisha 752001, India",
                    "geometry": { "location": { "lat": 19.7983, "lng": 85.8249 } }
                },
                {
                    "formatted_address": "Puri, Odisha, India",
                    "geometry": { "location": { "lat": 19.8135, "lng": 85.8312 } }
                }
            ],
            "status": "OK"
        }"#;

        let response: GeocodeResponse = serde_json::from_str(body).unwrap();
        let location = response.into_location().unwrap();
        assert_eq!(location.latitude, 19.7983);
        assert_eq!(location.longitude, 85.8249);
        assert_eq!(
            location.formatted_address,
            "Puri Beach, Puri, Odisha 752001, India"
        );
    }

    #[test]
    fn test_zero_results_is_an_error() {
        let body = r#"{ "results": [], "status": "ZERO_RESULTS" }"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();
        let err = response.into_location().unwrap_err();
        assert!(err.to_string().contains("ZERO_RESULTS"));
    }

    #[test]
    fn test_denied_request_reports_message() {
        let body = r#"{
            "results": [],
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;
        let response: GeocodeResponse = serde_json::from_str(body).unwrap();
        let err = response.into_location().unwrap_err();
        assert!(err.to_string().contains("API key is invalid"));
    }

    #[tokio::test]
    async fn test_missing_key_is_a_blocking_error() {
        let geocoder = GoogleGeocoder::new(&BeachSafeConfig::default()).unwrap();
        let query = LocationQuery::parse("Goa").unwrap();
        assert_eq!(
            geocoder.resolve(&query).await,
            ProviderOutcome::Error(MISSING_KEY.to_string())
        );
    }

    #[tokio::test]
    async fn test_query_is_scoped_to_region_and_cached() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();
        let router = Router::new().route(
            "/geocode",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push((params["address"].clone(), params["key"].clone()));
                    r#"{
                        "results": [{
                            "formatted_address": "Calangute Beach, Goa, India",
                            "geometry": { "location": { "lat": 15.5527, "lng": 73.7517 } }
                        }],
                        "status": "OK"
                    }"#
                }
            }),
        );

        let mut config = BeachSafeConfig::default();
        config.geocoding.api_key = Some("maps-test".to_string());
        config.geocoding.base_url = format!("{}/geocode", stub::serve(router).await);
        let geocoder = GoogleGeocoder::new(&config).unwrap();
        let query = LocationQuery::parse("Calangute Beach").unwrap();

        let first = geocoder.resolve(&query).await;
        assert_eq!(
            first.value().unwrap().formatted_address,
            "Calangute Beach, Goa, India"
        );
        assert_eq!(geocoder.resolve(&query).await, first);

        let received = received.lock().unwrap();
        assert_eq!(
            *received,
            vec![("Calangute Beach, India".to_string(), "maps-test".to_string())]
        );
    }
}
