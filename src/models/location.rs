//! Location model for geographic coordinates and free-text queries

use serde::{Deserialize, Serialize};

use crate::BeachSafeError;

/// Words that mark a query as a beach destination
const BEACH_KEYWORDS: [&str; 4] = ["beach", "coast", "shore", "seaside"];

/// Plain latitude/longitude pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }

    /// Generate a cache key for data bound to this point
    #[must_use]
    pub fn cache_key(&self, namespace: &str) -> String {
        let (lat, lon) = self.rounded(4);
        format!("{namespace}:{lat:.4}:{lon:.4}")
    }
}

/// A geocoded location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Address as returned by the geocoder
    pub formatted_address: String,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, formatted_address: String) -> Self {
        Self {
            latitude,
            longitude,
            formatted_address,
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Free-text location typed by the user, trimmed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Parse user input, rejecting blank queries
    pub fn parse(input: &str) -> Result<Self, BeachSafeError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(BeachSafeError::validation("Please enter a location"));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the query names a beach or coastal destination
    #[must_use]
    pub fn is_beach(&self) -> bool {
        let lowered = self.0.to_lowercase();
        BEACH_KEYWORDS.iter().any(|kw| lowered.contains(kw))
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_cache_key() {
        let point = Coordinates::new(19.798_234, 85.824_956);
        assert_eq!(point.cache_key("weather"), "weather:19.7982:85.8250");
    }

    #[test]
    fn test_rounded_coordinates() {
        let point = Coordinates::new(15.818_234, 73.727_456);
        let (lat, lon) = point.rounded(2);
        assert_eq!(lat, 15.82);
        assert_eq!(lon, 73.73);
    }

    #[test]
    fn test_query_rejects_blank_input() {
        assert!(LocationQuery::parse("").is_err());
        assert!(LocationQuery::parse("   \t").is_err());
        assert_eq!(
            LocationQuery::parse("  Puri Beach, Odisha ").unwrap().as_str(),
            "Puri Beach, Odisha"
        );
    }

    #[test]
    fn test_beach_detection() {
        assert!(LocationQuery::parse("Puri Beach").unwrap().is_beach());
        assert!(LocationQuery::parse("Konkan COAST").unwrap().is_beach());
        assert!(LocationQuery::parse("Marina Seashore").unwrap().is_beach());
        assert!(LocationQuery::parse("Seaside Kovalam").unwrap().is_beach());
        assert!(!LocationQuery::parse("Jaipur").unwrap().is_beach());
    }
}
