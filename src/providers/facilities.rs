//! Simulated beach facilities and water quality
//!
//! Neither has a live data source yet; both are derived from the query text
//! so the same input always gives the same answer.

use serde::Serialize;
use std::fmt;

const MAX_FACILITIES: usize = 4;

/// Per-session state carried between lookups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    last_location: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the most recent query, lower-cased
    pub fn record_location(&mut self, location: &str) {
        self.last_location = Some(location.to_lowercase());
    }

    pub fn last_location(&self) -> Option<&str> {
        self.last_location.as_deref()
    }
}

/// Facilities for the last queried location, at most four
pub fn beach_facilities(session: &SessionContext) -> Vec<String> {
    let Some(location) = session.last_location() else {
        return Vec::new();
    };

    let mut facilities: Vec<&str> = Vec::new();
    if location.contains("beach") {
        facilities.extend(["Lifeguard", "First Aid", "Showers", "Restrooms"]);
    }
    if location.contains("goa") {
        facilities.extend(["Water Sports", "Beach Shacks"]);
    } else if location.contains("puri") {
        facilities.extend(["Changing Rooms", "Beach Chairs"]);
    }

    facilities.truncate(MAX_FACILITIES);
    facilities.into_iter().map(String::from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WaterQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl WaterQuality {
    const ALL: [WaterQuality; 4] = [
        WaterQuality::Excellent,
        WaterQuality::Good,
        WaterQuality::Fair,
        WaterQuality::Poor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WaterQuality::Excellent => "Excellent",
            WaterQuality::Good => "Good",
            WaterQuality::Fair => "Fair",
            WaterQuality::Poor => "Poor",
        }
    }

    pub fn is_swimmable(&self) -> bool {
        matches!(self, WaterQuality::Excellent | WaterQuality::Good)
    }

    pub fn advice(&self) -> &'static str {
        if self.is_swimmable() {
            "Safe for swimming"
        } else {
            "Check conditions"
        }
    }
}

impl fmt::Display for WaterQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Water quality varies with the location name and the local hour of day
pub fn water_quality(location: &str, hour: u32) -> WaterQuality {
    let index = (location.chars().count() + hour as usize) % WaterQuality::ALL.len();
    WaterQuality::ALL[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn session(location: &str) -> SessionContext {
        let mut session = SessionContext::new();
        session.record_location(location);
        session
    }

    #[test]
    fn test_no_session_no_facilities() {
        assert!(beach_facilities(&SessionContext::new()).is_empty());
    }

    #[test]
    fn test_beach_facilities_are_capped() {
        let facilities = beach_facilities(&session("Baga Beach, Goa"));
        assert_eq!(
            facilities,
            vec!["Lifeguard", "First Aid", "Showers", "Restrooms"]
        );
    }

    #[test]
    fn test_goa_without_beach() {
        assert_eq!(
            beach_facilities(&session("North GOA")),
            vec!["Water Sports", "Beach Shacks"]
        );
    }

    #[test]
    fn test_puri_without_beach() {
        assert_eq!(
            beach_facilities(&session("Puri")),
            vec!["Changing Rooms", "Beach Chairs"]
        );
    }

    #[test]
    fn test_unknown_location() {
        assert!(beach_facilities(&session("Shimla")).is_empty());
    }

    #[test]
    fn test_session_keeps_latest_location() {
        let mut session = session("Goa");
        session.record_location("Puri Beach");
        assert_eq!(session.last_location(), Some("puri beach"));
    }

    #[rstest]
    #[case("Goa", 0, WaterQuality::Poor)]
    #[case("Goa", 1, WaterQuality::Excellent)]
    #[case("Puri", 0, WaterQuality::Excellent)]
    #[case("Puri", 14, WaterQuality::Fair)]
    #[case("Puri Beach", 23, WaterQuality::Good)]
    fn test_water_quality(#[case] location: &str, #[case] hour: u32, #[case] expected: WaterQuality) {
        assert_eq!(water_quality(location, hour), expected);
    }

    #[test]
    fn test_water_quality_advice() {
        assert_eq!(WaterQuality::Excellent.advice(), "Safe for swimming");
        assert_eq!(WaterQuality::Good.advice(), "Safe for swimming");
        assert_eq!(WaterQuality::Fair.advice(), "Check conditions");
        assert_eq!(WaterQuality::Poor.advice(), "Check conditions");
    }
}
