use serde::{Deserialize, Serialize};
use std::fmt;

/// WHO UV index exposure bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvRisk {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvRisk {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UvRisk::Low => "Low",
            UvRisk::Moderate => "Moderate",
            UvRisk::High => "High",
            UvRisk::VeryHigh => "Very High",
            UvRisk::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for UvRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a UV index; each band's upper bound is inclusive
#[must_use]
pub fn classify_uv_risk(uv_index: f64) -> UvRisk {
    if uv_index <= 2.0 {
        UvRisk::Low
    } else if uv_index <= 5.0 {
        UvRisk::Moderate
    } else if uv_index <= 7.0 {
        UvRisk::High
    } else if uv_index <= 10.0 {
        UvRisk::VeryHigh
    } else {
        UvRisk::Extreme
    }
}
