//! General travel safety rating derived from the current weather

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rules::{Adjustment, ExclusiveGroup, Rule, evaluate};
use crate::models::WeatherObservation;

pub const BASE_SAFETY_SCORE: f64 = 8.0;
pub const MIN_SAFETY_SCORE: f64 = 0.0;
pub const MAX_SAFETY_SCORE: f64 = 10.0;

// Condition matching is case-sensitive.
const CONDITION_RULES: &[Rule<WeatherObservation, f64>] = &[
    Rule {
        name: "thunderstorm",
        applies: |w| w.conditions.contains("Thunderstorm"),
        delta: -4.0,
    },
    Rule {
        name: "rain",
        applies: |w| w.conditions.contains("Rain"),
        delta: -2.0,
    },
    Rule {
        name: "fog",
        applies: |w| w.conditions.contains("Fog"),
        delta: -1.0,
    },
];

const TEMPERATURE_RULES: &[Rule<WeatherObservation, f64>] = &[
    Rule {
        name: "extreme heat",
        applies: |w| w.temperature > 35.0,
        delta: -2.0,
    },
    Rule {
        name: "cold",
        applies: |w| w.temperature < 10.0,
        delta: -1.0,
    },
];

const WIND_RULES: &[Rule<WeatherObservation, f64>] = &[
    Rule {
        name: "gale",
        applies: |w| w.wind_speed_kmh > 30.0,
        delta: -3.0,
    },
    Rule {
        name: "strong wind",
        applies: |w| w.wind_speed_kmh > 20.0,
        delta: -1.0,
    },
];

const UV_RULES: &[Rule<WeatherObservation, f64>] = &[Rule {
    name: "very high uv",
    applies: |w| w.uv_index > 8.0,
    delta: -1.0,
}];

/// Deduction table for [`compute_safety_score`], in evaluation order
pub const SAFETY_RULES: &[ExclusiveGroup<WeatherObservation, f64>] = &[
    ExclusiveGroup {
        category: "conditions",
        rules: CONDITION_RULES,
    },
    ExclusiveGroup {
        category: "temperature",
        rules: TEMPERATURE_RULES,
    },
    ExclusiveGroup {
        category: "wind",
        rules: WIND_RULES,
    },
    ExclusiveGroup {
        category: "uv",
        rules: UV_RULES,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyLabel {
    VerySafe,
    Safe,
    CautionAdvised,
    NotRecommended,
}

impl SafetyLabel {
    /// Map a score to its label; thresholds are inclusive lower bounds
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            SafetyLabel::VerySafe
        } else if score >= 6.0 {
            SafetyLabel::Safe
        } else if score >= 4.0 {
            SafetyLabel::CautionAdvised
        } else {
            SafetyLabel::NotRecommended
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyLabel::VerySafe => "Very Safe",
            SafetyLabel::Safe => "Safe",
            SafetyLabel::CautionAdvised => "Caution Advised",
            SafetyLabel::NotRecommended => "Not Recommended",
        }
    }
}

impl fmt::Display for SafetyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyAssessment {
    /// Score in [0, 10], one decimal place
    pub score: f64,
    pub label: SafetyLabel,
    pub adjustments: Vec<Adjustment<f64>>,
}

impl SafetyAssessment {
    #[must_use]
    pub fn format_score(&self) -> String {
        format!("{:.1}/10", self.score)
    }
}

/// Rate how safe it is to visit given the current weather
#[must_use]
pub fn compute_safety_score(weather: &WeatherObservation) -> SafetyAssessment {
    let adjustments = evaluate(SAFETY_RULES, weather);
    let raw = BASE_SAFETY_SCORE + adjustments.iter().map(|a| a.delta).sum::<f64>();
    let score = round_to_tenth(raw).clamp(MIN_SAFETY_SCORE, MAX_SAFETY_SCORE);

    SafetyAssessment {
        score,
        label: SafetyLabel::from_score(score),
        adjustments,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
