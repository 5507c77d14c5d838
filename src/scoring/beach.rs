//! Beach-specific safety score
//!
//! Unlike the general rating this one is an integer and never drops below 1.

use serde::Serialize;

use super::rules::{Adjustment, ExclusiveGroup, Rule, evaluate};
use super::uv::{UvRisk, classify_uv_risk};

pub const BASE_BEACH_SCORE: i32 = 8;
pub const MIN_BEACH_SCORE: i32 = 1;
pub const MAX_BEACH_SCORE: i32 = 10;

/// Inputs to the beach score
#[derive(Debug, Clone, PartialEq)]
pub struct BeachConditions {
    pub uv_index: f64,
    /// Free-text hazard advisories, e.g. "Cyclone alert"
    pub hazards: Vec<String>,
    pub has_lifeguard: bool,
}

impl BeachConditions {
    fn any_hazard_mentions(&self, needle: &str) -> bool {
        self.hazards
            .iter()
            .any(|h| h.to_lowercase().contains(needle))
    }
}

const UV_RULES: &[Rule<BeachConditions, i32>] = &[
    Rule {
        name: "very high uv",
        applies: |c| c.uv_index > 8.0,
        delta: -2,
    },
    Rule {
        name: "high uv",
        applies: |c| c.uv_index > 5.0,
        delta: -1,
    },
];

const HAZARD_RULES: &[Rule<BeachConditions, i32>] = &[
    Rule {
        name: "tsunami",
        applies: |c| c.any_hazard_mentions("tsunami"),
        delta: -3,
    },
    Rule {
        name: "cyclone",
        applies: |c| c.any_hazard_mentions("cyclone"),
        delta: -2,
    },
];

const LIFEGUARD_RULES: &[Rule<BeachConditions, i32>] = &[Rule {
    name: "lifeguard on duty",
    applies: |c| c.has_lifeguard,
    delta: 1,
}];

pub const BEACH_RULES: &[ExclusiveGroup<BeachConditions, i32>] = &[
    ExclusiveGroup {
        category: "uv",
        rules: UV_RULES,
    },
    ExclusiveGroup {
        category: "hazards",
        rules: HAZARD_RULES,
    },
    ExclusiveGroup {
        category: "lifeguard",
        rules: LIFEGUARD_RULES,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeachSafetyAssessment {
    /// Score in [1, 10]
    pub score: i32,
    pub uv_risk: UvRisk,
    pub hazards: Vec<String>,
    pub has_lifeguard: bool,
    pub adjustments: Vec<Adjustment<i32>>,
}

/// Score a beach from UV exposure, hazard advisories and lifeguard presence
#[must_use]
pub fn compute_beach_safety_score<S: AsRef<str>>(
    uv_index: f64,
    hazards: &[S],
    has_lifeguard: bool,
) -> i32 {
    assess_beach_safety(uv_index, hazards, has_lifeguard).score
}

/// Same as [`compute_beach_safety_score`] with the fired rules and UV band attached
#[must_use]
pub fn assess_beach_safety<S: AsRef<str>>(
    uv_index: f64,
    hazards: &[S],
    has_lifeguard: bool,
) -> BeachSafetyAssessment {
    let conditions = BeachConditions {
        uv_index,
        hazards: hazards.iter().map(|h| h.as_ref().to_string()).collect(),
        has_lifeguard,
    };

    let adjustments = evaluate(BEACH_RULES, &conditions);
    let raw = BASE_BEACH_SCORE + adjustments.iter().map(|a| a.delta).sum::<i32>();

    BeachSafetyAssessment {
        score: raw.clamp(MIN_BEACH_SCORE, MAX_BEACH_SCORE),
        uv_risk: classify_uv_risk(uv_index),
        hazards: conditions.hazards,
        has_lifeguard,
        adjustments,
    }
}
