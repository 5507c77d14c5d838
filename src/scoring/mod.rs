//! Safety scoring engine
//!
//! Pure functions turning weather, UV and beach signals into ratings:
//! - General safety rating (0-10, one decimal) with a label
//! - Beach safety score (integer, 1-10)
//! - UV risk band

pub mod beach;
pub mod rules;
pub mod safety;
pub mod uv;

pub use beach::{BeachSafetyAssessment, assess_beach_safety, compute_beach_safety_score};
pub use rules::{Adjustment, ExclusiveGroup, Rule};
pub use safety::{SafetyAssessment, SafetyLabel, compute_safety_score};
pub use uv::{UvRisk, classify_uv_risk};
