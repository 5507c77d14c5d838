//! `BeachSafe` - Beach and travel safety analysis
//!
//! This library geocodes a destination, gathers weather and tide conditions,
//! scores how safe a visit is and produces packing and travel advice.

pub mod api;
pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod models;
pub mod providers;
pub mod recommendations;
pub mod render;
pub mod report;
pub mod scoring;
pub mod text_stream;
pub mod web;

// Re-export core types for public API
pub use config::BeachSafeConfig;
pub use error::BeachSafeError;
pub use models::{Coordinates, LocationQuery, ResolvedLocation, TideOutlook, WeatherObservation};
pub use providers::{ProviderOutcome, SessionContext};
pub use report::{AnalyzeRequest, BeachReport, GuideText, LocationReport, ReportAssembler};
pub use scoring::{SafetyAssessment, SafetyLabel, UvRisk, classify_uv_risk, compute_beach_safety_score, compute_safety_score};
pub use text_stream::{StreamEvent, TextStream};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, BeachSafeError>;
