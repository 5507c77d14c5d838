//! Data models for the BeachSafe application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and free-text queries
//! - Weather: Current weather observation and weather code descriptions
//! - Tide: Tide extremes and next high/low selection

pub mod location;
pub mod tide;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, LocationQuery, ResolvedLocation};
pub use tide::{TideEvent, TideKind, TideOutlook};
pub use weather::{TemperatureRange, WeatherObservation, classify_weather_code};
