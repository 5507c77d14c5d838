//! Current weather snapshot used by the scoring engine

use serde::{Deserialize, Serialize};

/// Today's temperature range
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    /// Highest temperature in Celsius
    pub high: f64,
    /// Lowest temperature in Celsius
    pub low: f64,
}

/// Immutable weather observation for one query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Current UV index
    pub uv_index: f64,
    /// Daily maximum UV index
    pub uv_index_max: f64,
    /// WMO weather code, absent for synthetic observations
    pub condition_code: Option<u16>,
    /// Human-readable description of weather conditions
    pub conditions: String,
    pub forecast: TemperatureRange,
}

impl WeatherObservation {
    /// Static observation substituted when the weather provider fails
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            temperature: 28.0,
            humidity: 65.0,
            wind_speed_kmh: 12.0,
            uv_index: 6.5,
            uv_index_max: 8.2,
            condition_code: None,
            conditions: "Sunny".to_string(),
            forecast: TemperatureRange {
                high: 32.0,
                low: 26.0,
            },
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature)
    }

    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} km/h", self.wind_speed_kmh)
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{:.0}%", self.humidity)
    }

    #[must_use]
    pub fn format_forecast(&self) -> String {
        format!(
            "High: {:.1}°C | Low: {:.1}°C",
            self.forecast.high, self.forecast.low
        )
    }
}

/// Convert an Open-Meteo weather code to its description.
///
/// Only the codes the dashboard has always shown are named; anything else
/// reads as unknown.
#[must_use]
pub fn classify_weather_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        51 => "Light drizzle",
        61 => "Light rain",
        80 => "Rain showers",
        95 => "Thunderstorm",
        _ => "Unknown weather conditions",
    }
}
