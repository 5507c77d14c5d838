//! Configuration management for the `BeachSafe` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::BeachSafeError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `BeachSafe` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeachSafeConfig {
    /// Geocoding provider configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Tide provider configuration
    #[serde(default)]
    pub tides: TidesConfig,
    /// Text generation configuration
    #[serde(default)]
    pub ai: AiConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Presentation settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Google Maps geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Google Maps API key, falls back to `GOOGLE_MAPS_API_KEY`
    pub api_key: Option<String>,
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Country appended to every query
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
}

/// Open-Meteo weather settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// Storm Glass tide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidesConfig {
    /// Storm Glass API key, falls back to `STORMGLASS_API_KEY`
    pub api_key: Option<String>,
    #[serde(default = "default_tides_base_url")]
    pub base_url: String,
    #[serde(default = "default_tides_timeout")]
    pub timeout_seconds: u32,
}

/// OpenAI-compatible chat completion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key, falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_packing_max_tokens")]
    pub packing_max_tokens: u32,
    #[serde(default = "default_guide_max_tokens")]
    pub guide_max_tokens: u32,
}

/// Cache TTLs in seconds, one per provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_geocoding_ttl")]
    pub geocoding_ttl_seconds: u64,
    #[serde(default = "default_weather_ttl")]
    pub weather_ttl_seconds: u64,
    #[serde(default = "default_tides_ttl")]
    pub tides_ttl_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// IANA time zone used to print tide times
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Port for `beachsafe serve`
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_region() -> String {
    "India".to_string()
}

fn default_geocoding_timeout() -> u32 {
    10
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    5
}

fn default_tides_base_url() -> String {
    "https://api.stormglass.io/v2".to_string()
}

fn default_tides_timeout() -> u32 {
    10
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_ai_timeout() -> u32 {
    30
}

fn default_packing_max_tokens() -> u32 {
    200
}

fn default_guide_max_tokens() -> u32 {
    700
}

fn default_geocoding_ttl() -> u64 {
    60 * 60
}

fn default_weather_ttl() -> u64 {
    30 * 60
}

fn default_tides_ttl() -> u64 {
    60 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_geocoding_base_url(),
            region: default_region(),
            timeout_seconds: default_geocoding_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for TidesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tides_base_url(),
            timeout_seconds: default_tides_timeout(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            timeout_seconds: default_ai_timeout(),
            packing_max_tokens: default_packing_max_tokens(),
            guide_max_tokens: default_guide_max_tokens(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            geocoding_ttl_seconds: default_geocoding_ttl(),
            weather_ttl_seconds: default_weather_ttl(),
            tides_ttl_seconds: default_tides_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            port: default_port(),
        }
    }
}

impl GeocodingConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl TidesConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl AiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl BeachSafeConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // BEACHSAFE_TIDES__API_KEY -> tides.api_key
        builder = builder.add_source(
            Environment::with_prefix("BEACHSAFE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: BeachSafeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.apply_conventional_keys();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("beachsafe").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.tides.base_url.is_empty() {
            self.tides.base_url = default_tides_base_url();
        }
        if self.tides.timeout_seconds == 0 {
            self.tides.timeout_seconds = default_tides_timeout();
        }
        if self.ai.base_url.is_empty() {
            self.ai.base_url = default_ai_base_url();
        }
        if self.ai.model.is_empty() {
            self.ai.model = default_ai_model();
        }
        if self.ai.timeout_seconds == 0 {
            self.ai.timeout_seconds = default_ai_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.display.timezone.is_empty() {
            self.display.timezone = default_timezone();
        }
    }

    /// Pick up the provider keys from their conventional variable names
    /// when the prefixed settings are absent
    pub fn apply_conventional_keys(&mut self) {
        fn from_env(slot: &mut Option<String>, var: &str) {
            if slot.is_none() {
                *slot = std::env::var(var).ok().filter(|v| !v.is_empty());
            }
        }

        from_env(&mut self.geocoding.api_key, "GOOGLE_MAPS_API_KEY");
        from_env(&mut self.tides.api_key, "STORMGLASS_API_KEY");
        from_env(&mut self.ai.api_key, "OPENAI_API_KEY");
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("Geocoding", &self.geocoding.api_key),
            ("Storm Glass", &self.tides.api_key),
            ("OpenAI", &self.ai.api_key),
        ];

        for (name, key) in keys {
            if let Some(key) = key {
                if key.trim().is_empty() {
                    return Err(BeachSafeError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if key.len() > 200 {
                    return Err(BeachSafeError::config(format!(
                        "{name} API key appears to be invalid (too long). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let timeouts = [
            ("Geocoding", self.geocoding.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
            ("Tides", self.tides.timeout_seconds),
        ];
        for (name, timeout) in timeouts {
            if timeout > 60 {
                return Err(BeachSafeError::config(format!(
                    "{name} API timeout cannot exceed 60 seconds"
                ))
                .into());
            }
        }

        if self.ai.timeout_seconds > 300 {
            return Err(
                BeachSafeError::config("AI API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.ai.packing_max_tokens == 0 || self.ai.guide_max_tokens == 0 {
            return Err(BeachSafeError::config("AI max tokens must be greater than zero").into());
        }

        let ttls = [
            ("Geocoding", self.cache.geocoding_ttl_seconds),
            ("Weather", self.cache.weather_ttl_seconds),
            ("Tides", self.cache.tides_ttl_seconds),
        ];
        for (name, ttl) in ttls {
            if ttl > 7 * 24 * 60 * 60 {
                return Err(BeachSafeError::config(format!(
                    "{name} cache TTL cannot exceed 1 week"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(BeachSafeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(BeachSafeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let urls = [
            ("Geocoding", &self.geocoding.base_url),
            ("Weather", &self.weather.base_url),
            ("Tides", &self.tides.base_url),
            ("AI", &self.ai.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(BeachSafeError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.display.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(BeachSafeError::config(format!(
                "Unknown display time zone '{}'",
                self.display.timezone
            ))
            .into());
        }

        Ok(())
    }
}
