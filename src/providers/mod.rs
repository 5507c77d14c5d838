//! External data providers
//!
//! Every provider is reached through a trait so the report assembler can be
//! driven by in-process fakes. Calls are single-attempt with a short timeout;
//! failures surface as [`ProviderOutcome::Fallback`] or
//! [`ProviderOutcome::Error`] instead of propagating.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::models::{Coordinates, LocationQuery, ResolvedLocation, TideOutlook, WeatherObservation};
use crate::text_stream::TextStream;

pub mod facilities;
pub mod geocoding;
pub mod open_meteo;
pub mod openai;
pub mod stormglass;

pub use facilities::{SessionContext, WaterQuality, beach_facilities, water_quality};
pub use geocoding::GoogleGeocoder;
pub use open_meteo::OpenMeteoWeather;
pub use openai::OpenAiTextGenerator;
pub use stormglass::StormGlassTides;

const USER_AGENT: &str = concat!("BeachSafe/", env!("CARGO_PKG_VERSION"));

/// Result of a provider call that distinguishes degraded data from failure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ProviderOutcome<T> {
    /// Fresh data from the provider
    Ok(T),
    /// The call failed and a static default stands in
    Fallback { value: T, reason: String },
    /// The call failed and there is nothing to substitute
    Error(String),
}

impl<T> ProviderOutcome<T> {
    /// Usable data, fresh or substituted
    pub fn value(&self) -> Option<&T> {
        match self {
            ProviderOutcome::Ok(value) | ProviderOutcome::Fallback { value, .. } => Some(value),
            ProviderOutcome::Error(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            ProviderOutcome::Ok(value) | ProviderOutcome::Fallback { value, .. } => Some(value),
            ProviderOutcome::Error(_) => None,
        }
    }

    /// Why the data is degraded or missing, `None` when fresh
    pub fn problem(&self) -> Option<&str> {
        match self {
            ProviderOutcome::Ok(_) => None,
            ProviderOutcome::Fallback { reason, .. } => Some(reason),
            ProviderOutcome::Error(message) => Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ProviderOutcome::Ok(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderOutcome<U> {
        match self {
            ProviderOutcome::Ok(value) => ProviderOutcome::Ok(f(value)),
            ProviderOutcome::Fallback { value, reason } => ProviderOutcome::Fallback {
                value: f(value),
                reason,
            },
            ProviderOutcome::Error(message) => ProviderOutcome::Error(message),
        }
    }
}

/// Free-text location to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, query: &LocationQuery) -> ProviderOutcome<ResolvedLocation>;
}

/// Current weather at a point; implementations fall back instead of failing
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, point: Coordinates) -> ProviderOutcome<WeatherObservation>;
}

/// Next high and low tide after `now`
#[async_trait]
pub trait TideProvider: Send + Sync {
    async fn fetch(&self, point: Coordinates, now: DateTime<Utc>) -> ProviderOutcome<TideOutlook>;
}

/// Language-model text generation, best effort
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: String, max_tokens: u32) -> Result<String>;

    async fn generate_stream(&self, prompt: String, max_tokens: u32) -> Result<TextStream>;
}

/// Build the shared HTTP client for one provider
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// Local HTTP stand-ins for the remote services
#[cfg(test)]
pub(crate) mod stub {
    use tokio::net::TcpListener;

    /// Serves `router` on an ephemeral port and returns its base URL
    pub async fn serve(router: axum::Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A base URL nothing is listening on
    pub async fn closed() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }
}
