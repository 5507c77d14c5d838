//! Open-Meteo current weather
//!
//! No API key is required. Any transport or parse failure yields the static
//! fallback observation so scoring always has an input.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::{ProviderOutcome, WeatherProvider, http_client};
use crate::cache::{ProviderCache, provider_cache};
use crate::config::BeachSafeConfig;
use crate::models::{Coordinates, TemperatureRange, WeatherObservation, classify_weather_code};

/// Hours of the hourly series that make up "today"
const FORECAST_HOURS: usize = 24;

pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
    cache: ProviderCache<WeatherObservation>,
}

impl OpenMeteoWeather {
    pub fn new(config: &BeachSafeConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.weather.timeout())?,
            base_url: config.weather.base_url.clone(),
            cache: provider_cache("weather", Duration::from_secs(config.cache.weather_ttl_seconds)),
        })
    }

    #[instrument(skip(self), fields(lat = point.latitude, lon = point.longitude))]
    async fn request(&self, point: Coordinates) -> Result<WeatherObservation> {
        let start_time = Instant::now();
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current=temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code,uv_index&hourly=temperature_2m&daily=uv_index_max&timezone=auto",
            self.base_url, point.latitude, point.longitude
        );
        debug!("OpenMeteo API request URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| "OpenMeteo request failed")?
            .error_for_status()?;

        let body: ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenMeteo weather response")?;

        let observation = body.into_observation()?;
        info!(
            "Retrieved current weather in {:.3}s: {}",
            start_time.elapsed().as_secs_f64(),
            observation.conditions
        );
        Ok(observation)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeather {
    async fn fetch(&self, point: Coordinates) -> ProviderOutcome<WeatherObservation> {
        let key = point.cache_key("weather");
        if let Some(observation) = self.cache.get(&key).await {
            return ProviderOutcome::Ok(observation);
        }

        match self.request(point).await {
            Ok(observation) => {
                self.cache.insert(key, observation.clone()).await;
                ProviderOutcome::Ok(observation)
            }
            Err(e) => {
                warn!("Weather unavailable, using fallback: {:#}", e);
                ProviderOutcome::Fallback {
                    value: WeatherObservation::fallback(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentData,
    hourly: HourlyData,
    daily: DailyData,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: u16,
    uv_index: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyData {
    temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct DailyData {
    uv_index_max: Vec<Option<f64>>,
}

impl ForecastResponse {
    fn into_observation(self) -> Result<WeatherObservation> {
        let today: Vec<f64> = self
            .hourly
            .temperature_2m
            .iter()
            .take(FORECAST_HOURS)
            .flatten()
            .copied()
            .collect();

        let high = today.iter().copied().reduce(f64::max);
        let low = today.iter().copied().reduce(f64::min);
        let (Some(high), Some(low)) = (high, low) else {
            return Err(anyhow!("OpenMeteo returned no hourly temperatures"));
        };

        let uv_index_max = self
            .daily
            .uv_index_max
            .first()
            .copied()
            .flatten()
            .ok_or_else(|| anyhow!("OpenMeteo returned no daily UV maximum"))?;

        let current = self.current;
        Ok(WeatherObservation {
            temperature: current.temperature_2m,
            humidity: current.relative_humidity_2m,
            wind_speed_kmh: current.wind_speed_10m,
            uv_index: current.uv_index,
            uv_index_max,
            condition_code: Some(current.weather_code),
            conditions: classify_weather_code(current.weather_code).to_string(),
            forecast: TemperatureRange { high, low },
        })
    }
}
