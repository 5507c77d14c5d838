//! Storm Glass tide extremes

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{ProviderOutcome, TideProvider, http_client};
use crate::cache::{ProviderCache, provider_cache};
use crate::config::BeachSafeConfig;
use crate::models::{Coordinates, TideEvent, TideKind, TideOutlook};

pub const MISSING_KEY: &str = "No Storm Glass API key configured";
pub const NO_DATA: &str = "No tide data available";

pub struct StormGlassTides {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    // raw extremes; selection against "now" happens on every call
    cache: ProviderCache<Vec<TideEvent>>,
}

impl StormGlassTides {
    pub fn new(config: &BeachSafeConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.tides.timeout())?,
            api_key: config.tides.api_key.clone(),
            base_url: config.tides.base_url.clone(),
            cache: provider_cache("tides", Duration::from_secs(config.cache.tides_ttl_seconds)),
        })
    }

    #[instrument(skip(self, api_key), fields(lat = point.latitude, lon = point.longitude))]
    async fn request(
        &self,
        point: Coordinates,
        now: DateTime<Utc>,
        api_key: &str,
    ) -> Result<Vec<TideEvent>> {
        let today = now.date_naive();
        let tomorrow = today + Days::new(1);
        let url = format!(
            "{}/tide/extremes/point?lat={}&lng={}&start={}&end={}",
            self.base_url, point.latitude, point.longitude, today, tomorrow
        );
        debug!("Storm Glass request URL: {}", url);

        let response = self
            .client
            .get(url)
            .header("Authorization", api_key)
            .send()
            .await
            .with_context(|| "Storm Glass request failed")?
            .error_for_status()?;

        let body: ExtremesResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Storm Glass response")?;

        let events = body.into_events();
        info!("Received {} tide extremes", events.len());
        Ok(events)
    }
}

#[async_trait]
impl TideProvider for StormGlassTides {
    async fn fetch(&self, point: Coordinates, now: DateTime<Utc>) -> ProviderOutcome<TideOutlook> {
        let Some(api_key) = self.api_key.as_deref() else {
            return ProviderOutcome::Error(MISSING_KEY.to_string());
        };

        let key = point.cache_key("tides");
        let events = match self.cache.get(&key).await {
            Some(events) => events,
            None => match self.request(point, now, api_key).await {
                Ok(events) => {
                    self.cache.insert(key, events.clone()).await;
                    events
                }
                Err(e) => {
                    warn!("Tide data unavailable: {:#}", e);
                    return ProviderOutcome::Error(e.to_string());
                }
            },
        };

        if events.is_empty() {
            return ProviderOutcome::Error(NO_DATA.to_string());
        }

        ProviderOutcome::Ok(TideOutlook::select_next(events, now))
    }
}

#[derive(Debug, Deserialize)]
struct ExtremesResponse {
    #[serde(default)]
    data: Vec<Extreme>,
}

#[derive(Debug, Deserialize)]
struct Extreme {
    height: Option<f64>,
    time: DateTime<Utc>,
    #[serde(rename = "type")]
    kind: String,
}

impl ExtremesResponse {
    fn into_events(self) -> Vec<TideEvent> {
        self.data
            .into_iter()
            .filter_map(|extreme| {
                let kind = match extreme.kind.as_str() {
                    "high" => TideKind::High,
                    "low" => TideKind::Low,
                    other => {
                        debug!("Ignoring tide extreme of type '{}'", other);
                        return None;
                    }
                };
                Some(TideEvent {
                    kind,
                    time: extreme.time,
                    height_m: extreme.height,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::stub;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BODY: &str = r#"{
        "data": [
            { "height": 0.82, "time": "2026-03-14T03:12:00+00:00", "type": "high" },
            { "height": -0.41, "time": "2026-03-14T09:30:00+00:00", "type": "low" },
            { "height": 0.95, "time": "2026-03-14T15:48:00+00:00", "type": "high" },
            { "time": "2026-03-14T21:55:00Z", "type": "low" },
            { "height": 1.0, "time": "2026-03-14T22:00:00+00:00", "type": "slack" }
        ],
        "meta": { "datum": "MSL" }
    }"#;

    #[test]
    fn test_events_from_response() {
        let response: ExtremesResponse = serde_json::from_str(BODY).unwrap();
        let events = response.into_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].kind, TideKind::High);
        assert_eq!(events[1].height_m, Some(-0.41));
        assert_eq!(events[3].height_m, None);
    }

    #[test]
    fn test_next_tides_from_response() {
        let response: ExtremesResponse = serde_json::from_str(BODY).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();
        let outlook = TideOutlook::select_next(response.into_events(), now);

        let high = outlook.next_high.unwrap();
        assert_eq!(high.time, Utc.with_ymd_and_hms(2026, 3, 14, 15, 48, 0).unwrap());
        let low = outlook.next_low.unwrap();
        assert_eq!(low.time, Utc.with_ymd_and_hms(2026, 3, 14, 21, 55, 0).unwrap());
        assert_eq!(low.format_height(), "N/A");
    }

    #[test]
    fn test_missing_data_field() {
        let response: ExtremesResponse = serde_json::from_str(r#"{ "errors": {} }"#).unwrap();
        assert!(response.into_events().is_empty());
    }

    fn configured(base_url: String) -> StormGlassTides {
        let mut config = BeachSafeConfig::default();
        config.tides.api_key = Some("sg-test".to_string());
        config.tides.base_url = base_url;
        StormGlassTides::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_key_and_caches_extremes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/tide/extremes/point",
            get(move |headers: HeaderMap| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(headers["authorization"], "sg-test");
                    BODY
                }
            }),
        );
        let tides = configured(stub::serve(router).await);
        let point = Coordinates::new(19.8, 85.8);
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();

        let first = tides.fetch(point, now).await;
        let high = first.value().unwrap().next_high.clone().unwrap();
        assert_eq!(high.time, Utc.with_ymd_and_hms(2026, 3, 14, 15, 48, 0).unwrap());

        // cached events are re-selected against the later time
        let later = Utc.with_ymd_and_hms(2026, 3, 14, 16, 0, 0).unwrap();
        let second = tides.fetch(point, later).await;
        assert!(second.value().unwrap().next_high.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_extremes_are_an_error() {
        let router = Router::new().route(
            "/tide/extremes/point",
            get(|| async { r#"{ "data": [], "meta": { "cost": 1 } }"# }),
        );
        let tides = configured(stub::serve(router).await);
        let outcome = tides.fetch(Coordinates::new(19.8, 85.8), Utc::now()).await;
        assert_eq!(outcome, ProviderOutcome::Error(NO_DATA.to_string()));
    }

    #[tokio::test]
    async fn test_rejected_request_is_an_error() {
        let router = Router::new().route(
            "/tide/extremes/point",
            get(|| async { (StatusCode::PAYMENT_REQUIRED, "quota exceeded") }),
        );
        let tides = configured(stub::serve(router).await);
        let outcome = tides.fetch(Coordinates::new(19.8, 85.8), Utc::now()).await;
        match outcome {
            ProviderOutcome::Error(message) => assert!(message.contains("402"), "{message}"),
            other => panic!("expected an error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let tides = configured(stub::closed().await);
        let outcome = tides.fetch(Coordinates::new(19.8, 85.8), Utc::now()).await;
        assert_eq!(
            outcome,
            ProviderOutcome::Error("Storm Glass request failed".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_key() {
        let tides = StormGlassTides::new(&BeachSafeConfig::default()).unwrap();
        let outcome = tides.fetch(Coordinates::new(19.8, 85.8), Utc::now()).await;
        assert_eq!(outcome, ProviderOutcome::Error(MISSING_KEY.to_string()));
    }
}
