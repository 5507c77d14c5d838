//! Report assembly
//!
//! Sequences the provider calls for one query, feeds the results through the
//! scoring engine and classifies every failure as blocking, degraded or a
//! user-input warning.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::BeachSafeConfig;
use crate::distance::estimate_flight_distance;
use crate::error::BeachSafeError;
use crate::models::{LocationQuery, ResolvedLocation, TideOutlook, WeatherObservation};
use crate::providers::{
    Geocoder, GoogleGeocoder, OpenAiTextGenerator, OpenMeteoWeather, ProviderOutcome,
    SessionContext, StormGlassTides, TextGenerator, TideProvider, WaterQuality, WeatherProvider,
    beach_facilities, water_quality,
};
use crate::recommendations::{
    GUIDE_DISABLED, PACKING_DISABLED, PACKING_FAILED, generate_beach_packing_list,
    guide_error_placeholder, location_guide_prompt, packing_list_prompt,
};
use crate::scoring::{BeachSafetyAssessment, SafetyAssessment, assess_beach_safety, compute_safety_score};
use crate::text_stream::TextStream;

const LIFEGUARD: &str = "Lifeguard";

/// What the user asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub query: String,
    /// Optional starting point for the flight distance estimate
    pub origin: Option<String>,
    /// Active hazard advisories, e.g. "Cyclone watch"
    pub hazards: Vec<String>,
}

impl AnalyzeRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationReport {
    pub query: String,
    pub location: ResolvedLocation,
    pub weather: WeatherObservation,
    /// Set when `weather` is the static fallback
    pub weather_notice: Option<String>,
    pub safety: SafetyAssessment,
    pub packing_advice: String,
    pub beach: Option<BeachReport>,
    pub distance_km: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BeachReport {
    pub tides: ProviderOutcome<TideOutlook>,
    pub facilities: Vec<String>,
    pub water_quality: WaterQuality,
    pub swimming_advice: String,
    pub safety: BeachSafetyAssessment,
    pub packing_list: Vec<String>,
}

/// The travel guide, either final text or a live stream
#[derive(Debug)]
pub enum GuideText {
    Ready(String),
    Streaming(TextStream),
}

pub struct ReportAssembler {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    tides: Arc<dyn TideProvider>,
    text: Option<Arc<dyn TextGenerator>>,
    packing_max_tokens: u32,
    guide_max_tokens: u32,
    timezone: Tz,
}

impl ReportAssembler {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        tides: Arc<dyn TideProvider>,
        text: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            tides,
            text,
            packing_max_tokens: 200,
            guide_max_tokens: 700,
            timezone: chrono_tz::Asia::Kolkata,
        }
    }

    /// Wire up the live providers
    pub fn from_config(config: &BeachSafeConfig) -> anyhow::Result<Self> {
        let text = OpenAiTextGenerator::from_config(&config.ai)?
            .map(|generator| Arc::new(generator) as Arc<dyn TextGenerator>);
        if text.is_none() {
            info!("No OpenAI API key configured, AI text disabled");
        }

        let timezone: Tz = config
            .display
            .timezone
            .parse()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Invalid display timezone '{}'", config.display.timezone))?;

        Ok(Self {
            geocoder: Arc::new(GoogleGeocoder::new(config)?),
            weather: Arc::new(OpenMeteoWeather::new(config)?),
            tides: Arc::new(StormGlassTides::new(config)?),
            text,
            packing_max_tokens: config.ai.packing_max_tokens,
            guide_max_tokens: config.ai.guide_max_tokens,
            timezone,
        })
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub async fn analyze(
        &self,
        request: &AnalyzeRequest,
        session: &mut SessionContext,
    ) -> Result<LocationReport, BeachSafeError> {
        self.analyze_at(request, session, Utc::now()).await
    }

    /// Build the full report as of `now`
    #[instrument(skip(self, session, now), fields(query = %request.query))]
    pub async fn analyze_at(
        &self,
        request: &AnalyzeRequest,
        session: &mut SessionContext,
        now: DateTime<Utc>,
    ) -> Result<LocationReport, BeachSafeError> {
        let (query, location) = self.resolve(&request.query).await?;
        session.record_location(query.as_str());
        info!("Analyzing {}", location.formatted_address);

        let (weather, weather_notice) = self.current_weather(&location).await;

        let safety = compute_safety_score(&weather);
        let packing_advice = self.packing_advice(&query, &weather, safety.score).await;

        let beach = if query.is_beach() {
            Some(self.beach_report(&query, &location, &weather, &request.hazards, session, now).await)
        } else {
            None
        };

        let distance_km = match request.origin.as_deref().map(LocationQuery::parse) {
            Some(Ok(origin)) => {
                Some(estimate_flight_distance(self.geocoder.as_ref(), &origin, &query).await)
            }
            _ => None,
        };

        Ok(LocationReport {
            query: query.as_str().to_string(),
            location,
            weather,
            weather_notice,
            safety,
            packing_advice,
            beach,
            distance_km,
            generated_at: now,
        })
    }

    /// Resolve a query for the guide, then start generating it
    pub async fn guide_for(&self, input: &str) -> Result<GuideText, BeachSafeError> {
        let (query, location) = self.resolve(input).await?;
        let (weather, _) = self.current_weather(&location).await;
        Ok(self.guide(&query, &weather).await)
    }

    async fn resolve(&self, input: &str) -> Result<(LocationQuery, ResolvedLocation), BeachSafeError> {
        let query = LocationQuery::parse(input)?;

        match self.geocoder.resolve(&query).await {
            ProviderOutcome::Ok(location) | ProviderOutcome::Fallback { value: location, .. } => {
                Ok((query, location))
            }
            ProviderOutcome::Error(reason) => {
                warn!("Could not resolve '{}': {}", query, reason);
                Err(BeachSafeError::resolution(query.as_str(), reason))
            }
        }
    }

    /// Weather to score with, plus the reason when it is not live
    async fn current_weather(&self, location: &ResolvedLocation) -> (WeatherObservation, Option<String>) {
        let outcome = self.weather.fetch(location.coordinates()).await;
        let notice = outcome.problem().map(str::to_string);
        let weather = outcome.into_value().unwrap_or_else(WeatherObservation::fallback);
        (weather, notice)
    }

    async fn beach_report(
        &self,
        query: &LocationQuery,
        location: &ResolvedLocation,
        weather: &WeatherObservation,
        hazards: &[String],
        session: &SessionContext,
        now: DateTime<Utc>,
    ) -> BeachReport {
        let tides = self.tides.fetch(location.coordinates(), now).await;
        let facilities = beach_facilities(session);

        let local_hour = now.with_timezone(&self.timezone).hour();
        let quality = water_quality(query.as_str(), local_hour);

        let has_lifeguard = facilities.iter().any(|f| f == LIFEGUARD);
        let safety = assess_beach_safety(weather.uv_index, hazards, has_lifeguard);

        BeachReport {
            tides,
            facilities,
            water_quality: quality,
            swimming_advice: quality.advice().to_string(),
            safety,
            packing_list: generate_beach_packing_list(weather, weather.uv_index),
        }
    }

    async fn packing_advice(
        &self,
        query: &LocationQuery,
        weather: &WeatherObservation,
        safety_score: f64,
    ) -> String {
        let Some(text) = &self.text else {
            return PACKING_DISABLED.to_string();
        };

        let prompt = packing_list_prompt(query.as_str(), weather, safety_score);
        match text.generate(prompt, self.packing_max_tokens).await {
            Ok(advice) => advice,
            Err(e) => {
                warn!("AI packing list failed: {:#}", e);
                PACKING_FAILED.to_string()
            }
        }
    }

    /// Start the travel guide; failures become placeholder text
    pub async fn guide(&self, query: &LocationQuery, weather: &WeatherObservation) -> GuideText {
        let Some(text) = &self.text else {
            return GuideText::Ready(GUIDE_DISABLED.to_string());
        };

        let prompt = location_guide_prompt(query.as_str(), weather);
        match text.generate_stream(prompt, self.guide_max_tokens).await {
            Ok(stream) => GuideText::Streaming(stream),
            Err(e) => {
                warn!("AI guide failed: {:#}", e);
                GuideText::Ready(guide_error_placeholder(&e.to_string()))
            }
        }
    }
}
