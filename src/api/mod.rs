//! JSON and server-sent-event endpoints, mounted under `/api`

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::VERSION;
use crate::error::BeachSafeError;
use crate::providers::SessionContext;
use crate::recommendations::guide_error_placeholder;
use crate::report::{AnalyzeRequest, GuideText, LocationReport, ReportAssembler};
use crate::text_stream::{StreamEvent, TextStream};

#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<ReportAssembler>,
}

impl AppState {
    pub fn new(assembler: ReportAssembler) -> Self {
        Self {
            assembler: Arc::new(assembler),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReportParams {
    #[serde(default)]
    pub q: String,
    pub from: Option<String>,
    /// Comma-separated hazard advisories
    pub hazards: Option<String>,
}

impl ReportParams {
    fn into_request(self) -> AnalyzeRequest {
        let hazards = self
            .hazards
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(String::from)
            .collect();

        AnalyzeRequest {
            query: self.q,
            origin: self.from.filter(|origin| !origin.trim().is_empty()),
            hazards,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GuideParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    /// True when the request was incomplete rather than failed
    pub warning: bool,
}

pub struct ApiFailure(BeachSafeError);

impl From<BeachSafeError> for ApiFailure {
    fn from(err: BeachSafeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BeachSafeError::Validation { .. } => StatusCode::BAD_REQUEST,
            BeachSafeError::Resolution { .. } => StatusCode::NOT_FOUND,
            BeachSafeError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = ApiError {
            error: self.0.user_message(),
            warning: self.0.is_warning(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/report", get(get_report))
        .route("/guide", get(get_guide))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": VERSION }))
}

async fn get_report(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<Json<LocationReport>, ApiFailure> {
    // every request starts a fresh session
    let mut session = SessionContext::new();
    let report = state
        .assembler
        .analyze(&params.into_request(), &mut session)
        .await?;
    Ok(Json(report))
}

async fn get_guide(
    State(state): State<AppState>,
    Query(params): Query<GuideParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiFailure> {
    let guide = state.assembler.guide_for(&params.q).await?;

    let stream = match guide {
        GuideText::Ready(text) => GuideEvents::Ready(Some(text)),
        GuideText::Streaming(stream) => GuideEvents::Live(stream),
    };
    Ok(Sse::new(guide_events(stream)).keep_alive(KeepAlive::default()))
}

enum GuideEvents {
    Ready(Option<String>),
    Live(TextStream),
    Finished,
}

/// `fragment` events with text, then exactly one `done` or `failed`
fn guide_events(state: GuideEvents) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(state, |state| async move {
        match state {
            GuideEvents::Ready(Some(text)) => {
                Some((Ok(fragment_event(&text)), GuideEvents::Ready(None)))
            }
            GuideEvents::Ready(None) => Some((Ok(done_event()), GuideEvents::Finished)),
            GuideEvents::Live(mut stream) => match stream.next_event().await {
                StreamEvent::Fragment(text) => {
                    Some((Ok(fragment_event(&text)), GuideEvents::Live(stream)))
                }
                StreamEvent::Completed => Some((Ok(done_event()), GuideEvents::Finished)),
                StreamEvent::Failed(err) => Some((Ok(failed_event(&err)), GuideEvents::Finished)),
            },
            GuideEvents::Finished => None,
        }
    })
}

fn fragment_event(text: &str) -> Event {
    Event::default().event("fragment").data(text)
}

// "error" is reserved by EventSource for connection failures
fn failed_event(err: &str) -> Event {
    Event::default().event("failed").data(guide_error_placeholder(err))
}

fn done_event() -> Event {
    Event::default().event("done").data("")
}
