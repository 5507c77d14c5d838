use anyhow::{Context, Result};
use axum::{Router, response::Html, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};

const INDEX_HTML: &str = include_str!("../frontend/index.html");

/// The dashboard page plus the JSON API
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .nest("/api", api::router(state))
        .layer(cors)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn run(port: u16, state: AppState) -> Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", port);

    axum::serve(listener, app(state))
        .await
        .with_context(|| "Web server stopped unexpectedly")
}
