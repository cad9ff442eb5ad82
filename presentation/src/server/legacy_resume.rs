//! Legacy resume endpoints.
//!
//! Resume analysis moved to a separate service. Every route here answers
//! `410 Gone` with a fixed JSON body, whatever the method or payload.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::{any, get}};
use serde::Serialize;
use std::net::SocketAddr;
use tracing::info;

#[derive(Serialize, Debug)]
struct DeprecatedResponse {
    success: bool,
    message: String,
}

impl DeprecatedResponse {
    fn new(feature: &str) -> Self {
        Self {
            success: false,
            message: format!(
                "{} endpoint deprecated; feature moved to separate service.",
                feature
            ),
        }
    }
}

fn gone(feature: &str) -> impl IntoResponse {
    (StatusCode::GONE, Json(DeprecatedResponse::new(feature)))
}

async fn analyze() -> impl IntoResponse {
    gone("Resume analysis")
}

async fn status() -> impl IntoResponse {
    gone("Status")
}

async fn upload_and_extract() -> impl IntoResponse {
    gone("Upload and extract")
}

async fn extract_skills() -> impl IntoResponse {
    gone("Extract skills")
}

async fn health() -> &'static str {
    "OK"
}

/// Build the router for the retired resume API.
pub fn legacy_resume_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/resume/analyze", any(analyze))
        .route("/api/resume/status", any(status))
        .route("/api/resume/status/{id}", any(status))
        .route("/api/resume/upload-and-extract", any(upload_and_extract))
        .route("/api/resume/extract-skills", any(extract_skills))
}

/// Serve the legacy router on `addr` until Ctrl-C.
pub async fn serve_legacy_resume(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Legacy resume endpoints listening on {}", listener.local_addr()?);

    axum::serve(listener, legacy_resume_router())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down legacy resume endpoints");
        })
        .await
}
