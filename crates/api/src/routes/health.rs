//! Liveness endpoint. Reports which notification stream and CV bucket this
//! instance was configured with, without touching either.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    notification_stream: String,
    cv_bucket: Option<String>,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        notification_stream: state.config.queue_stream.clone(),
        cv_bucket: state.config.s3_bucket.clone(),
    })
}
