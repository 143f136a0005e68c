//! HTTP request handlers for the REST API.

use std::sync::OnceLock;
use std::time::Instant;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::info;

use signify_core::captions;
use signify_types::captions::{CaptionInput, EnhanceResponse};
use signify_types::{MatchSource, ResolveRequest, ResolveResponse};

use super::ApiState;
use crate::error::{ApiError, Result};

/// Build all API routes.
pub fn api_routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/asl/video-map", post(video_map))
        .route("/captions/enhance", post(enhance_captions))
}

/// Server start time, set once when the router is built.
static START_TIME: OnceLock<Instant> = OnceLock::new();

pub(crate) fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

/// Returns status, version, uptime and the size of the loaded vocabulary.
async fn health_check(State(state): State<ApiState>) -> Json<Value> {
    let start = START_TIME.get_or_init(Instant::now);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptimeSecs": start.elapsed().as_secs(),
        "vocabularySize": state.resolver.index().len(),
        "letters": state.resolver.letters().len(),
    }))
}

async fn video_map(
    State(state): State<ApiState>,
    body: std::result::Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResponse>> {
    let Json(request) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let response = state.resolver.resolve_request(&request)?;

    let partial = response
        .sequence
        .iter()
        .filter(|t| t.match_source == MatchSource::PartialMatch)
        .count();
    info!(
        items = response.sequence.len(),
        found = response.found_words.len(),
        not_found = response.not_found_words.len(),
        partial,
        video_id = request.video_id.as_deref().unwrap_or(""),
        "resolved caption"
    );
    Ok(Json(response))
}

/// Captions arrive as a loosely typed array, so the body is inspected as a
/// plain value before the entries are decoded.
async fn enhance_captions(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Json<EnhanceResponse>> {
    let Json(body) = body.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let Some(raw) = body.get("captions").filter(|c| c.is_array()) else {
        return Err(ApiError::InvalidRequest("captions array is required".into()));
    };
    let inputs: Vec<CaptionInput> = serde_json::from_value(raw.clone())
        .map_err(|e| ApiError::InvalidRequest(format!("invalid caption entry: {e}")))?;

    let enhanced = captions::enhance(&inputs);
    let text_field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(Json(EnhanceResponse {
        success: true,
        original_count: inputs.len(),
        enhanced_count: enhanced.len(),
        enhanced_captions: enhanced,
        video_id: text_field("videoId"),
        platform: text_field("platform"),
    }))
}
