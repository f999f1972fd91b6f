//! The JSON API surface.
//!
//! Five endpoints mirror the engine's operations: service status, session
//! create/poll/abort, and the synchronous single-name evaluation path.
//! Validation failures are 400s produced before any session exists;
//! unknown session ids are 404s.

use crate::server::error::ApiError;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use namesmith::{
    Error, Gender, GenerationRequest, ScoreResult, SessionId, SessionSnapshot, SessionStore, Style,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    /// Historical-table size captured at startup, for the status endpoint.
    pub known_names: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(service_status))
        .route("/api/generate", post(start_generation))
        .route("/api/generate/status/{id}", get(generation_status))
        .route("/api/generate/abort/{id}", post(abort_generation))
        .route("/api/evaluate", post(evaluate_name))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    model_loaded: bool,
    known_names: usize,
    version: &'static str,
}

async fn service_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        model_loaded: state.store.scorer().model_loaded(),
        known_names: state.known_names,
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn default_count() -> usize {
    5
}

fn default_gender() -> String {
    "F".to_string()
}

fn default_min_score() -> f64 {
    70.0
}

fn default_max_score() -> f64 {
    100.0
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(default = "default_count")]
    count: usize,
    #[serde(default = "default_gender")]
    gender: String,
    /// Free-form; unrecognized styles mean no style constraint.
    #[serde(default)]
    style: String,
    #[serde(default = "default_min_score")]
    min_score: f64,
    #[serde(default = "default_max_score")]
    max_score: f64,
}

#[derive(Serialize)]
struct GenerateResponse {
    success: bool,
    session_id: SessionId,
    status: &'static str,
}

async fn start_generation(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let gender: Gender = body.gender.parse()?;
    let style: Style = body.style.parse().unwrap_or_default();

    let session_id = state.store.create(GenerationRequest {
        count: body.count,
        gender,
        style,
        min_score: body.min_score,
        max_score: body.max_score,
    })?;

    Ok(Json(GenerateResponse {
        success: true,
        session_id,
        status: "started",
    }))
}

async fn generation_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state.store.poll(parse_session_id(&id)?)?;
    Ok(Json(snapshot))
}

#[derive(Serialize)]
struct AbortResponse {
    success: bool,
    status: namesmith::SessionStatus,
    partial_results: Vec<ScoreResult>,
    found_count: usize,
}

async fn abort_generation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AbortResponse>, ApiError> {
    let snapshot = state.store.abort(parse_session_id(&id)?)?;
    Ok(Json(AbortResponse {
        success: true,
        status: snapshot.status,
        found_count: snapshot.found,
        partial_results: snapshot.results.unwrap_or_default(),
    }))
}

#[derive(Deserialize)]
struct EvaluateBody {
    #[serde(default)]
    name: String,
    #[serde(default = "default_gender")]
    gender: String,
}

#[derive(Serialize)]
struct EvaluateResponse {
    success: bool,
    result: ScoreResult,
}

async fn evaluate_name(
    State(state): State<AppState>,
    Json(body): Json<EvaluateBody>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(Error::InvalidRequest {
            reason: "name is required".to_string(),
        }
        .into());
    }
    let gender: Gender = body.gender.parse()?;

    let result = state.store.scorer().score(name, gender);
    Ok(Json(EvaluateResponse {
        success: true,
        result,
    }))
}

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse().map_err(|_| {
        ApiError(Error::InvalidRequest {
            reason: format!("malformed session id {raw:?}"),
        })
    })
}
