//! HTTP routes
//!
//! `GET /api/weight?part=..&qty=..`, `POST /api/weight` with a JSON body and
//! `GET /health`. A POST takes `part`/`qty` missing from its body from the
//! query string.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::debug;

use super::weight_commands::{AppState, CommandResponse, resolve_part_weight};
use crate::application::WeightRequest;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/weight", get(weight_from_query).post(weight_from_body))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn weight_from_query(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let response = resolve_part_weight(&state, WeightRequest::from_params(&params)).await;
    into_http(response)
}

async fn weight_from_body(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    // An unreadable body is treated like an empty one so the usual
    // configuration and validation errors apply.
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&body).unwrap_or_else(|e| {
            debug!("Ignoring unparsable request body: {}", e);
            Value::Null
        })
    };
    let request =
        WeightRequest::from_json(&value).with_fallback(WeightRequest::from_params(&params));
    let response = resolve_part_weight(&state, request).await;
    into_http(response)
}

fn into_http(response: CommandResponse) -> (StatusCode, Json<Value>) {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::to_value(&response.body)
        .unwrap_or_else(|_| json!({ "error": "Internal server error" }));
    (status, Json(body))
}
