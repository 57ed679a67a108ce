// SPDX-License-Identifier: Apache-2.0

use crate::http::request_tracing::request_id;
use crate::http::response_contract::api_error_response;
use crate::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use doacao_api::{ApiError, ApiErrorCode, ReadinessResponse};
use serde_json::json;
use std::sync::atomic::Ordering;

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn readyz_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !state.ready.load(Ordering::Relaxed) {
        return api_error_response(
            ApiError::new(
                ApiErrorCode::NotReady,
                "service not ready",
                json!({}),
                "req-unknown",
            )
            .with_request_id(request_id(&headers)),
        );
    }
    Json(ReadinessResponse {
        status: "ready".to_string(),
        campaigns: state.directory.catalog().len(),
        catalog_digest: state.catalog_digest.as_ref().clone(),
    })
    .into_response()
}
