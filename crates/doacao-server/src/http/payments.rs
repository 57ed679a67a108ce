// SPDX-License-Identifier: Apache-2.0

use crate::assignment::visitor_identifier;
use crate::http::request_tracing::request_id;
use crate::http::response_contract::api_error_response;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use doacao_api::{
    ApiError, ApiErrorCode, CheckoutRequest, CheckoutSessionResponse, GeneratePixRequest,
    PaymentStatusResponse, PixPaymentResponse,
};
use doacao_model::{PaymentStatus, SettlementStatus, TxId};
use doacao_pix::{render_qr_data_uri, PixError};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{error, info, warn};

fn body_rejection(rejection: &JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(
            ApiErrorCode::PayloadTooLarge,
            "request body too large",
            json!({}),
            "req-unknown",
        );
    }
    ApiError::invalid_field("body", &rejection.body_text())
}

async fn admit(state: &AppState, headers: &HeaderMap, peer: Option<SocketAddr>) -> bool {
    let visitor = visitor_identifier(headers, peer);
    let allowed = state
        .rate_limiter
        .allow(&visitor, &state.config.rate_limit_per_ip)
        .await;
    if !allowed {
        warn!(visitor = %visitor, "payment request rate limited");
    }
    allowed
}

fn checkout_origin<'a>(headers: &'a HeaderMap, fallback: &'a str) -> &'a str {
    headers
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| v.starts_with("http://") || v.starts_with("https://"))
        .unwrap_or(fallback)
}

pub(crate) async fn create_checkout_session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);
    if !admit(&state, &headers, peer.map(|ConnectInfo(addr)| addr)).await {
        return api_error_response(ApiError::rate_limited().with_request_id(request_id));
    }
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return api_error_response(body_rejection(&rejection).with_request_id(request_id))
        }
    };
    let order = match request.into_order() {
        Ok(order) => order,
        Err(err) => return api_error_response(err.with_request_id(request_id)),
    };
    let origin = checkout_origin(&headers, &state.config.public_base_url);
    match state.checkout.create_session(&order, origin).await {
        Ok(session) => Json(CheckoutSessionResponse {
            id: session.id,
            url: session.url,
        })
        .into_response(),
        Err(err) => {
            error!(
                provider = state.checkout.provider_tag(),
                campaign_id = %order.campaign_id,
                error = %err,
                "checkout session creation failed"
            );
            api_error_response(ApiError::checkout_failed().with_request_id(request_id))
        }
    }
}

pub(crate) async fn generate_pix_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Json<GeneratePixRequest>, JsonRejection>,
) -> Response {
    let request_id = request_id(&headers);
    if !admit(&state, &headers, peer.map(|ConnectInfo(addr)| addr)).await {
        return api_error_response(ApiError::rate_limited().with_request_id(request_id));
    }
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return api_error_response(body_rejection(&rejection).with_request_id(request_id))
        }
    };
    let amount = match request.amount() {
        Ok(amount) => amount,
        Err(err) => return api_error_response(err.with_request_id(request_id)),
    };
    let description = request.description_or(&state.config.pix.default_description);

    let instruction = match state.issuer.issue(amount, description) {
        Ok(instruction) => instruction,
        Err(err @ PixError::FieldTooLong { .. }) => {
            let err = doacao_core::Error::from(err);
            return api_error_response(ApiError::from(&err).with_request_id(request_id));
        }
        Err(err) => {
            error!(error = %err, "pix instruction could not be built");
            return api_error_response(ApiError::pix_failed().with_request_id(request_id));
        }
    };
    let qr_code_image = match render_qr_data_uri(&instruction.code) {
        Ok(uri) => uri,
        Err(err) => {
            error!(payment_id = %instruction.payment_id, error = %err, "qr rendering failed");
            return api_error_response(ApiError::pix_failed().with_request_id(request_id));
        }
    };

    let response = PixPaymentResponse {
        qr_code_image,
        qr_code_text: instruction.code.clone(),
        payment_id: instruction.payment_id.to_string(),
        expires_at: instruction
            .expires_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    state.ledger.record(instruction, state.clock.now()).await;
    Json(response).into_response()
}

pub(crate) async fn pix_status_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(payment_id): Path<String>,
) -> Response {
    let not_found = || {
        api_error_response(
            ApiError::payment_not_found(&payment_id).with_request_id(request_id(&headers)),
        )
    };
    let Ok(id) = TxId::parse(&payment_id) else {
        return not_found();
    };
    let Some(local) = state.ledger.status(&id, state.clock.now()).await else {
        return not_found();
    };

    let status = match local {
        PaymentStatus::Settled => SettlementStatus::Completed,
        PaymentStatus::Expired | PaymentStatus::Abandoned => SettlementStatus::Expired,
        PaymentStatus::Pending => match &state.upstream_status {
            None => SettlementStatus::Pending,
            Some(source) => match source.fetch_status(&id).await {
                Ok(SettlementStatus::Completed) => {
                    if state.ledger.transition(&id, PaymentStatus::Settled).await {
                        info!(payment_id = %id, "payment settled");
                    }
                    SettlementStatus::Completed
                }
                Ok(SettlementStatus::Expired) => {
                    if state.ledger.transition(&id, PaymentStatus::Expired).await {
                        info!(payment_id = %id, "payment expired upstream");
                    }
                    SettlementStatus::Expired
                }
                Ok(SettlementStatus::Pending) => SettlementStatus::Pending,
                Err(err) => {
                    warn!(
                        payment_id = %id,
                        source = source.source_tag(),
                        error = %err,
                        "upstream status check failed"
                    );
                    SettlementStatus::Pending
                }
            },
        },
    };
    Json(PaymentStatusResponse {
        payment_id: id.to_string(),
        status,
    })
    .into_response()
}
