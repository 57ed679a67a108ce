// SPDX-License-Identifier: Apache-2.0

use crate::http::{campaigns, health, payments};
use crate::middleware::request_tracing::request_tracing_middleware;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(campaigns::root_handler))
        .route("/healthz", get(health::healthz_handler))
        .route("/readyz", get(health::readyz_handler))
        .route("/api/campaigns", get(campaigns::list_campaigns_handler))
        .route(
            "/api/campaigns/random",
            get(campaigns::random_campaign_handler),
        )
        .route(
            "/api/campaigns/hash/:identifier",
            get(campaigns::campaign_by_hash_handler),
        )
        .route(
            "/api/create-checkout-session",
            post(payments::create_checkout_session_handler),
        )
        .route("/api/generate-pix", post(payments::generate_pix_handler))
        .route(
            "/api/pix-status/:payment_id",
            get(payments::pix_status_handler),
        )
        .route("/:slug", get(campaigns::campaign_by_slug_handler))
        .layer(from_fn_with_state(state.clone(), request_tracing_middleware))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
