// SPDX-License-Identifier: Apache-2.0

use crate::assignment::{assignment_cookie, decide, visitor_identifier, ASSIGNMENT_COOKIE};
use crate::http::request_tracing::request_id;
use crate::http::response_contract::api_error_response;
use crate::AppState;
use axum::extract::{ConnectInfo, Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use doacao_api::ApiError;
use std::net::SocketAddr;
use tracing::{debug, info};

/// Landing route: recall or compute the visitor's campaign, then redirect
/// to it unless it is the root campaign.
pub(crate) async fn root_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    jar: CookieJar,
) -> Response {
    let identifier = visitor_identifier(&headers, peer.map(|ConnectInfo(addr)| addr));
    let cookie_value = jar.get(ASSIGNMENT_COOKIE).map(|c| c.value().to_string());
    let decision = match decide(&state.directory, cookie_value.as_deref(), &identifier) {
        Ok(decision) => decision,
        Err(err) => {
            return api_error_response(ApiError::from(&err).with_request_id(request_id(&headers)))
        }
    };
    let campaign = decision.campaign;

    let jar = if decision.recalled {
        debug!(campaign_id = %campaign.id, "assignment recalled from cookie");
        jar
    } else {
        info!(campaign_id = %campaign.id, "visitor assigned");
        jar.add(assignment_cookie(
            campaign.id.as_str(),
            state.config.environment.is_production(),
        ))
    };

    if campaign.slug.is_root() {
        (jar, Json(campaign.clone())).into_response()
    } else {
        (jar, Redirect::temporary(&campaign.slug.path())).into_response()
    }
}

pub(crate) async fn campaign_by_slug_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    match state.directory.fetch_by_slug(&slug) {
        Some(campaign) => Json(campaign.clone()).into_response(),
        None => api_error_response(
            ApiError::campaign_not_found(&slug).with_request_id(request_id(&headers)),
        ),
    }
}

pub(crate) async fn list_campaigns_handler(State(state): State<AppState>) -> Response {
    Json(state.directory.fetch_all().to_vec()).into_response()
}

pub(crate) async fn random_campaign_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    match state.directory.fetch_random() {
        Ok(campaign) => Json(campaign.clone()).into_response(),
        Err(err) => {
            api_error_response(ApiError::from(&err).with_request_id(request_id(&headers)))
        }
    }
}

pub(crate) async fn campaign_by_hash_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(identifier): Path<String>,
) -> Response {
    match state.directory.fetch_by_hash(&identifier) {
        Ok(campaign) => Json(campaign.clone()).into_response(),
        Err(err) => {
            api_error_response(ApiError::from(&err).with_request_id(request_id(&headers)))
        }
    }
}
