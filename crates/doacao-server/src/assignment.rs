// SPDX-License-Identifier: Apache-2.0

//! Cookie boundary of visitor bucketing on the landing route.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, SameSite};
use doacao_catalog::{CampaignDirectory, FALLBACK_IDENTIFIER};
use doacao_core::Error;
use doacao_model::CampaignRecord;
use std::net::SocketAddr;

pub const ASSIGNMENT_COOKIE: &str = "assigned-campaign";
pub const ASSIGNMENT_COOKIE_MAX_AGE_DAYS: i64 = 7;

/// First `X-Forwarded-For` hop, else the peer address, else the fallback literal.
#[must_use]
pub fn visitor_identifier(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string);
    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| FALLBACK_IDENTIFIER.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDecision<'a> {
    pub campaign: &'a CampaignRecord,
    /// Set when an existing cookie decided; no new cookie is issued then.
    pub recalled: bool,
}

/// A cookie naming a known campaign id wins; anything else is recomputed.
pub fn decide<'a>(
    directory: &'a CampaignDirectory,
    cookie_value: Option<&str>,
    identifier: &str,
) -> Result<AssignmentDecision<'a>, Error> {
    if let Some(campaign) = cookie_value.and_then(|id| directory.fetch_by_id(id)) {
        return Ok(AssignmentDecision {
            campaign,
            recalled: true,
        });
    }
    Ok(AssignmentDecision {
        campaign: directory.fetch_by_hash(identifier)?,
        recalled: false,
    })
}

#[must_use]
pub fn assignment_cookie(campaign_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((ASSIGNMENT_COOKIE, campaign_id.to_string()))
        .path("/")
        .max_age(cookie::time::Duration::days(ASSIGNMENT_COOKIE_MAX_AGE_DAYS))
        .same_site(SameSite::Lax)
        .http_only(false)
        .secure(secure)
        .build()
}
