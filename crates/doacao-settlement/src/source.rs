// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use doacao_model::{SettlementStatus, TxId};
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl Display for SettlementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "status request failed: {msg}"),
            Self::Status(code) => write!(f, "status endpoint answered {code}"),
            Self::Decode(msg) => write!(f, "status body unreadable: {msg}"),
        }
    }
}

impl std::error::Error for SettlementError {}

impl From<SettlementError> for doacao_core::Error {
    fn from(value: SettlementError) -> Self {
        doacao_core::Error::external_service(value.to_string())
    }
}

/// Answers "has this transaction settled yet?".
#[async_trait]
pub trait StatusSource: Send + Sync {
    fn source_tag(&self) -> &'static str;

    async fn fetch_status(&self, payment_id: &TxId) -> Result<SettlementStatus, SettlementError>;
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: SettlementStatus,
}

/// `GET <base>/<payment_id>` returning `{"status": "pending"|"completed"|"expired"}`.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStatusSource {
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    #[must_use]
    pub fn status_url(&self, payment_id: &TxId) -> String {
        format!("{}/{}", self.base_url, payment_id)
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    fn source_tag(&self) -> &'static str {
        "http"
    }

    #[instrument(name = "settlement_status_fetch", skip(self), fields(payment_id = %payment_id))]
    async fn fetch_status(&self, payment_id: &TxId) -> Result<SettlementStatus, SettlementError> {
        let resp = self
            .client
            .get(self.status_url(payment_id))
            .send()
            .await
            .map_err(|e| SettlementError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(SettlementError::Status(resp.status().as_u16()));
        }
        let body: StatusBody = resp
            .json()
            .await
            .map_err(|e| SettlementError::Decode(e.to_string()))?;
        Ok(body.status)
    }
}
