// SPDX-License-Identifier: Apache-2.0

use super::{session_form, CheckoutError, CheckoutProvider, CheckoutSession};
use async_trait::async_trait;
use doacao_api::CheckoutOrder;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct ProcessorError {
    error: ProcessorErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProcessorErrorBody {
    #[serde(default)]
    message: String,
}

/// Hosted checkout sessions on the card processor's REST API.
pub struct StripeCheckout {
    api_base: String,
    secret_key: Option<String>,
    client: reqwest::Client,
}

impl StripeCheckout {
    #[must_use]
    pub fn new(api_base: &str, secret_key: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.filter(|k| !k.trim().is_empty()),
            client,
        }
    }

    #[must_use]
    pub fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base)
    }
}

impl std::fmt::Debug for StripeCheckout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeCheckout")
            .field("api_base", &self.api_base)
            .field("configured", &self.secret_key.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    fn provider_tag(&self) -> &'static str {
        "stripe"
    }

    #[instrument(name = "checkout.create_session", skip(self, order), fields(campaign_id = %order.campaign_id))]
    async fn create_session(
        &self,
        order: &CheckoutOrder,
        origin: &str,
    ) -> Result<CheckoutSession, CheckoutError> {
        let Some(secret_key) = self.secret_key.as_deref() else {
            return Err(CheckoutError::NotConfigured);
        };
        let response = self
            .client
            .post(self.sessions_url())
            .bearer_auth(secret_key)
            .form(&session_form(order, origin))
            .send()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ProcessorError>(&bytes)
                .map(|e| e.error.message)
                .unwrap_or_default();
            warn!(status = status.as_u16(), %message, "checkout session rejected");
            return Err(CheckoutError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        let session: CheckoutSession =
            serde_json::from_slice(&bytes).map_err(|e| CheckoutError::Decode(e.to_string()))?;
        info!(session_id = %session.id, "checkout session created");
        Ok(session)
    }
}
