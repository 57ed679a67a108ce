// SPDX-License-Identifier: Apache-2.0

//! Card checkout through an external payment processor.

use async_trait::async_trait;
use doacao_api::CheckoutOrder;
use std::fmt::{Display, Formatter};

pub mod fake;
pub mod stripe;

pub use fake::FakeCheckout;
pub use stripe::StripeCheckout;

/// Placeholder the processor substitutes with the created session id.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    NotConfigured,
    Transport(String),
    Rejected { status: u16, message: String },
    Decode(String),
}

impl Display for CheckoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("checkout processor is not configured"),
            Self::Transport(msg) => write!(f, "checkout request failed: {msg}"),
            Self::Rejected { status, message } => {
                write!(f, "checkout processor answered {status}: {message}")
            }
            Self::Decode(msg) => write!(f, "checkout response unreadable: {msg}"),
        }
    }
}

impl std::error::Error for CheckoutError {}

impl From<CheckoutError> for doacao_core::Error {
    fn from(value: CheckoutError) -> Self {
        match value {
            CheckoutError::NotConfigured => doacao_core::Error::configuration(value.to_string()),
            other => doacao_core::Error::external_service(other.to_string()),
        }
    }
}

/// Creates hosted checkout sessions. Implementations never retry.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    fn provider_tag(&self) -> &'static str;

    async fn create_session(
        &self,
        order: &CheckoutOrder,
        origin: &str,
    ) -> Result<CheckoutSession, CheckoutError>;
}

#[must_use]
pub fn success_url(origin: &str) -> String {
    format!(
        "{}/success?session_id={SESSION_ID_PLACEHOLDER}",
        origin.trim_end_matches('/')
    )
}

#[must_use]
pub fn cancel_url(origin: &str) -> String {
    format!("{}/campanhas", origin.trim_end_matches('/'))
}

/// Form parameters of a checkout session request, in bracketed key notation.
#[must_use]
pub fn session_form(order: &CheckoutOrder, origin: &str) -> Vec<(String, String)> {
    let donor = &order.donor;
    let mut form = vec![
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("mode".to_string(), "payment".to_string()),
        ("billing_address_collection".to_string(), "required".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            order.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            order.name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".to_string(),
            order.description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            order.unit_amount_minor().to_string(),
        ),
        (
            "line_items[0][quantity]".to_string(),
            order.quantity.to_string(),
        ),
        ("success_url".to_string(), success_url(origin)),
        ("cancel_url".to_string(), cancel_url(origin)),
        ("metadata[campaignId]".to_string(), order.campaign_id.clone()),
    ];
    let optional = [
        ("metadata[donorName]", donor.name.as_deref()),
        ("metadata[donorEmail]", donor.email.as_deref()),
        ("metadata[donorPhone]", donor.phone.as_deref()),
        ("customer_email", donor.email.as_deref()),
    ];
    for (key, value) in optional {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            form.push((key.to_string(), value.to_string()));
        }
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use doacao_api::DonorInfo;
    use doacao_model::Amount;

    fn order() -> CheckoutOrder {
        CheckoutOrder {
            amount: Amount::parse("50.5").expect("amount"),
            currency: "brl".to_string(),
            name: "Doação".to_string(),
            description: "Apoio para campanha de arrecadação".to_string(),
            quantity: 1,
            donor: DonorInfo {
                name: Some("Ana".to_string()),
                email: Some("ana@example.org".to_string()),
                phone: None,
            },
            campaign_id: "ana-campaign".to_string(),
        }
    }

    fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn form_carries_line_item_in_minor_units() {
        let form = session_form(&order(), "https://doacoes.example/");
        assert_eq!(value(&form, "line_items[0][price_data][unit_amount]"), Some("5050"));
        assert_eq!(value(&form, "mode"), Some("payment"));
        assert_eq!(
            value(&form, "success_url"),
            Some("https://doacoes.example/success?session_id={CHECKOUT_SESSION_ID}")
        );
        assert_eq!(value(&form, "cancel_url"), Some("https://doacoes.example/campanhas"));
        assert_eq!(value(&form, "customer_email"), Some("ana@example.org"));
        assert_eq!(value(&form, "metadata[campaignId]"), Some("ana-campaign"));
        assert_eq!(value(&form, "metadata[donorPhone]"), None);
    }
}
