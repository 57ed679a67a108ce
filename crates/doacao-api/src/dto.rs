// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;
use doacao_model::{Amount, SettlementStatus, ValidationError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "brl";
pub const DEFAULT_ITEM_NAME: &str = "Doação";
pub const DEFAULT_ITEM_DESCRIPTION: &str = "Apoio para campanha de arrecadação";
pub const DEFAULT_CAMPAIGN_ID: &str = "default";

/// Amount as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Zero and empty text count as "not provided".
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(v) => *v == 0.0,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn to_amount(&self) -> Result<Amount, ValidationError> {
        match self {
            Self::Number(v) => Amount::from_decimal(*v),
            Self::Text(s) => Amount::parse(s),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationItem {
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub donation_item: Option<DonationItem>,
    #[serde(default)]
    pub donor_info: Option<DonorInfo>,
    #[serde(default)]
    pub campaign_id: Option<String>,
}

/// Checkout request with defaults applied and the amount validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    pub amount: Amount,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub donor: DonorInfo,
    pub campaign_id: String,
}

impl CheckoutOrder {
    /// Price per unit in the processor's minor currency unit.
    #[must_use]
    pub fn unit_amount_minor(&self) -> u64 {
        self.amount.cents()
    }
}

impl CheckoutRequest {
    pub fn into_order(self) -> Result<CheckoutOrder, ApiError> {
        let mut missing = Vec::new();
        match &self.donation_item {
            None => missing.push("donationItem"),
            Some(item) if item.amount.as_ref().map_or(true, AmountInput::is_blank) => {
                missing.push("donationItem.amount");
            }
            Some(_) => {}
        }
        if self.donor_info.is_none() {
            missing.push("donorInfo");
        }
        let (Some(item), Some(donor)) = (self.donation_item, self.donor_info) else {
            return Err(ApiError::missing_required_fields(&missing));
        };
        if !missing.is_empty() {
            return Err(ApiError::missing_required_fields(&missing));
        }
        let amount = item
            .amount
            .as_ref()
            .ok_or_else(|| ApiError::missing_required_fields(&["donationItem.amount"]))?
            .to_amount()
            .map_err(|e| ApiError::invalid_field("donationItem.amount", &e.0))?;

        Ok(CheckoutOrder {
            amount,
            currency: non_empty(item.currency)
                .map(|c| c.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            name: non_empty(item.name).unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string()),
            description: non_empty(item.description)
                .unwrap_or_else(|| DEFAULT_ITEM_DESCRIPTION.to_string()),
            quantity: item.quantity.filter(|q| *q > 0).unwrap_or(1),
            donor,
            campaign_id: non_empty(self.campaign_id)
                .unwrap_or_else(|| DEFAULT_CAMPAIGN_ID.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutSessionResponse {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePixRequest {
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub donor_name: Option<String>,
}

impl GeneratePixRequest {
    pub fn amount(&self) -> Result<Amount, ApiError> {
        match &self.amount {
            None => Err(ApiError::amount_required()),
            Some(input) if input.is_blank() => Err(ApiError::amount_required()),
            Some(input) => input
                .to_amount()
                .map_err(|e| ApiError::invalid_field("amount", &e.0)),
        }
    }

    /// Caller-supplied description, or `fallback` when absent or blank.
    #[must_use]
    pub fn description_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PixPaymentResponse {
    pub qr_code_image: String,
    pub qr_code_text: String,
    pub payment_id: String,
    pub expires_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub payment_id: String,
    pub status: SettlementStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: String,
    pub campaigns: usize,
    pub catalog_digest: String,
}
