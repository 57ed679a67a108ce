// SPDX-License-Identifier: Apache-2.0

use doacao_core::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    MissingRequiredFields,
    AmountRequired,
    CampaignNotFound,
    PaymentNotFound,
    RateLimited,
    PayloadTooLarge,
    NotReady,
    ExternalService,
    Internal,
}

pub const API_ERROR_CODES: [ApiErrorCode; 10] = [
    ApiErrorCode::ValidationFailed,
    ApiErrorCode::MissingRequiredFields,
    ApiErrorCode::AmountRequired,
    ApiErrorCode::CampaignNotFound,
    ApiErrorCode::PaymentNotFound,
    ApiErrorCode::RateLimited,
    ApiErrorCode::PayloadTooLarge,
    ApiErrorCode::NotReady,
    ApiErrorCode::ExternalService,
    ApiErrorCode::Internal,
];

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "ValidationFailed",
            Self::MissingRequiredFields => "MissingRequiredFields",
            Self::AmountRequired => "AmountRequired",
            Self::CampaignNotFound => "CampaignNotFound",
            Self::PaymentNotFound => "PaymentNotFound",
            Self::RateLimited => "RateLimited",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::NotReady => "NotReady",
            Self::ExternalService => "ExternalService",
            Self::Internal => "Internal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn missing_required_fields(fields: &[&str]) -> Self {
        Self::new(
            ApiErrorCode::MissingRequiredFields,
            "Missing required fields",
            json!({"fields": fields}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn amount_required() -> Self {
        Self::new(
            ApiErrorCode::AmountRequired,
            "Valor é obrigatório",
            json!({"field": "amount"}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_field(field: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            format!("invalid field: {field}"),
            json!({"field_errors": [{"field": field, "reason": reason}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn campaign_not_found(slug: &str) -> Self {
        Self::new(
            ApiErrorCode::CampaignNotFound,
            "campaign not found",
            json!({"slug": slug}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn payment_not_found(payment_id: &str) -> Self {
        Self::new(
            ApiErrorCode::PaymentNotFound,
            "payment not found",
            json!({"paymentId": payment_id}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn checkout_failed() -> Self {
        Self::new(
            ApiErrorCode::ExternalService,
            "Error creating checkout session",
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn pix_failed() -> Self {
        Self::new(
            ApiErrorCode::Internal,
            "Erro ao gerar PIX",
            json!({}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn rate_limited() -> Self {
        Self::new(
            ApiErrorCode::RateLimited,
            "rate limit exceeded",
            json!({}),
            "req-unknown",
        )
    }
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        let code = match err.kind() {
            ErrorKind::Validation => ApiErrorCode::ValidationFailed,
            ErrorKind::NotFound => ApiErrorCode::CampaignNotFound,
            ErrorKind::ExternalService => ApiErrorCode::ExternalService,
            ErrorKind::Configuration | ErrorKind::Internal => ApiErrorCode::Internal,
            _ => ApiErrorCode::Internal,
        };
        Self::new(
            code,
            err.message(),
            json!(err.details()),
            "req-unknown",
        )
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiErrorCode>();
    assert_traits::<ApiError>();
};
