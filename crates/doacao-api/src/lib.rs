// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Wire contract of the HTTP surface: request/response bodies, the error
//! envelope and the OpenAPI document.

pub mod dto;
pub mod error_mapping;
mod errors;
pub mod openapi;

pub use dto::{
    AmountInput, CheckoutOrder, CheckoutRequest, CheckoutSessionResponse, DonationItem,
    DonorInfo, GeneratePixRequest, PaymentStatusResponse, PixPaymentResponse, ReadinessResponse,
};
pub use errors::{ApiError, ApiErrorCode, API_ERROR_CODES};
pub use openapi::openapi_v1_spec;

pub const CRATE_NAME: &str = "doacao-api";
