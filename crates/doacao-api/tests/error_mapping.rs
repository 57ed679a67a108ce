// SPDX-License-Identifier: Apache-2.0

use doacao_api::error_mapping::{map_error, status_for, API_ERROR_SCHEMA_REF};
use doacao_api::{ApiError, ApiErrorCode, API_ERROR_CODES};
use doacao_core::Error;
use serde_json::json;

#[test]
fn api_error_mapping_is_centralized_and_stable() {
    let err = ApiError::amount_required();
    let mapping = map_error(&err);
    assert_eq!(mapping.status_code, 400);
    assert_eq!(mapping.schema_ref, API_ERROR_SCHEMA_REF);

    assert_eq!(status_for(ApiErrorCode::PaymentNotFound), 404);
    assert_eq!(status_for(ApiErrorCode::RateLimited), 429);
    assert_eq!(status_for(ApiErrorCode::ExternalService), 500);
    assert_eq!(status_for(ApiErrorCode::NotReady), 503);
}

#[test]
fn every_code_maps_to_an_error_status() {
    for code in API_ERROR_CODES {
        let status = status_for(code);
        assert!((400..600).contains(&status), "{code:?} -> {status}");
    }
}

#[test]
fn error_envelope_serializes_request_id_in_camel_case() {
    let err = ApiError::checkout_failed().with_request_id("req-1");
    let value = serde_json::to_value(&err).expect("json");
    assert_eq!(
        value,
        json!({
            "code": "ExternalService",
            "message": "Error creating checkout session",
            "details": {},
            "requestId": "req-1"
        })
    );
    let back: ApiError = serde_json::from_value(value).expect("decode");
    assert_eq!(back, err);
}

#[test]
fn core_errors_translate_by_kind() {
    let err = Error::validation("bad amount").with_detail("field", "amount");
    let api = ApiError::from(&err);
    assert_eq!(api.code, ApiErrorCode::ValidationFailed);
    assert_eq!(api.message, "bad amount");
    assert_eq!(api.details, json!({"field": "amount"}));

    let api = ApiError::from(&Error::configuration("empty catalog"));
    assert_eq!(api.code, ApiErrorCode::Internal);

    let cases = [
        (Error::not_found("no campaign"), ApiErrorCode::CampaignNotFound),
        (Error::external_service("processor down"), ApiErrorCode::ExternalService),
        (Error::internal("boom"), ApiErrorCode::Internal),
    ];
    for (err, expected) in cases {
        assert_eq!(ApiError::from(&err).code, expected, "{err}");
    }
}
