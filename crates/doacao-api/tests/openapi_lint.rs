// SPDX-License-Identifier: Apache-2.0

use doacao_api::{openapi_v1_spec, API_ERROR_CODES};
use serde_json::Value;

#[test]
fn openapi_paths_and_component_schemas_are_lexicographically_sorted() {
    let spec = openapi_v1_spec();
    assert_sorted_object(spec.get("paths").expect("paths"));
    let schemas = spec
        .get("components")
        .and_then(|v| v.get("schemas"))
        .expect("components.schemas");
    assert_sorted_object(schemas);
}

#[test]
fn openapi_schema_lint_rules_hold() {
    let spec = openapi_v1_spec();
    assert_eq!(spec["openapi"], "3.0.3");
    assert_eq!(spec["info"]["version"], "v1");

    let api_error = &spec["components"]["schemas"]["ApiError"];
    assert_eq!(api_error["type"], "object");
    assert_eq!(api_error["additionalProperties"], Value::Bool(false));

    let required = api_error["required"]
        .as_array()
        .expect("ApiError.required array")
        .iter()
        .map(|v| v.as_str().expect("required string"))
        .collect::<Vec<_>>();
    assert_eq!(required, vec!["code", "message", "details", "requestId"]);
}

#[test]
fn error_code_enum_lists_every_code() {
    let spec = openapi_v1_spec();
    let listed = spec["components"]["schemas"]["ApiErrorCode"]["enum"]
        .as_array()
        .expect("enum array")
        .len();
    assert_eq!(listed, API_ERROR_CODES.len());
}

#[test]
fn every_referenced_schema_exists() {
    let spec = openapi_v1_spec();
    let text = serde_json::to_string(&spec).expect("json");
    let schemas = spec["components"]["schemas"].as_object().expect("schemas");
    for chunk in text.split("#/components/schemas/").skip(1) {
        let name: String = chunk.chars().take_while(|c| c.is_ascii_alphanumeric()).collect();
        assert!(schemas.contains_key(&name), "missing schema {name}");
    }
}

fn assert_sorted_object(value: &Value) {
    let object = value.as_object().expect("json object");
    let observed = object.keys().map(String::as_str).collect::<Vec<_>>();
    let mut sorted = observed.clone();
    sorted.sort_unstable();
    assert_eq!(observed, sorted);
}
