// SPDX-License-Identifier: Apache-2.0

use crate::errors::API_ERROR_CODES;
use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}
    })
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let error_codes: Vec<&str> = API_ERROR_CODES.iter().map(|c| c.as_str()).collect();
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "doacao API",
        "version": "v1"
      },
      "paths": {
        "/": {
          "get": {
            "responses": {
              "200": {"description": "root campaign record"},
              "307": {"description": "redirect to the assigned campaign"}
            }
          }
        },
        "/api/campaigns": {
          "get": {"responses": {"200": {"description": "all campaigns in catalog order"}}}
        },
        "/api/campaigns/hash/{identifier}": {
          "get": {
            "parameters": [
              {"name": "identifier", "in": "path", "required": true, "schema": {"type": "string"}}
            ],
            "responses": {"200": {"description": "campaign bucketed for the identifier"}}
          }
        },
        "/api/campaigns/random": {
          "get": {"responses": {"200": {"description": "uniformly chosen campaign"}}}
        },
        "/api/create-checkout-session": {
          "post": {
            "requestBody": {"required": true, "content": {"application/json": {"schema": {"$ref": "#/components/schemas/CheckoutRequest"}}}},
            "responses": {
              "200": {"description": "checkout session", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/CheckoutSession"}}}},
              "400": error_response("missing required fields"),
              "429": error_response("rate limited"),
              "500": error_response("processor failure")
            }
          }
        },
        "/api/generate-pix": {
          "post": {
            "requestBody": {"required": true, "content": {"application/json": {"schema": {"$ref": "#/components/schemas/GeneratePixRequest"}}}},
            "responses": {
              "200": {"description": "pix instruction", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/PixPayment"}}}},
              "400": error_response("amount missing or invalid"),
              "429": error_response("rate limited"),
              "500": error_response("instruction could not be built")
            }
          }
        },
        "/api/pix-status/{payment_id}": {
          "get": {
            "parameters": [
              {"name": "payment_id", "in": "path", "required": true, "schema": {"type": "string"}}
            ],
            "responses": {
              "200": {"description": "settlement status", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/PaymentStatus"}}}},
              "404": error_response("unknown payment")
            }
          }
        },
        "/healthz": {
          "get": {"responses": {"200": {"description": "ok"}}}
        },
        "/readyz": {
          "get": {
            "responses": {
              "200": {"description": "ready"},
              "503": error_response("not ready")
            }
          }
        },
        "/{slug}": {
          "get": {
            "parameters": [
              {"name": "slug", "in": "path", "required": true, "schema": {"type": "string"}}
            ],
            "responses": {
              "200": {"description": "campaign record"},
              "404": error_response("unknown slug")
            }
          }
        }
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details", "requestId"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "details": {"type": "object"},
              "message": {"type": "string"},
              "requestId": {"type": "string"}
            }
          },
          "ApiErrorCode": {"type": "string", "enum": error_codes},
          "CheckoutRequest": {
            "type": "object",
            "required": ["donationItem", "donorInfo"],
            "properties": {
              "campaignId": {"type": "string"},
              "donationItem": {
                "type": "object",
                "required": ["amount"],
                "properties": {
                  "amount": {"oneOf": [{"type": "number"}, {"type": "string"}]},
                  "currency": {"type": "string"},
                  "description": {"type": "string"},
                  "name": {"type": "string"},
                  "quantity": {"type": "integer", "minimum": 1}
                }
              },
              "donorInfo": {
                "type": "object",
                "properties": {
                  "email": {"type": "string"},
                  "name": {"type": "string"},
                  "phone": {"type": "string"}
                }
              }
            }
          },
          "CheckoutSession": {
            "type": "object",
            "required": ["id", "url"],
            "properties": {"id": {"type": "string"}, "url": {"type": "string"}}
          },
          "GeneratePixRequest": {
            "type": "object",
            "required": ["amount"],
            "properties": {
              "amount": {"oneOf": [{"type": "number"}, {"type": "string"}]},
              "description": {"type": "string"},
              "donorName": {"type": "string"}
            }
          },
          "PaymentStatus": {
            "type": "object",
            "required": ["paymentId", "status"],
            "properties": {
              "paymentId": {"type": "string"},
              "status": {"type": "string", "enum": ["pending", "completed", "expired"]}
            }
          },
          "PixPayment": {
            "type": "object",
            "required": ["qrCodeImage", "qrCodeText", "paymentId", "expiresAt"],
            "properties": {
              "expiresAt": {"type": "string", "format": "date-time"},
              "paymentId": {"type": "string"},
              "qrCodeImage": {"type": "string"},
              "qrCodeText": {"type": "string"}
            }
          }
        }
      }
    })
}
