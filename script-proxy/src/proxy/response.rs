//! Response builders shared by every exit path.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use super::types::OutboundResponse;

pub const STATUS_NO_CONTENT: u16 = 204;

/// CORS headers attached to every response.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

fn cors_headers() -> BTreeMap<String, String> {
    CORS_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Answer to a CORS preflight: 204, no body.
pub fn preflight() -> OutboundResponse {
    OutboundResponse {
        status_code: STATUS_NO_CONTENT,
        headers: cors_headers(),
        body: String::new(),
    }
}

/// JSON response with CORS headers.
pub fn json_response<T: Serialize>(status_code: u16, value: &T) -> OutboundResponse {
    let mut headers = cors_headers();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    // Serializing a `Value` or a plain struct can't fail; fall back to an
    // empty object rather than panicking.
    let body = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());

    OutboundResponse {
        status_code,
        headers,
        body,
    }
}

/// `{"message": ...}` error body.
pub fn message(status_code: u16, text: impl Into<String>) -> OutboundResponse {
    json_response(status_code, &message_body(text))
}

pub fn message_body(text: impl Into<String>) -> Value {
    json!({ "message": text.into() })
}
