//! Invocation payload and response object exchanged with the hosting platform.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Inbound invocation payload.
///
/// The body is kept as opaque text; it is only decoded where the handler
/// needs to inspect it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    /// HTTP method, e.g. `POST` or `OPTIONS`
    pub http_method: String,
    /// Raw request body, absent for bodiless requests
    #[serde(default)]
    pub body: Option<String>,
    /// Request headers as received by the platform
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl InboundRequest {
    pub fn new(http_method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: http_method.into(),
            body,
            headers: HashMap::new(),
        }
    }
}

/// Response object handed back to the platform.
///
/// Headers live in a `BTreeMap` so the serialized form is stable across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl OutboundResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
