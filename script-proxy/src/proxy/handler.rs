//! The proxy handler.
//!
//! One invocation is handled as:
//! 1. `OPTIONS` preflight short-circuit
//! 2. Upstream URL configuration check
//! 3. Method validation (POST only)
//! 4. Strict JSON validation and re-serialization of the body
//! 5. A single POST to the upstream
//! 6. Mapping the upstream answer (JSON or not) to a response
//!
//! Failures never escape: every error becomes a `{"message": ...}` response.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use tracing::{error, info, warn};

use super::error::ProxyError;
use super::response;
use super::types::{InboundRequest, OutboundResponse};
use crate::Config;

/// Stateless request relay. Cheap to clone; clones share the HTTP client.
#[derive(Clone)]
pub struct ProxyHandler {
    config: Arc<Config>,
    client: Client,
}

impl ProxyHandler {
    /// Build a handler with an HTTP client honouring the configured timeout.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Handle one invocation. Always returns a well-formed response.
    pub async fn handle(&self, request: &InboundRequest) -> OutboundResponse {
        match self.try_handle(request).await {
            Ok(response) => response,
            Err(e) => {
                match &e {
                    ProxyError::Misconfigured => {
                        error!("proxy_upstream_url_missing");
                    }
                    ProxyError::MethodNotAllowed(method) => {
                        info!(method = %method, "proxy_method_not_allowed");
                    }
                    ProxyError::InvalidJson(err) => {
                        info!(error = %err, "proxy_request_invalid_json");
                    }
                    ProxyError::Transport(_) => {
                        error!(error = %e, "proxy_upstream_transport_error");
                    }
                }
                e.into_response()
            }
        }
    }

    async fn try_handle(&self, request: &InboundRequest) -> Result<OutboundResponse, ProxyError> {
        if request.http_method == "OPTIONS" {
            return Ok(response::preflight());
        }

        let upstream_url = self
            .config
            .upstream_url
            .as_deref()
            .ok_or(ProxyError::Misconfigured)?;

        if request.http_method != "POST" {
            return Err(ProxyError::MethodNotAllowed(request.http_method.clone()));
        }

        let payload = canonical_json(request.body.as_deref())?;

        info!(payload_length = payload.len(), "proxy_forward_starting");

        let upstream = self
            .client
            .post(upstream_url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = upstream.status();
        let text = upstream.text().await?;
        let data = parse_upstream_body(status.as_u16(), &text);

        if !status.is_success() {
            warn!(
                upstream_status = status.as_u16(),
                body_length = text.len(),
                "proxy_upstream_error_status"
            );
            return Ok(response::json_response(status.as_u16(), &data));
        }

        info!(upstream_status = status.as_u16(), "proxy_forward_complete");

        Ok(response::json_response(200, &data))
    }
}

/// Parse the inbound body and re-serialize it, so the upstream only ever
/// receives compact, well-formed JSON. Object key order is kept. A missing
/// body is malformed.
fn canonical_json(body: Option<&str>) -> Result<String, ProxyError> {
    let value: Value = serde_json::from_str(body.unwrap_or("")).map_err(ProxyError::InvalidJson)?;
    Ok(value.to_string())
}

/// Decode the upstream body, substituting a `message` object for non-JSON text.
fn parse_upstream_body(status: u16, text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                upstream_status = status,
                body_length = text.len(),
                error = %e,
                "proxy_upstream_non_json"
            );
            response::message_body(format!(
                "Upstream returned a non-JSON response (status {}): {}",
                status, text
            ))
        }
    }
}
