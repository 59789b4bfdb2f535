//! Failures the handler recovers from, each mapped to a status code.

use std::error::Error as _;

use thiserror::Error;

use super::response;
use super::types::OutboundResponse;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Server misconfiguration: the upstream URL is not defined.")]
    Misconfigured,

    #[error("Invalid method {0}. Only POST is accepted.")]
    MethodNotAllowed(String),

    #[error("Invalid JSON in request body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Error communicating with the upstream server: {}", transport_detail(.0))]
    Transport(#[source] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> u16 {
        match self {
            ProxyError::Misconfigured => 500,
            ProxyError::MethodNotAllowed(_) => 405,
            ProxyError::InvalidJson(_) => 400,
            ProxyError::Transport(_) => 502,
        }
    }

    pub fn into_response(self) -> OutboundResponse {
        let mut out = response::message(self.status(), self.to_string());
        if let ProxyError::MethodNotAllowed(_) = self {
            out.headers.insert("Allow".to_string(), "POST".to_string());
        }
        out
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        // The upstream URL is secret; keep it out of anything sent to the caller.
        ProxyError::Transport(e.without_url())
    }
}

/// Error text followed by its source chain, e.g.
/// `error sending request: client error (Connect): tcp connect error: Connection refused`.
fn transport_detail(e: &reqwest::Error) -> String {
    let mut detail = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}
