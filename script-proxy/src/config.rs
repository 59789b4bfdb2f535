//! Configuration module for environment variable parsing.
//!
//! The upstream URL is a secret held only in server-side configuration. It is
//! read once at startup and injected into the handler, never re-read per request.

use std::env;
use tracing::warn;
use url::Url;

/// Primary environment variable holding the upstream web-hook URL.
pub const UPSTREAM_URL_VAR: &str = "UPSTREAM_URL";

/// Legacy name for the upstream URL, accepted when `UPSTREAM_URL` is unset.
pub const LEGACY_UPSTREAM_URL_VAR: &str = "REAL_GOOGLE_SHEET_URL";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upstream web-hook URL. `None` when missing, empty or not a valid URL.
    pub upstream_url: Option<String>,

    /// Port for the web server to listen on
    pub port: u16,

    /// Upstream request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_url = non_empty(lookup(UPSTREAM_URL_VAR))
            .map(|v| (UPSTREAM_URL_VAR, v))
            .or_else(|| {
                non_empty(lookup(LEGACY_UPSTREAM_URL_VAR)).map(|v| (LEGACY_UPSTREAM_URL_VAR, v))
            })
            .and_then(|(name, raw)| validate_url(name, raw));

        Config {
            upstream_url,

            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(8080),

            request_timeout_ms: lookup("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Config pointing at a fixed upstream, with default port and timeout.
    pub fn with_upstream(url: impl Into<String>) -> Self {
        Config {
            upstream_url: Some(url.into()),
            ..Default::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            upstream_url: None,
            port: 8080,
            request_timeout_ms: 10_000,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accept only absolute http(s) URLs. The value itself is secret and is not logged.
fn validate_url(name: &str, raw: String) -> Option<String> {
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(raw),
        Ok(url) => {
            warn!(env_var = name, scheme = url.scheme(), "upstream_url_unsupported_scheme");
            None
        }
        Err(e) => {
            warn!(env_var = name, error = %e, "upstream_url_invalid");
            None
        }
    }
}
