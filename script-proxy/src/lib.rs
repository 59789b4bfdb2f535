//! Script Proxy - a stateless relay between a browser and a secret web-hook.
//!
//! The frontend cannot call the upstream (typically a Google Apps Script
//! deployment) directly: the URL must stay secret and the upstream sends no
//! CORS headers. This crate forwards the browser's JSON `POST` and relays the
//! answer back with CORS headers on every path.
//!
//! ## Architecture
//!
//! ```text
//! Browser → web (axum) → ProxyHandler → upstream web-hook
//! ```

pub mod config;
pub mod proxy;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use proxy::{InboundRequest, OutboundResponse, ProxyError, ProxyHandler};
pub use web::AppState;
