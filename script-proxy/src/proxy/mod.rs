//! The proxy function itself.
//!
//! ```text
//! InboundRequest → ProxyHandler::handle() → upstream POST → OutboundResponse
//! ```
//!
//! Every exit path, including errors, goes through the `response` builders so
//! the CORS headers are never missing.

pub mod error;
pub mod handler;
pub mod response;
pub mod types;

pub use error::ProxyError;
pub use handler::ProxyHandler;
pub use types::{InboundRequest, OutboundResponse};
