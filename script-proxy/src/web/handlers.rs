//! Endpoint handlers.
//!
//! These handlers only translate between HTTP and the proxy's invocation
//! types; all policy lives in `ProxyHandler`.

use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::proxy::{InboundRequest, OutboundResponse, ProxyHandler};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub handler: ProxyHandler,
}

impl AppState {
    pub fn new(handler: ProxyHandler) -> Self {
        Self { handler }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Platform Invocation
// =============================================================================

/// Invocation endpoint.
///
/// Takes the platform event (`httpMethod`, `body`, `headers`) as JSON and
/// returns the response object (`statusCode`, `headers`, `body`) as JSON.
pub async fn invoke(
    State(state): State<AppState>,
    Json(request): Json<InboundRequest>,
) -> Json<OutboundResponse> {
    info!(method = %request.http_method, "invoke_received");
    Json(state.handler.handle(&request).await)
}

// =============================================================================
// Direct HTTP
// =============================================================================

/// Direct HTTP endpoint for browsers.
pub async fn proxy(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> OutboundResponse {
    info!(method = %method, body_length = body.len(), "proxy_request_received");

    let request = InboundRequest {
        http_method: method.as_str().to_string(),
        body: if body.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&body).into_owned())
        },
        headers: header_map(&headers),
    };

    state.handler.handle(&request).await
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

impl IntoResponse for OutboundResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_GATEWAY);

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "response_header_invalid"),
            }
        }

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::router;
    use crate::Config;
    use axum::{routing::post, Router};
    use serde_json::Value;
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Start an upstream answering `{"ok":true}` and a proxy in front of it.
    async fn spawn_proxy(configured: bool) -> String {
        let upstream = serve(Router::new().route(
            "/hook",
            post(|| async { (StatusCode::OK, r#"{"ok":true}"#) }),
        ))
        .await;

        let config = if configured {
            Config::with_upstream(format!("{}/hook", upstream))
        } else {
            Config::default()
        };
        let handler = ProxyHandler::new(config).unwrap();
        serve(router(AppState::new(handler))).await
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn_proxy(true).await;
        let body: Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_direct_post_relays_upstream() {
        let base = spawn_proxy(true).await;

        let response = reqwest::Client::new()
            .post(format!("{}/api/sheet", base))
            .header("Content-Type", "application/json")
            .body(r#"{"a":1}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.text().await.unwrap(), r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_direct_preflight() {
        let base = spawn_proxy(true).await;

        let response = reqwest::Client::new()
            .request(Method::OPTIONS, format!("{}/", base))
            .header("Origin", "https://app.example.com")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["access-control-allow-methods"], "POST, OPTIONS");
        assert_eq!(response.headers()["access-control-allow-headers"], "Content-Type");
    }

    #[tokio::test]
    async fn test_direct_get_not_allowed() {
        let base = spawn_proxy(true).await;

        let response = reqwest::get(format!("{}/", base)).await.unwrap();

        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["allow"], "POST");
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_invoke_envelope() {
        let base = spawn_proxy(true).await;

        let out: OutboundResponse = reqwest::Client::new()
            .post(format!("{}/invoke", base))
            .json(&serde_json::json!({
                "httpMethod": "POST",
                "body": "{\"a\":1}",
                "headers": {"content-type": "application/json"}
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(out.status_code, 200);
        assert_eq!(out.body, r#"{"ok":true}"#);
        assert_eq!(out.header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[tokio::test]
    async fn test_invoke_unconfigured() {
        let base = spawn_proxy(false).await;

        let out: OutboundResponse = reqwest::Client::new()
            .post(format!("{}/invoke", base))
            .json(&serde_json::json!({"httpMethod": "POST", "body": null}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(out.status_code, 500);
        assert_eq!(out.header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[test]
    fn test_outbound_into_response_sets_status_and_headers() {
        let out = crate::proxy::response::message(403, "nope");
        let response = out.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
    }
}
