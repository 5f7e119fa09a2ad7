//! Development reverse proxy for the backtest backend.
//!
//! Forwards `/api/*` requests to the backend unchanged (path and query
//! preserved), adds permissive CORS headers so a dashboard served from another
//! origin can call it, and answers 503 with a diagnostic JSON body when the
//! backend is down instead of surfacing a bare connection error.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Health probes against a dead backend should fail fast.
const HEALTH_PROBE_TIMEOUT_SECS: u64 = 2;

#[derive(Parser)]
#[command(name = "stratview-proxy", about = "Development proxy for the backtest backend")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: SocketAddr,

    /// Base URL of the backtest backend.
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    backend: String,
}

/// State shared across handlers.
#[derive(Clone)]
struct ProxyState {
    http: reqwest::Client,
    backend: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stratview_proxy=info,tower_http=info".into()),
        )
        .init();

    let state = ProxyState {
        http: reqwest::Client::new(),
        backend: args.backend.trim_end_matches('/').to_string(),
    };
    let app = router(state);

    tracing::info!("proxy listening on {} -> {}", args.listen, args.backend);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Assemble the proxy router. CORS sits outermost so preflight OPTIONS
/// requests are answered here and never reach the backend.
fn router(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/{*path}", any(forward))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Forward one request to the backend and relay the response verbatim.
async fn forward(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = forward_url(&state.backend, &uri);
    tracing::debug!(%method, %url, "forwarding");

    let mut request = state.http.request(method, &url).body(body);
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    match request.send().await {
        Ok(upstream) => {
            let status = upstream.status();
            let content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();
            match upstream.bytes().await {
                Ok(bytes) => {
                    let mut response = Response::builder().status(status.as_u16());
                    if let Some(content_type) = content_type {
                        response = response.header(header::CONTENT_TYPE, content_type);
                    }
                    response
                        .body(Body::from(bytes))
                        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
                }
                Err(err) => unavailable(&state, &err.to_string()).await,
            }
        }
        Err(err) => {
            tracing::warn!(%url, error = %err, "backend unreachable");
            unavailable(&state, &err.to_string()).await
        }
    }
}

/// Build the 503 response, including a best-effort backend health probe.
async fn unavailable(state: &ProxyState, details: &str) -> Response {
    let health = probe_health(state).await;
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(unavailable_body(details, health)),
    )
        .into_response()
}

/// Ask the backend's health endpoint directly so the 503 body can distinguish
/// "backend down" from "backend up but this endpoint broken".
async fn probe_health(state: &ProxyState) -> Option<serde_json::Value> {
    let url = format!("{}/api/health", state.backend);
    let response = state
        .http
        .get(&url)
        .timeout(Duration::from_secs(HEALTH_PROBE_TIMEOUT_SECS))
        .send()
        .await
        .ok()?;
    response.json().await.ok()
}

fn forward_url(backend: &str, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("{backend}{path_and_query}")
}

fn unavailable_body(details: &str, health: Option<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "error": "backend_unreachable",
        "message": "The backtest backend did not answer. Is it running?",
        "details": details,
        "health": health,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::Request;
    use tower::ServiceExt;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    /// Closed local port: connections are refused immediately, and the short
    /// client timeout bounds anything that isn't.
    fn test_router() -> Router {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("build test client");
        router(ProxyState {
            http,
            backend: "http://127.0.0.1:1".into(),
        })
    }

    #[test]
    fn forward_url_preserves_path_and_query() {
        let url = forward_url(
            "http://127.0.0.1:5000",
            &uri("/api/strategy_data?symbol=MSFT&strategy=RSI&start_date=2024-01-01"),
        );
        assert_eq!(
            url,
            "http://127.0.0.1:5000/api/strategy_data?symbol=MSFT&strategy=RSI&start_date=2024-01-01"
        );
    }

    #[test]
    fn forward_url_without_query() {
        let url = forward_url("http://localhost:5000", &uri("/api/health"));
        assert_eq!(url, "http://localhost:5000/api/health");
    }

    #[test]
    fn unavailable_body_has_diagnostic_fields() {
        let body = unavailable_body("connection refused", None);
        assert_eq!(body["error"], "backend_unreachable");
        assert!(body["message"].as_str().unwrap().contains("backend"));
        assert_eq!(body["details"], "connection refused");
        assert!(body["health"].is_null());
    }

    #[test]
    fn unavailable_body_embeds_health_probe() {
        let health = serde_json::json!({ "status": "ok" });
        let body = unavailable_body("HTTP 500", Some(health));
        assert_eq!(body["health"]["status"], "ok");
    }

    #[tokio::test]
    async fn preflight_is_answered_with_cors_headers() {
        let app = test_router();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/strategy_data")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap();
        assert!(methods.contains("GET"), "{methods}");
        assert!(methods.contains("OPTIONS"), "{methods}");
    }

    #[tokio::test]
    async fn unreachable_backend_yields_cors_tagged_503() {
        let app = test_router();
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "backend_unreachable");
        assert!(body["health"].is_null());
    }
}
