//! HTTP boundary
//!
//! Thin axum layer over the analyzer: `POST /scan` runs one analysis,
//! `GET /health` reports liveness. The boundary owns everything the core
//! does not: shared-secret verification, body parsing and limits, security
//! response headers, and mapping scan errors to a generic 500.

use crate::analyzer::Analyzer;
use crate::config::ServerConfig;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared secret header checked when auth enforcement is on.
const PROXY_SECRET_HEADER: &str = "x-proxy-secret";

/// Request body limit, matching the analyzer's maximum input size.
const BODY_LIMIT: usize = 262_144;

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
    config: Arc<ServerConfig>,
    started: Instant,
}

/// Build the application router. Separated from [`run`] so tests can drive
/// the router without binding a port.
pub fn app(analyzer: Arc<Analyzer>, config: ServerConfig) -> Router {
    let state = AppState {
        analyzer,
        config: Arc::new(config),
        started: Instant::now(),
    };
    Router::new()
        .route("/scan", post(scan_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(analyzer: Arc<Analyzer>, config: ServerConfig) -> anyhow::Result<()> {
    let port = config.port;
    let router = app(analyzer, config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

fn authorized(config: &ServerConfig, headers: &HeaderMap) -> bool {
    if !config.enforce_auth {
        return true;
    }
    let expected = config.api_secret.as_deref().unwrap_or("");
    headers
        .get(PROXY_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn scan_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let start = Instant::now();

    if !authorized(&state.config, &headers) {
        return (StatusCode::FORBIDDEN, Json(json!({ "e": "Forbidden" }))).into_response();
    }

    let Ok(Json(body)) = body else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "e": "Invalid code" }))).into_response();
    };
    let Some(code) = body.get("code").and_then(|c| c.as_str()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "e": "Invalid code" }))).into_response();
    };

    let analyzer = Arc::clone(&state.analyzer);
    let code = code.to_string();
    // The scan is CPU-bound and the oracle call is sync; keep both off the
    // async workers.
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&code)).await;

    match result {
        Ok(Ok(report)) => {
            let response_headers = [
                ("Cache-Control", "no-store".to_string()),
                (
                    "X-Response-Time",
                    format!("{}ms", start.elapsed().as_millis()),
                ),
                ("X-Security-Score", report.score.to_string()),
                ("X-Finding-Count", report.findings.len().to_string()),
                ("X-Content-Type-Options", "nosniff".to_string()),
                ("X-Frame-Options", "DENY".to_string()),
                ("X-XSS-Protection", "1; mode=block".to_string()),
                ("Referrer-Policy", "no-referrer".to_string()),
                (
                    "Strict-Transport-Security",
                    "max-age=31536000; includeSubDomains".to_string(),
                ),
                (
                    "Content-Security-Policy",
                    "default-src 'none'; frame-ancestors 'none'".to_string(),
                ),
                (
                    "Permissions-Policy",
                    "geolocation=(), microphone=(), camera=()".to_string(),
                ),
                ("Cross-Origin-Opener-Policy", "same-origin".to_string()),
            ];
            (
                StatusCode::OK,
                response_headers,
                Json(json!({ "ok": true, "report": report })),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            // Structural failure: no partial report leaks, only a generic
            // internal error.
            error!(error = %err, "scan failed");
            internal_error()
        }
        Err(join_err) => {
            error!(error = %join_err, "scan task panicked");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "e": "Internal error" })),
    )
        .into_response()
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "uptime": state.started.elapsed().as_secs() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enforce: bool, secret: Option<&str>) -> ServerConfig {
        ServerConfig {
            port: 0,
            api_secret: secret.map(str::to_string),
            enforce_auth: enforce,
        }
    }

    fn header(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(PROXY_SECRET_HEADER, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_auth_disabled_allows_everything() {
        assert!(authorized(&config(false, Some("s3cret")), &HeaderMap::new()));
    }

    #[test]
    fn test_auth_enforced_requires_matching_secret() {
        let cfg = config(true, Some("s3cret"));
        assert!(!authorized(&cfg, &HeaderMap::new()));
        assert!(!authorized(&cfg, &header("wrong")));
        assert!(authorized(&cfg, &header("s3cret")));
    }
}
