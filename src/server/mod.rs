//! HTTP server.
//!
//! Serves the home page, the analysis page, the JSON data and bonus APIs,
//! a health check, and Prometheus metrics.

pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

use anyhow::{Context, Result};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub use metrics::Metrics;
pub use state::AppState;

/// Build the application router.
///
/// Every route except `/metrics` is wrapped by the metrics middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/analyze", get(routes::analyze))
        .route("/api/data", get(routes::api_data))
        .route("/api/bonus", get(routes::api_bonus))
        .route("/health", get(routes::health))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track_metrics,
        ))
        .route("/metrics", get(routes::metrics))
        .fallback(routes::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind to `addr` and serve until Ctrl-C.
pub async fn serve(state: Arc<AppState>, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let local = listener.local_addr().context("Failed to read local address")?;
    info!("Listening on http://{}", local);
    println!("🚀 Server running at http://{}", local);
    println!("   📊 Analysis:  http://{}/analyze", local);
    println!("   📈 Metrics:   http://{}/metrics", local);
    println!("   ❤️  Health:    http://{}/health", local);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bonus::{BonusPicker, DEFAULT_CANDIDATES};
    use crate::data::sample_records;
    use crate::models::Record;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state(records: Vec<Record>, strict: bool) -> Arc<AppState> {
        Arc::new(AppState {
            records,
            strict,
            bonus: BonusPicker::default(),
            title: "お年玉データ分析".to_string(),
            metrics: Metrics::new().unwrap(),
        })
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_api_data() {
        let app = router(test_state(sample_records(), false));
        let (status, body) = get_body(app, "/api/data").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["total_amount"], 79000);
        assert_eq!(value["max_amount"], 10000);
        assert_eq!(value["min_amount"], 2000);
        assert_eq!(value["count"], 15);
        assert_eq!(value["yearly_data"].as_array().map(Vec::len), Some(15));
        assert_eq!(value["top_givers"]["おじいちゃん"], 40000);
    }

    #[tokio::test]
    async fn test_api_data_empty() {
        let app = router(test_state(vec![], false));
        let (status, body) = get_body(app, "/api/data").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["total_amount"], 0);
        assert_eq!(value["average_amount"], 0.0);
        assert_eq!(value["top_givers"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_api_bonus() {
        let app = router(test_state(sample_records(), false));
        let (status, body) = get_body(app, "/api/bonus").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let amount = value["amount"].as_i64().unwrap();
        assert!(DEFAULT_CANDIDATES.contains(&amount));
    }

    #[tokio::test]
    async fn test_pages() {
        let state = test_state(sample_records(), false);

        let (status, body) = get_body(router(state.clone()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href=\"/analyze\""));

        let (status, body) = get_body(router(state), "/analyze").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("¥79,000"));
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(test_state(vec![], false));
        let (status, body) = get_body(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_not_found() {
        let app = router(test_state(vec![], false));
        let (status, body) = get_body(app, "/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("\"error\""));
    }

    #[tokio::test]
    async fn test_strict_mode_rejects_invalid_records() {
        let state = test_state(vec![Record::new(2020, -500, "A")], true);

        let (status, body) = get_body(router(state.clone()), "/api/data").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("invalid record at index 0"));

        let (status, _) = get_body(router(state), "/analyze").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_permissive_mode_accepts_negative_amounts() {
        let app = router(test_state(vec![Record::new(2020, -500, "A")], false));
        let (status, body) = get_body(app, "/api/data").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"total_amount\":-500"));
    }

    #[tokio::test]
    async fn test_metrics_track_requests() {
        let state = test_state(sample_records(), true);

        get_body(router(state.clone()), "/health").await;
        get_body(router(state.clone()), "/api/data").await;

        let (status, body) = get_body(router(state), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(
            "http_requests_total{method=\"GET\",path=\"/health\",status=\"200\"} 1"
        ));
        assert!(body.contains(
            "http_requests_total{method=\"GET\",path=\"/api/data\",status=\"200\"} 1"
        ));
        assert!(body.contains("http_request_duration_seconds_bucket"));
        assert!(!body.contains("path=\"/metrics\""));
    }
}
