//! Prometheus request metrics.
//!
//! Every tracked route passes through [`track_metrics`], which records the
//! final status code and the handler latency.

use crate::server::state::AppState;
use axum::body::Body;
use axum::extract::{MatchedPath, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Metric handles plus the registry they are exposed from.
pub struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["path", "method", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Duration of HTTP requests in seconds",
            ),
            &["path", "method"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
        })
    }

    /// Record one completed request.
    pub fn observe(&self, path: &str, method: &str, status: u16, seconds: f64) {
        self.request_duration
            .with_label_values(&[path, method])
            .observe(seconds);
        let status = status.to_string();
        self.requests_total
            .with_label_values(&[path, method, status.as_str()])
            .inc();
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Content type of [`Metrics::render`] output.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

/// Middleware recording request count and latency per route.
///
/// Must be installed with `Router::route_layer` so the matched route
/// template is available as the `path` label.
pub async fn track_metrics(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed = start.elapsed().as_secs_f64();
    state.metrics.observe(&path, &method, status, elapsed);
    debug!("{} {} -> {} ({:.3}ms)", method, path, status, elapsed * 1000.0);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_and_render() {
        let metrics = Metrics::new().unwrap();
        metrics.observe("/health", "GET", 200, 0.002);
        metrics.observe("/health", "GET", 200, 0.004);
        metrics.observe("/api/data", "GET", 422, 0.001);

        let text = metrics.render().unwrap();
        assert!(text.contains("# TYPE http_requests_total counter"));
        assert!(text.contains(
            "http_requests_total{method=\"GET\",path=\"/health\",status=\"200\"} 2"
        ));
        assert!(text.contains(
            "http_requests_total{method=\"GET\",path=\"/api/data\",status=\"422\"} 1"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_count{method=\"GET\",path=\"/health\"} 2"
        ));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = Metrics::new().unwrap();
        let b = Metrics::new().unwrap();
        a.observe("/", "GET", 200, 0.1);

        assert!(!b.render().unwrap().contains("path=\"/\""));
    }

    #[test]
    fn test_content_type() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.content_type().starts_with("text/plain"));
    }
}
