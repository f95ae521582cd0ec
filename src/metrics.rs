//! Prometheus metrics for HTTP traffic.
//!
//! This module provides:
//! - Recorder setup with fixed latency buckets
//! - Request middleware recording count, duration and in-flight requests
//! - An RAII guard keeping the in-flight gauge balanced on every exit path

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Total requests counter metric name.
pub const METRIC_HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
/// Request duration histogram metric name.
pub const METRIC_HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
/// In-flight requests gauge metric name.
pub const METRIC_HTTP_IN_FLIGHT: &str = "http_in_flight_requests";

/// Path the exposition is served on. Requests to it are not recorded.
pub const METRICS_PATH: &str = "/metrics";

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Histogram buckets for request duration, in seconds.
pub const DURATION_BUCKETS: &[f64] = &[0.1, 0.3, 0.5, 0.7, 1.0, 1.5, 2.0, 3.0];

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(METRIC_HTTP_REQUEST_DURATION.to_string()),
        DURATION_BUCKETS,
    )
}

fn describe_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
    describe_histogram!(METRIC_HTTP_REQUEST_DURATION, "Duration of HTTP requests");
    describe_gauge!(METRIC_HTTP_IN_FLIGHT, "Number of in-flight HTTP requests");
}

/// Install the global Prometheus recorder and register metric descriptions.
/// Call this once at startup.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = builder()?.install_recorder()?;
    describe_metrics();
    debug!("Metrics initialized");
    Ok(handle)
}

/// Build a handle whose recorder is not installed globally.
///
/// Nothing recorded through the `metrics` macros reaches it; useful where a handle is
/// required but nothing should be recorded.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

/// RAII guard for the in-flight gauge.
/// Increments on creation and decrements when dropped.
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Mark one request as in flight.
    pub fn acquire() -> Self {
        gauge!(METRIC_HTTP_IN_FLIGHT).increment(1.0);
        Self { _private: () }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(METRIC_HTTP_IN_FLIGHT).decrement(1.0);
    }
}

/// Status label, e.g. `OK` or `Not Found`.
pub fn status_label(status: axum::http::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string())
}

/// Record request count, duration and in-flight gauge for every request
/// except the metrics scrape itself.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => UNMATCHED_PATH.to_string(),
    };

    if path == METRICS_PATH {
        return next.run(req).await;
    }

    let method = req.method().to_string();
    let start = Instant::now();

    let response = {
        let _in_flight = InFlightGuard::acquire();
        next.run(req).await
    };

    let duration = start.elapsed().as_secs_f64();
    let status = status_label(response.status());

    counter!(
        METRIC_HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(METRIC_HTTP_REQUEST_DURATION, "method" => method, "path" => path).record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn failing_handler() -> &'static str {
        panic!("handler failure")
    }

    fn request(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn status_label_uses_reason_phrase() {
        assert_eq!(status_label(StatusCode::OK), "OK");
        assert_eq!(status_label(StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(status_label(StatusCode::CREATED), "Created");
    }

    #[test]
    fn status_label_falls_back_to_code() {
        let custom = StatusCode::from_u16(599).unwrap();
        assert_eq!(status_label(custom), "599");
    }

    #[test]
    fn builder_accepts_duration_buckets() {
        assert!(builder().is_ok());
    }

    #[test]
    fn detached_handle_renders_without_recorder() {
        let handle = detached_handle();
        assert!(!handle.render().contains(METRIC_HTTP_REQUESTS_TOTAL));
    }

    #[tokio::test]
    async fn in_flight_gauge_is_released_when_handler_panics() {
        let recorder = builder().unwrap().build_recorder();
        let handle = recorder.handle();
        let _local = metrics::set_default_local_recorder(&recorder);

        let app = Router::new()
            .route("/boom", get(failing_handler))
            .route("/ok", get(|| async { "ok" }))
            .layer(middleware::from_fn(track_requests));

        let failed = tokio::spawn(app.clone().oneshot(request("/boom"))).await;
        assert!(failed.unwrap_err().is_panic());

        let response = app.oneshot(request("/ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let rendered = handle.render();
        assert!(rendered.contains("http_in_flight_requests 0"));
        assert!(rendered.contains(r#"path="/ok""#));
        assert!(!rendered.contains(r#"path="/boom""#));
    }
}
