//! Prometheus metrics registry for the honours forecaster.
//!
//! [`AppMetrics`] owns all registered metrics and the [`Registry`] they
//! belong to. Construct it once at startup, wrap in `Arc`, and hand it to
//! the API state and the HTTP middleware.
//!
//! Exposed at `GET /metrics` in Prometheus text exposition format
//! (`text/plain; version=0.0.4`).

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use prometheus::{Counter, CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry};

use crate::classification::Forecast;

pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// All application-level Prometheus metrics.
pub struct AppMetrics {
    /// Forecasts produced, labelled by final class.
    pub classifications_total: CounterVec,
    /// Forecast requests where the credit precondition failed.
    pub forecasts_suppressed_total: Counter,
    /// Current number of modules held in the store.
    pub modules_stored: Gauge,
    /// HTTP request count, labelled by method, path, and status code.
    pub http_requests_total: CounterVec,
    /// HTTP request latency histogram in seconds.
    pub http_request_duration: Histogram,
    /// The registry that owns all of the above metrics.
    pub registry: Registry,
}

impl AppMetrics {
    /// Create and register all metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let classifications_total = CounterVec::new(
            Opts::new(
                "honours_forecast_classifications_total",
                "Forecasts produced by final classification",
            ),
            &["classification"],
        )?;

        let forecasts_suppressed_total = Counter::with_opts(Opts::new(
            "honours_forecast_forecasts_suppressed_total",
            "Forecast requests whose credits did not meet the 120-240 both-level precondition",
        ))?;

        let modules_stored = Gauge::with_opts(Opts::new(
            "honours_forecast_modules_stored",
            "Current size of the ModuleStore",
        ))?;

        let http_requests_total = CounterVec::new(
            Opts::new(
                "honours_forecast_http_requests_total",
                "HTTP requests by method, path, and status",
            ),
            &["method", "path", "status"],
        )?;

        let http_request_duration = Histogram::with_opts(
            HistogramOpts::new(
                "honours_forecast_http_request_duration_seconds",
                "HTTP request latency in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        )?;

        registry.register(Box::new(classifications_total.clone()))?;
        registry.register(Box::new(forecasts_suppressed_total.clone()))?;
        registry.register(Box::new(modules_stored.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration.clone()))?;

        Ok(Self {
            classifications_total,
            forecasts_suppressed_total,
            modules_stored,
            http_requests_total,
            http_request_duration,
            registry,
        })
    }

    /// Count a forecast by its outcome.
    pub fn record_forecast(&self, forecast: &Forecast) {
        match &forecast.result {
            Some(result) => self
                .classifications_total
                .with_label_values(&[result.classification.as_str()])
                .inc(),
            None => self.forecasts_suppressed_total.inc(),
        }
    }

    /// Render all metrics as Prometheus text format (for the `/metrics` endpoint).
    pub fn render(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap_or_default())
    }
}

/// `GET /metrics` handler.
pub async fn metrics_handler(State(metrics): State<Arc<AppMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
            Body::from(body),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Failed to render metrics: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics error").into_response()
        }
    }
}

/// Middleware recording request count and latency per matched route.
pub async fn track_http(
    State(metrics): State<Arc<AppMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();
    metrics
        .http_request_duration
        .observe(start.elapsed().as_secs_f64());

    response
}
