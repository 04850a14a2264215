use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all relay metrics
const PREFIX: &str = "relay";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // WebSocket / relay metrics
    pub static ref WS_ACTIVE_CONNECTIONS: Gauge = Gauge::new(
        format!("{PREFIX}_ws_active_connections"),
        "Number of live WebSocket connections"
    ).expect("Failed to create ws_active_connections metric");

    pub static ref UPDATES_TOTAL: Counter = Counter::new(
        format!("{PREFIX}_updates_total"),
        "Client updates accepted and broadcast"
    ).expect("Failed to create updates_total metric");

    pub static ref REJECTED_MESSAGES_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_rejected_messages_total"), "Client messages dropped"),
        &["reason"]
    ).expect("Failed to create rejected_messages_total metric");

    pub static ref DROPPED_SENDS_TOTAL: Counter = Counter::new(
        format!("{PREFIX}_dropped_sends_total"),
        "Broadcast messages dropped because a client buffer was full"
    ).expect("Failed to create dropped_sends_total metric");

    pub static ref LATEST_OUTPUTS_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_latest_outputs_entries"),
        "Distinct client ids held in the last-value cache"
    ).expect("Failed to create latest_outputs_entries metric");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn init_metrics() {
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(WS_ACTIVE_CONNECTIONS.clone()));
    let _ = REGISTRY.register(Box::new(UPDATES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(REJECTED_MESSAGES_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(DROPPED_SENDS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(LATEST_OUTPUTS_ENTRIES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn set_active_connections(count: usize) {
    WS_ACTIVE_CONNECTIONS.set(count as f64);
}

/// Record an accepted update and how many clients missed its broadcast.
pub fn record_update(dropped_sends: usize) {
    UPDATES_TOTAL.inc();
    if dropped_sends > 0 {
        DROPPED_SENDS_TOTAL.inc_by(dropped_sends as f64);
    }
}

pub fn record_rejected_message(reason: &str) {
    REJECTED_MESSAGES_TOTAL.with_label_values(&[reason]).inc();
}

pub fn set_latest_outputs_entries(count: usize) {
    LATEST_OUTPUTS_ENTRIES.set(count as f64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Router served on the dedicated metrics port.
pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}
