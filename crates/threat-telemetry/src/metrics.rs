//! Prometheus metrics for the threat-map runtime.
//!
//! All metrics follow the naming convention: `tm_<component>_<metric>`

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Dedicated registry; `gather_text` renders only these collectors.
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SYNTHESIS / STORE
    // =========================================================================

    /// Attack events produced by a synthesizer tick
    pub static ref EVENTS_SYNTHESIZED: IntCounter = register(IntCounter::new(
        "tm_synthesis_events_total",
        "Total attack events synthesized"
    ).expect("metric creation failed"));

    /// Flows removed by TTL expiry
    pub static ref FLOWS_EXPIRED: IntCounter = register(IntCounter::new(
        "tm_store_flows_expired_total",
        "Total flows pruned after their TTL elapsed"
    ).expect("metric creation failed"));

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Listener callbacks that returned an error or panicked
    pub static ref LISTENER_FAILURES: IntCounter = register(IntCounter::new(
        "tm_dispatch_listener_failures_total",
        "Total listener invocations that failed"
    ).expect("metric creation failed"));

    // =========================================================================
    // GATEWAY
    // =========================================================================

    /// Currently open streaming sessions (WebSocket and SSE)
    pub static ref ACTIVE_STREAM_SESSIONS: IntGauge = register(IntGauge::new(
        "tm_gateway_active_sessions",
        "Number of open streaming sessions"
    ).expect("metric creation failed"));

    /// Frames written to remote peers
    pub static ref FRAMES_SENT: IntCounter = register(IntCounter::new(
        "tm_gateway_frames_sent_total",
        "Total frames sent to remote peers"
    ).expect("metric creation failed"));

    /// Inbound frames that failed to decode
    pub static ref MALFORMED_FRAMES: IntCounter = register(IntCounter::new(
        "tm_gateway_malformed_frames_total",
        "Total inbound frames dropped as malformed"
    ).expect("metric creation failed"));
}

fn register<C>(collector: C) -> C
where
    C: prometheus::core::Collector + Clone + 'static,
{
    // Each collector is registered exactly once, from its lazy initializer.
    REGISTRY
        .register(Box::new(collector.clone()))
        .expect("metric registration failed");
    collector
}

/// Force registration of every collector so a scrape sees all series.
fn touch_all() {
    lazy_static::initialize(&EVENTS_SYNTHESIZED);
    lazy_static::initialize(&FLOWS_EXPIRED);
    lazy_static::initialize(&LISTENER_FAILURES);
    lazy_static::initialize(&ACTIVE_STREAM_SESSIONS);
    lazy_static::initialize(&FRAMES_SENT);
    lazy_static::initialize(&MALFORMED_FRAMES);
}

/// Encode all metrics as Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    touch_all();
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}
