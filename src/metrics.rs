/// Metrics and telemetry for the concierge resolver
///
/// Provides Prometheus-compatible metrics for monitoring:
/// - Profile cache hit/miss rates and size
/// - External source lookups by outcome
/// - External source latencies

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // ========== Cache Metrics ==========

    /// Profile cache hits
    pub static ref CACHE_HITS_TOTAL: IntCounter = register_int_counter!(
        "resolver_cache_hits_total",
        "Total number of profile cache hits"
    )
    .unwrap();

    /// Profile cache misses
    pub static ref CACHE_MISSES_TOTAL: IntCounter = register_int_counter!(
        "resolver_cache_misses_total",
        "Total number of profile cache misses"
    )
    .unwrap();

    /// Profile cache size (number of entries)
    pub static ref CACHE_ENTRIES: IntGauge = register_int_gauge!(
        "resolver_cache_entries",
        "Number of profiles held in the cache"
    )
    .unwrap();

    // ========== Source Metrics ==========

    /// External lookups by source and outcome
    pub static ref SOURCE_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "resolver_source_lookups_total",
        "Total number of external identity source lookups",
        &["source", "outcome"]
    )
    .unwrap();

    /// External lookup duration in seconds
    pub static ref SOURCE_LOOKUP_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "resolver_source_lookup_duration_seconds",
        "External identity source latencies in seconds",
        &["source"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record a cache access
pub fn record_cache_access(hit: bool) {
    if hit {
        CACHE_HITS_TOTAL.inc();
    } else {
        CACHE_MISSES_TOTAL.inc();
    }
}

/// Record the current cache size
pub fn record_cache_size(entries: usize) {
    CACHE_ENTRIES.set(entries as i64);
}

/// Record an external source lookup
pub fn record_source_lookup(source: &str, outcome: &str, duration: f64) {
    SOURCE_LOOKUPS_TOTAL
        .with_label_values(&[source, outcome])
        .inc();
    SOURCE_LOOKUP_DURATION_SECONDS
        .with_label_values(&[source])
        .observe(duration);
}
