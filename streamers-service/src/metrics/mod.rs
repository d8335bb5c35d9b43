use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Stream cache events (hit/miss/empty/error).
    pub static ref STREAM_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "stream_cache_events_total",
        "Stream cache lookups segmented by outcome",
        &["event"]
    )
    .expect("failed to register stream_cache_events_total");

    /// Stream cache write results (success/error).
    pub static ref STREAM_CACHE_WRITE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "stream_cache_write_total",
        "Stream cache write attempts segmented by outcome",
        &["result"]
    )
    .expect("failed to register stream_cache_write_total");

    /// Upstream Twitch requests by endpoint and outcome.
    pub static ref UPSTREAM_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "upstream_request_total",
        "Upstream Twitch API requests segmented by endpoint and outcome",
        &["endpoint", "outcome"]
    )
    .expect("failed to register upstream_request_total");
}
