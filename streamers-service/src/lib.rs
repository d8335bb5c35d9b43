/// Streamers Service Library
///
/// Aggregates "currently live" streamer data for an extension client from the
/// Twitch API, enriches it with per-game metadata, caches the aggregate in
/// Redis for a short TTL, and serves it as JSON or rendered HTML.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and content negotiation
/// - `models`: Wire and cache data structures
/// - `services`: Aggregation pipeline and cache-aside orchestration
/// - `twitch`: Upstream Twitch API client
/// - `cache`: Redis-backed stream collection cache
/// - `render`: Pre-loaded handlebars template rendering
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod render;
pub mod services;
pub mod twitch;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{AppError, Result};
