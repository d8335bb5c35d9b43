/// Configuration management for Streamers Service
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Cache (Redis) configuration
    pub cache: CacheConfig,
    /// Upstream Twitch API configuration
    pub twitch: TwitchConfig,
    /// Template rendering configuration
    pub template: TemplateConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Cache (Redis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL
    pub url: String,
    /// TTL applied to cached stream collections, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

/// Upstream Twitch API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchConfig {
    /// Extension client identifier, sent as the Client-Id header and used
    /// as the cache key prefix
    pub client_id: String,
    /// Base URL of the Twitch API
    pub api_base: String,
}

/// Template rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Path to the handlebars template rendered for non-JSON requests
    pub path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("STREAMERS_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("STREAMERS_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8085),
            },
            cache: CacheConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
                ttl_secs: std::env::var("STREAMS_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_cache_ttl_secs),
            },
            twitch: TwitchConfig {
                client_id: std::env::var("TWITCH_CLIENT_ID")
                    .map_err(|_| "TWITCH_CLIENT_ID must be set".to_string())?,
                api_base: std::env::var("TWITCH_API_BASE")
                    .unwrap_or_else(|_| "https://api.twitch.tv".to_string()),
            },
            template: TemplateConfig {
                path: std::env::var("STREAMERS_TEMPLATE_PATH")
                    .unwrap_or_else(|_| "templates/streamers.html".to_string()),
            },
        })
    }
}

fn default_cache_ttl_secs() -> u64 {
    60
}
