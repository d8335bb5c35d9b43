use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::metrics::{STREAM_CACHE_EVENTS, STREAM_CACHE_WRITE_TOTAL};
use crate::models::StreamCollection;

/// Key-value store holding serialized stream collections per client.
///
/// Reads never fail: a missing key, a store error, or an unparseable value
/// all surface as a miss, and the caller recomputes.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn read(&self, client_id: &str) -> Option<StreamCollection>;
    async fn write(&self, client_id: &str, collection: &StreamCollection) -> Result<()>;
}

/// Stream collection cache backed by Redis. Staleness is delegated to the
/// store's own key expiry, set at write time.
#[derive(Clone)]
pub struct StreamCache {
    redis: ConnectionManager,
    ttl: Duration,
}

impl StreamCache {
    pub fn new(redis: ConnectionManager, ttl_secs: u64) -> Self {
        Self {
            redis,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn streams_key(client_id: &str) -> String {
        format!("{}:streams", client_id)
    }
}

#[async_trait]
impl CacheStore for StreamCache {
    async fn read(&self, client_id: &str) -> Option<StreamCollection> {
        let key = Self::streams_key(client_id);
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<StreamCollection>(&raw) {
                Ok(collection) => {
                    debug!("Stream cache HIT for client {}", client_id);
                    STREAM_CACHE_EVENTS.with_label_values(&["hit"]).inc();
                    Some(collection)
                }
                Err(e) => {
                    warn!("Unparseable cached streams, treating as miss: {}", e);
                    STREAM_CACHE_EVENTS.with_label_values(&["error"]).inc();
                    None
                }
            },
            Ok(None) => {
                debug!("Stream cache MISS for client {}", client_id);
                STREAM_CACHE_EVENTS.with_label_values(&["miss"]).inc();
                None
            }
            Err(e) => {
                warn!("Redis read error for stream cache: {}", e);
                STREAM_CACHE_EVENTS.with_label_values(&["error"]).inc();
                None
            }
        }
    }

    async fn write(&self, client_id: &str, collection: &StreamCollection) -> Result<()> {
        let key = Self::streams_key(client_id);
        let data = serde_json::to_string(collection)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(&key, data, self.ttl.as_secs())
            .await
            .map_err(|e| {
                STREAM_CACHE_WRITE_TOTAL.with_label_values(&["error"]).inc();
                AppError::CacheError(e.to_string())
            })?;

        debug!(
            "Stream cache WRITE for client {} ({} streams) with TTL {:?}",
            client_id, collection.total, self.ttl
        );
        STREAM_CACHE_WRITE_TOTAL
            .with_label_values(&["success"])
            .inc();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streams_key_format() {
        assert_eq!(StreamCache::streams_key("abc123"), "abc123:streams");
    }
}
