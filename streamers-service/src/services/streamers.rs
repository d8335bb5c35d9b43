//! Cache-aside orchestration over the aggregation pipeline.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::error::Result;
use crate::metrics::STREAM_CACHE_EVENTS;
use crate::models::StreamCollection;
use crate::services::StreamAggregator;

pub struct StreamersService {
    aggregator: StreamAggregator,
    cache: Arc<dyn CacheStore>,
    client_id: String,
}

impl StreamersService {
    pub fn new(
        aggregator: StreamAggregator,
        cache: Arc<dyn CacheStore>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            aggregator,
            cache,
            client_id: client_id.into(),
        }
    }

    /// Serve the ranked collection, preferring the cache.
    ///
    /// A cached collection with `total == 0` is treated identically to a
    /// miss: an empty aggregate may be an artifact of a partially failed
    /// earlier write, so it always triggers recomputation. The write-back
    /// after a recompute is fire-and-forget; the response path never waits
    /// on it and a failed write only logs.
    pub async fn get_streamers(&self) -> Result<StreamCollection> {
        if let Some(cached) = self.cache.read(&self.client_id).await {
            if !cached.is_empty() {
                return Ok(cached);
            }
            debug!(
                "Cached collection for client {} is empty, recomputing",
                self.client_id
            );
            STREAM_CACHE_EVENTS.with_label_values(&["empty"]).inc();
        }

        let fresh = self.aggregator.load_streamers().await?;

        let cache = Arc::clone(&self.cache);
        let client_id = self.client_id.clone();
        let snapshot = fresh.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.write(&client_id, &snapshot).await {
                warn!("Best-effort cache write failed for {}: {}", client_id, e);
            }
        });

        Ok(fresh)
    }
}
