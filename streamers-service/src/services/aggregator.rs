//! Aggregation pipeline: walks the cursor-paginated activated-channels
//! list, enriches each page concurrently with live stream details and game
//! metadata, and merges everything into one ranked collection.
//!
//! Error policy is partial data over total failure: a failed page, stream
//! batch, or game batch degrades to "no data from that unit" and the
//! pipeline continues. Only an unreachable first page aborts the run.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, warn};

use crate::error::{AppError, Result};
use crate::models::{Stream, StreamCollection};
use crate::twitch::TwitchApi;

/// Upstream limit on ids per games metadata request.
pub const GAMES_BATCH_SIZE: usize = 100;

const THUMBNAIL_HEIGHT: &str = "360";
const THUMBNAIL_WIDTH: &str = "640";

pub struct StreamAggregator {
    api: Arc<dyn TwitchApi>,
    client_id: String,
}

impl StreamAggregator {
    pub fn new(api: Arc<dyn TwitchApi>, client_id: impl Into<String>) -> Self {
        Self {
            api,
            client_id: client_id.into(),
        }
    }

    /// Run the full pipeline and return the ranked collection.
    ///
    /// Page fetches are sequential (each needs the previous cursor) but one
    /// enrichment task is spawned per non-empty page, so enrichment fan-outs
    /// overlap with the remaining page fetches and with each other. Each
    /// task owns its own stream slice; this single coordinator merges them
    /// after the join, so no shared mutable state crosses tasks.
    pub async fn load_streamers(&self) -> Result<StreamCollection> {
        let mut cursor = String::new();
        let mut first_page = true;
        let mut tasks: JoinSet<Vec<Stream>> = JoinSet::new();

        loop {
            let page = match self
                .api
                .live_activated_channels(&self.client_id, &cursor)
                .await
            {
                Ok(page) => page,
                Err(e) if first_page => {
                    error!("First channel page unreachable, aborting pipeline: {}", e);
                    tasks.shutdown().await;
                    return Err(AppError::Upstream(format!(
                        "activated channels unavailable: {}",
                        e
                    )));
                }
                Err(e) => {
                    warn!("Channel page fetch failed, serving partial data: {}", e);
                    break;
                }
            };
            first_page = false;
            cursor = page.cursor;

            let usernames: Vec<String> = page
                .channels
                .into_iter()
                .map(|c| c.username)
                .filter(|u| !u.is_empty())
                .collect();

            if !usernames.is_empty() {
                let api = Arc::clone(&self.api);
                let client_id = self.client_id.clone();
                tasks.spawn(async move { enrich_page(api, &client_id, &usernames).await });
            }

            if cursor.is_empty() {
                break;
            }
        }

        // Wait for every dispatched enrichment unit; completion order is
        // irrelevant because the sort below imposes the final order.
        let mut merged: Vec<Stream> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(streams) => merged.extend(streams),
                Err(e) => warn!("Page enrichment task failed: {}", e),
            }
        }

        // Stable sort: streams with equal viewer counts keep merge order.
        merged.sort_by(|a, b| b.viewer_count.cmp(&a.viewer_count));

        Ok(StreamCollection::new(merged))
    }
}

/// Enrich one page of usernames: a single live-streams lookup, thumbnail
/// normalization, then game metadata resolution. Failure yields an empty
/// slice for this page only.
async fn enrich_page(
    api: Arc<dyn TwitchApi>,
    client_id: &str,
    usernames: &[String],
) -> Vec<Stream> {
    let mut streams = match api.streams_by_login(client_id, usernames).await {
        Ok(streams) => streams,
        Err(e) => {
            warn!(
                "Stream lookup failed for page of {} channels: {}",
                usernames.len(),
                e
            );
            return Vec::new();
        }
    };

    for stream in &mut streams {
        stream.thumbnail_url =
            set_resolution(&stream.thumbnail_url, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH);
    }

    resolve_games(api.as_ref(), client_id, &mut streams).await;
    streams
}

/// Attach game metadata in place for every stream in the slice.
///
/// Distinct game ids are collected in first-seen order and requested in
/// batches of at most [`GAMES_BATCH_SIZE`]. A failed batch leaves its
/// streams with the zero-valued game and resolution continues.
pub(crate) async fn resolve_games(api: &dyn TwitchApi, client_id: &str, streams: &mut [Stream]) {
    let game_ids = distinct_game_ids(streams);

    for batch in game_ids.chunks(GAMES_BATCH_SIZE) {
        let games = match api.games_by_id(client_id, batch).await {
            Ok(games) => games,
            Err(e) => {
                warn!("Game metadata batch of {} ids failed: {}", batch.len(), e);
                continue;
            }
        };

        for game in games {
            for stream in streams.iter_mut() {
                if stream.game_id == game.id {
                    stream.game = game.clone();
                }
            }
        }
    }
}

/// Distinct game ids in first-seen order, empty ids dropped.
pub(crate) fn distinct_game_ids(streams: &[Stream]) -> Vec<String> {
    let mut seen = HashSet::new();
    streams
        .iter()
        .filter(|s| !s.game_id.is_empty())
        .filter(|s| seen.insert(s.game_id.clone()))
        .map(|s| s.game_id.clone())
        .collect()
}

/// Substitute the upstream thumbnail placeholder tokens with a concrete
/// resolution.
pub(crate) fn set_resolution(url: &str, height: &str, width: &str) -> String {
    url.replace("{height}", height).replace("{width}", width)
}
