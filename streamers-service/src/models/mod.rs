/// Data structures for streams, games, and the aggregated collection
///
/// Field names mirror the upstream Twitch payloads so the same types
/// deserialize wire responses and serialize the cached snapshot. Every
/// field is defaulted: a malformed upstream payload degrades to
/// zero-valued data instead of an error.
use serde::{Deserialize, Serialize};

/// Display metadata for a game, fetched once per distinct identifier per
/// aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub box_art_url: String,
}

/// One live stream, as returned by the Helix streams endpoint and enriched
/// by the pipeline. `game` stays zero-valued until the metadata resolver
/// attaches it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub game_id: String,
    #[serde(default)]
    pub game: Game,
}

/// The aggregated, ranked collection. This is the unit cached and rendered.
///
/// Invariant: `total == streams.len()`, enforced at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamCollection {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub streams: Vec<Stream>,
}

impl StreamCollection {
    pub fn new(streams: Vec<Stream>) -> Self {
        Self {
            total: streams.len(),
            streams,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// One page of the extension live-activated-channels list. An empty
/// `cursor` signals the final page. Transient, dropped after its page is
/// dispatched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelPage {
    #[serde(default)]
    pub cursor: String,
    #[serde(default)]
    pub channels: Vec<ActivatedChannel>,
}

/// A channel the extension client has registered to query. Only `username`
/// feeds the pipeline; the remaining fields are carried for parity with the
/// upstream payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivatedChannel {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub game: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub view_count: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_total_matches_len() {
        let streams = vec![Stream::default(), Stream::default()];
        let collection = StreamCollection::new(streams);
        assert_eq!(collection.total, 2);
        assert_eq!(collection.total, collection.streams.len());
    }

    #[test]
    fn test_empty_collection() {
        let collection = StreamCollection::new(Vec::new());
        assert!(collection.is_empty());
        assert_eq!(collection.total, 0);
    }

    #[test]
    fn test_channel_page_tolerates_missing_fields() {
        let page: ChannelPage = serde_json::from_str("{}").unwrap();
        assert!(page.cursor.is_empty());
        assert!(page.channels.is_empty());

        let page: ChannelPage =
            serde_json::from_str(r#"{"cursor":"c1","channels":[{"username":"ana"}]}"#).unwrap();
        assert_eq!(page.cursor, "c1");
        assert_eq!(page.channels[0].username, "ana");
        assert!(page.channels[0].id.is_empty());
    }

    #[test]
    fn test_stream_deserializes_helix_payload() {
        let raw = r#"{
            "user_name": "ana",
            "user_id": "42",
            "title": "speedrun",
            "thumbnail_url": "https://x/{height}x{width}.jpg",
            "viewer_count": 1337,
            "game_id": "g1"
        }"#;
        let stream: Stream = serde_json::from_str(raw).unwrap();
        assert_eq!(stream.user_name, "ana");
        assert_eq!(stream.viewer_count, 1337);
        assert_eq!(stream.game, Game::default());
    }
}
