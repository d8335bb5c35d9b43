//! Hand-rolled fakes for the upstream API and the cache store, shared by
//! the service-level unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::cache::CacheStore;
use crate::error::{AppError, Result};
use crate::models::{ActivatedChannel, ChannelPage, Game, Stream, StreamCollection};
use crate::twitch::TwitchApi;

/// Scripted Twitch API double. Pages are served in the order they were
/// added; stream and game lookups answer from fixed maps. Call counts are
/// recorded so tests can assert on upstream traffic.
pub(crate) struct FakeTwitch {
    pages: Mutex<VecDeque<std::result::Result<ChannelPage, String>>>,
    streams: HashMap<String, Stream>,
    games: HashMap<String, Game>,
    fail_streams: bool,
    fail_games: bool,
    page_calls: AtomicUsize,
    stream_calls: AtomicUsize,
    game_calls: AtomicUsize,
    game_batch_sizes: Mutex<Vec<usize>>,
}

impl FakeTwitch {
    pub(crate) fn new() -> Self {
        Self {
            pages: Mutex::new(VecDeque::new()),
            streams: HashMap::new(),
            games: HashMap::new(),
            fail_streams: false,
            fail_games: false,
            page_calls: AtomicUsize::new(0),
            stream_calls: AtomicUsize::new(0),
            game_calls: AtomicUsize::new(0),
            game_batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_page(self, cursor: &str, usernames: &[&str]) -> Self {
        let page = ChannelPage {
            cursor: cursor.to_string(),
            channels: usernames
                .iter()
                .map(|u| ActivatedChannel {
                    username: u.to_string(),
                    ..ActivatedChannel::default()
                })
                .collect(),
        };
        self.pages.lock().unwrap().push_back(Ok(page));
        self
    }

    pub(crate) fn with_page_error(self, message: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub(crate) fn with_live_stream(
        mut self,
        username: &str,
        viewer_count: u64,
        game_id: &str,
    ) -> Self {
        self.streams.insert(
            username.to_string(),
            Stream {
                user_id: format!("id-{}", username),
                user_name: username.to_string(),
                title: format!("{} live", username),
                thumbnail_url: "https://x/{height}x{width}.jpg".to_string(),
                viewer_count,
                game_id: game_id.to_string(),
                game: Game::default(),
            },
        );
        self
    }

    pub(crate) fn with_game(mut self, id: &str, name: &str) -> Self {
        self.games.insert(
            id.to_string(),
            Game {
                id: id.to_string(),
                name: name.to_string(),
                box_art_url: format!("https://x/{}-box.jpg", id),
            },
        );
        self
    }

    pub(crate) fn fail_streams(mut self) -> Self {
        self.fail_streams = true;
        self
    }

    pub(crate) fn fail_games(mut self) -> Self {
        self.fail_games = true;
        self
    }

    pub(crate) fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn stream_calls(&self) -> usize {
        self.stream_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn game_calls(&self) -> usize {
        self.game_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn game_batch_sizes(&self) -> Vec<usize> {
        self.game_batch_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl TwitchApi for FakeTwitch {
    async fn live_activated_channels(
        &self,
        _client_id: &str,
        _cursor: &str,
    ) -> Result<ChannelPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.lock().unwrap().pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(AppError::Upstream(message)),
            None => Ok(ChannelPage::default()),
        }
    }

    async fn streams_by_login(
        &self,
        _client_id: &str,
        usernames: &[String],
    ) -> Result<Vec<Stream>> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_streams {
            return Err(AppError::Upstream("streams lookup failed".to_string()));
        }
        Ok(usernames
            .iter()
            .filter_map(|u| self.streams.get(u))
            .cloned()
            .collect())
    }

    async fn games_by_id(&self, _client_id: &str, ids: &[String]) -> Result<Vec<Game>> {
        self.game_calls.fetch_add(1, Ordering::SeqCst);
        self.game_batch_sizes.lock().unwrap().push(ids.len());
        if self.fail_games {
            return Err(AppError::Upstream("games lookup failed".to_string()));
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.games.get(id))
            .cloned()
            .collect())
    }
}

/// In-memory cache store double.
pub(crate) struct MemoryCache {
    inner: Mutex<HashMap<String, StreamCollection>>,
    fail_writes: bool,
    write_count: AtomicUsize,
}

impl MemoryCache {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            fail_writes: false,
            write_count: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub(crate) fn seed(&self, client_id: &str, collection: StreamCollection) {
        self.inner
            .lock()
            .unwrap()
            .insert(client_id.to_string(), collection);
    }

    pub(crate) fn peek(&self, client_id: &str) -> Option<StreamCollection> {
        self.inner.lock().unwrap().get(client_id).cloned()
    }

    pub(crate) fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn read(&self, client_id: &str) -> Option<StreamCollection> {
        self.inner.lock().unwrap().get(client_id).cloned()
    }

    async fn write(&self, client_id: &str, collection: &StreamCollection) -> Result<()> {
        if self.fail_writes {
            return Err(AppError::CacheError("write refused".to_string()));
        }
        self.write_count.fetch_add(1, Ordering::SeqCst);
        self.inner
            .lock()
            .unwrap()
            .insert(client_id.to_string(), collection.clone());
        Ok(())
    }
}
