use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::metrics::UPSTREAM_REQUEST_TOTAL;
use crate::models::{ChannelPage, Game, Stream};

const CLIENT_ID_HEADER: &str = "Client-Id";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Seam over the three upstream Twitch calls the pipeline depends on, so
/// the aggregation logic is testable without network access.
#[async_trait]
pub trait TwitchApi: Send + Sync {
    /// One page of the extension live-activated-channels list. An empty
    /// cursor requests the first page.
    async fn live_activated_channels(&self, client_id: &str, cursor: &str)
        -> Result<ChannelPage>;

    /// Live stream details for a batch of usernames. Channels not currently
    /// live are simply absent from the result.
    async fn streams_by_login(&self, client_id: &str, usernames: &[String])
        -> Result<Vec<Stream>>;

    /// Game metadata for a batch of identifiers. Callers guarantee the
    /// batch holds at most 100 ids.
    async fn games_by_id(&self, client_id: &str, ids: &[String]) -> Result<Vec<Game>>;
}

/// Helix list responses wrap their payload in a `data` array.
#[derive(Debug, Default, Deserialize)]
struct DataEnvelope<T: Default> {
    #[serde(default)]
    data: Vec<T>,
}

/// Twitch API client over a shared `reqwest::Client`.
pub struct TwitchClient {
    http: reqwest::Client,
    base_url: String,
}

impl TwitchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T>(
        &self,
        endpoint: &str,
        client_id: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = request
            .header(CLIENT_ID_HEADER, client_id)
            .send()
            .await
            .map_err(|e| {
                UPSTREAM_REQUEST_TOTAL
                    .with_label_values(&[endpoint, "error"])
                    .inc();
                AppError::Upstream(format!("{} request failed: {}", endpoint, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            UPSTREAM_REQUEST_TOTAL
                .with_label_values(&[endpoint, "error"])
                .inc();
            return Err(AppError::Upstream(format!(
                "{} returned status {}",
                endpoint, status
            )));
        }

        UPSTREAM_REQUEST_TOTAL
            .with_label_values(&[endpoint, "success"])
            .inc();

        // A 2xx with a body that does not match the expected shape degrades
        // to zero-valued data, not an error.
        match response.json::<T>().await {
            Ok(body) => Ok(body),
            Err(e) => {
                warn!("Malformed {} payload, treating as empty: {}", endpoint, e);
                Ok(T::default())
            }
        }
    }
}

#[async_trait]
impl TwitchApi for TwitchClient {
    async fn live_activated_channels(
        &self,
        client_id: &str,
        cursor: &str,
    ) -> Result<ChannelPage> {
        let url = format!(
            "{}/extensions/{}/live_activated_channels?cursor={}",
            self.base_url,
            client_id,
            urlencoding::encode(cursor)
        );
        self.get_json("live_activated_channels", client_id, self.http.get(url))
            .await
    }

    async fn streams_by_login(
        &self,
        client_id: &str,
        usernames: &[String],
    ) -> Result<Vec<Stream>> {
        let url = format!("{}/helix/streams", self.base_url);
        let query: Vec<(&str, &str)> = usernames
            .iter()
            .map(|u| ("user_login", u.as_str()))
            .collect();

        let envelope: DataEnvelope<Stream> = self
            .get_json("streams", client_id, self.http.get(url).query(&query))
            .await?;
        Ok(envelope.data)
    }

    async fn games_by_id(&self, client_id: &str, ids: &[String]) -> Result<Vec<Game>> {
        let url = format!("{}/helix/games", self.base_url);
        let query: Vec<(&str, &str)> = ids.iter().map(|id| ("id", id.as_str())).collect();

        let envelope: DataEnvelope<Game> = self
            .get_json("games", client_id, self.http.get(url).query(&query))
            .await?;
        Ok(envelope.data)
    }
}
