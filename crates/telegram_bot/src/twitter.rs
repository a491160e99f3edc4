//! Client for the Twitter read API.
//!
//! Constructed once at startup and handed to the bot; when construction
//! fails or credentials are missing the bot carries `None` and the sync
//! command reports the feature as unavailable.

use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde::Deserialize;

/// A fetched post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub author: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TwitterError {
    #[error("invalid bearer token: {0}")]
    InvalidToken(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("user {0} not found")]
    UnknownHandle(String),
}

#[derive(Clone, Debug)]
pub struct TwitterClient {
    client: Client,
    base_url: String,
}

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

#[derive(Debug, Deserialize)]
struct UserLookup {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
}

impl TwitterClient {
    /// Builds a client with the bearer token baked into the default headers
    /// and a bounded per-request timeout.
    pub fn new(bearer_token: &str, timeout: Duration) -> Result<Self, TwitterError> {
        let mut auth = header::HeaderValue::try_from(format!("Bearer {bearer_token}"))
            .map_err(|err| TwitterError::InvalidToken(err.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TwitterError> {
        let resp = self.client.get(self.url(path)).query(query).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }

        let message = resp
            .text()
            .await
            .unwrap_or_else(|_| "server error".to_string());
        Err(TwitterError::Server { status, message })
    }

    /// Fetches up to `limit` recent posts for `handle`, newest first.
    pub async fn recent_posts(&self, handle: &str, limit: u8) -> Result<Vec<Post>, TwitterError> {
        let lookup: UserLookup = self
            .get_json(&format!("/2/users/by/username/{handle}"), &[])
            .await?;
        let Some(user) = lookup.data else {
            return Err(TwitterError::UnknownHandle(handle.to_string()));
        };

        let timeline: Timeline = self
            .get_json(
                &format!("/2/users/{}/tweets", user.id),
                &[("max_results", limit.to_string())],
            )
            .await?;

        Ok(timeline
            .data
            .into_iter()
            .map(|tweet| Post {
                author: user.name.clone(),
                text: tweet.text,
            })
            .collect())
    }
}
