use crate::domain::interface::*;
use crate::error::*;
use async_trait::async_trait;
use serde::*;
use std::sync::Arc;
use url::Url;

#[derive(Debug)]
pub enum TweetSourceError {
    InvalidBaseUrl,
}

impl IServiceError for TweetSourceError {
    fn error_type(&self) -> String {
        match self {
            TweetSourceError::InvalidBaseUrl => "invalid_base_url".to_string(),
        }
    }
}

/// Envelope of every Twitter v2 response. `data` is absent when the lookup
/// matched nothing and the API answers with `errors` instead.
#[derive(Deserialize)]
struct TwitterResponse<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct TwitterUser {
    id: String,
}

/// Reads a user's recent tweets from the Twitter v2 API.
pub struct TwitterTweetSource {
    http_client: Arc<dyn IHttpClient + Sync + Send>,
    bearer_token: String,
    api_url: Url,
}

impl TwitterTweetSource {
    pub fn new(
        http_client: Arc<dyn IHttpClient + Sync + Send>,
        bearer_token: String,
        api_url: &str,
    ) -> Result<Self> {
        let api_url = Url::parse(api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(ServiceError::new(
                TweetSourceError::InvalidBaseUrl,
                anyhow::anyhow!("{} cannot be a base url", api_url),
            ));
        }
        Ok(Self {
            http_client,
            bearer_token,
            api_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // checked in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let mut headers = reqwest::header::HeaderMap::new();
        let bearer_token = format!("Bearer {}", self.bearer_token);
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&bearer_token)?,
        );
        let response = self.http_client.get(url.as_str(), Some(headers)).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ITweetSource for TwitterTweetSource {
    async fn tweets_by_username(&self, username: &str) -> Result<Vec<ExternalTweet>> {
        let user: TwitterResponse<TwitterUser> = self
            .get_json(self.endpoint(&["users", "by", "username", username]))
            .await?;
        let user = match user.data {
            Some(user) => user,
            None => {
                tracing::warn!(username, "unknown twitter user");
                return Ok(vec![]);
            }
        };

        let mut url = self.endpoint(&["users", &user.id, "tweets"]);
        url.query_pairs_mut().append_pair("tweet.fields", "created_at");
        let timeline: TwitterResponse<Vec<ExternalTweet>> = self.get_json(url).await?;
        let tweets = timeline.data.unwrap_or_default();
        tracing::debug!(username, count = tweets.len(), "fetched external tweets");
        Ok(tweets)
    }
}
