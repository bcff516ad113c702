use crate::domain::model::*;
use crate::error::Result;
use async_trait::async_trait;
use serde::*;

#[async_trait]
pub trait ITweetRepository {
    /// One page of tweets, newest first, ties in insertion order.
    async fn find_page(&self, filter: &TweetFilter, pagination: &Pagination) -> Result<Vec<Tweet>>;
    async fn count(&self) -> Result<i64>;
    async fn find_by_id(&self, id: &TweetID) -> Result<Tweet>;
    async fn create(&self, tweet: Tweet) -> Result<()>;
    /// Appends the comment unless an identical one is already stored.
    async fn append_comment(&self, id: &TweetID, comment: Comment) -> Result<UpdateOutcome>;
    async fn increment_likes(&self, id: &TweetID) -> Result<UpdateOutcome>;
    /// Deletes the tweet only when `owner` authored it, returning what was removed.
    async fn delete_owned(&self, id: &TweetID, owner: &UserID) -> Result<Option<Tweet>>;
}

#[async_trait]
pub trait IUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_summaries(&self, ids: Vec<UserID>) -> Result<Vec<UserSummary>>;
    async fn save(&self, user: User) -> Result<()>;
}

/// A tweet as reported by the third-party provider. Other fields are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTweet {
    pub text: String,
    pub created_at: Option<String>,
}

#[async_trait]
pub trait ITweetSource {
    async fn tweets_by_username(&self, username: &str) -> Result<Vec<ExternalTweet>>;
}

pub trait ITranslator {
    /// Resolves a dotted message key, falling back to the key itself.
    fn translate(&self, key: &str) -> String;
}

#[async_trait]
pub trait IAuthenticator {
    async fn authenticate(&self, token: &str) -> Option<Identity>;
}

#[async_trait]
pub trait IHttpClient {
    async fn get(
        &self,
        url: &str,
        header: Option<reqwest::header::HeaderMap>,
    ) -> Result<reqwest::Response>;
}
