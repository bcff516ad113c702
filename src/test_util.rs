use crate::domain::interface::*;
use crate::domain::model::*;
use crate::error::*;
use crate::infra::{DBConnector, DBExecutor, DBExecutorError};
use async_trait::async_trait;

/// A migrated SQLite database in a temporary directory. Keep the `TempDir`
/// alive for as long as the connector is used.
pub async fn temp_db() -> (tempfile::TempDir, DBConnector) {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("tweets.sqlite3").to_string_lossy().into_owned();
    let db = DBConnector::new(DBExecutor::new(url, 4));
    db.ensure_initialized().await.unwrap();
    (dir, db)
}

/// Tweet source answering every username with the same tweets.
#[derive(Default)]
pub struct StaticTweetSource(pub Vec<ExternalTweet>);

#[async_trait]
impl ITweetSource for StaticTweetSource {
    async fn tweets_by_username(&self, _username: &str) -> Result<Vec<ExternalTweet>> {
        Ok(self.0.clone())
    }
}

/// Tweet store whose every call fails the way a broken database does.
pub struct FailingTweetRepository;

impl FailingTweetRepository {
    fn fail<T>() -> Result<T> {
        Err(ServiceError::new(
            DBExecutorError::DBError,
            anyhow::anyhow!("disk I/O error"),
        ))
    }
}

#[async_trait]
impl ITweetRepository for FailingTweetRepository {
    async fn find_page(&self, _filter: &TweetFilter, _pagination: &Pagination) -> Result<Vec<Tweet>> {
        Self::fail()
    }

    async fn count(&self) -> Result<i64> {
        Self::fail()
    }

    async fn find_by_id(&self, _id: &TweetID) -> Result<Tweet> {
        Self::fail()
    }

    async fn create(&self, _tweet: Tweet) -> Result<()> {
        Self::fail()
    }

    async fn append_comment(&self, _id: &TweetID, _comment: Comment) -> Result<UpdateOutcome> {
        Self::fail()
    }

    async fn increment_likes(&self, _id: &TweetID) -> Result<UpdateOutcome> {
        Self::fail()
    }

    async fn delete_owned(&self, _id: &TweetID, _owner: &UserID) -> Result<Option<Tweet>> {
        Self::fail()
    }
}
