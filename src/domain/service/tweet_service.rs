use crate::domain::interface::*;
use crate::domain::model::*;
use crate::error::*;
use serde::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

pub const TWEET_NOT_FOUND: &str = "Tweet not found";
pub const NOT_UPDATED: &str = "not updated";

#[derive(Debug)]
pub enum TweetServiceError {
    UserNotFound,
    TweetNotFound,
    UpdateFailed,
    DeleteFailed,
}

impl IServiceError for TweetServiceError {
    fn error_type(&self) -> String {
        use TweetServiceError::*;

        match self {
            UserNotFound => "user_not_found",
            TweetNotFound => "tweet_not_found",
            UpdateFailed => "update_failed",
            DeleteFailed => "delete_failed",
        }
        .to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        use TweetServiceError::*;

        match self {
            UserNotFound | TweetNotFound => http::StatusCode::NOT_FOUND,
            UpdateFailed | DeleteFailed => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TweetList {
    #[serde(flatten)]
    pub summary: PageSummary,
    pub data: Vec<TweetView>,
}

#[derive(Debug, Serialize)]
pub struct UserTweetPage {
    pub tweets: Vec<TweetView>,
    #[serde(flatten)]
    pub summary: PageSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTweets {
    pub user: UserProfile,
    pub user_tweets: UserTweetPage,
}

#[derive(Debug, Serialize)]
pub struct TweetEnvelope {
    pub tweet: TweetView,
}

#[derive(Debug, Serialize)]
pub struct CommentAdded {
    pub message: String,
    pub comment: String,
    pub user: UserID,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
    pub id: TweetID,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalTweetView {
    pub text: String,
    pub created_at: Option<String>,
}

#[derive(Clone)]
pub struct TweetService {
    tweet_repo: Arc<dyn ITweetRepository + Send + Sync>,
    user_repo: Arc<dyn IUserRepository + Send + Sync>,
    tweet_source: Arc<dyn ITweetSource + Send + Sync>,
    translator: Arc<dyn ITranslator + Send + Sync>,
}

impl TweetService {
    pub fn new(
        tweet_repo: Arc<dyn ITweetRepository + Send + Sync>,
        user_repo: Arc<dyn IUserRepository + Send + Sync>,
        tweet_source: Arc<dyn ITweetSource + Send + Sync>,
        translator: Arc<dyn ITranslator + Send + Sync>,
    ) -> Self {
        Self {
            tweet_repo,
            user_repo,
            tweet_source,
            translator,
        }
    }

    /// Newest tweets across all users. `total` counts the whole store.
    pub async fn list(&self, pagination: Pagination) -> Result<TweetList> {
        let tweets = self
            .tweet_repo
            .find_page(&TweetFilter::All, &pagination)
            .await?;
        let total = self.tweet_repo.count().await?;
        let data = self.expand(tweets, true).await?;

        Ok(TweetList {
            summary: PageSummary::new(total, &pagination),
            data,
        })
    }

    /// A user's profile with one page of their tweets. Here `total` is the
    /// length of the fetched page, not the user's tweet count.
    pub async fn user_tweets(&self, username: &str, pagination: Pagination) -> Result<UserTweets> {
        let user = match self.user_repo.find_by_username(username).await? {
            Some(user) => user,
            None => {
                return Err(ServiceError::only(TweetServiceError::UserNotFound)
                    .with_message(self.translator.translate("errors.user.userNotExists")))
            }
        };

        let tweets = self
            .tweet_repo
            .find_page(&TweetFilter::ByUser(user.id.clone()), &pagination)
            .await?;
        let total = tweets.len() as i64;
        let tweets = self.expand(tweets, false).await?;

        Ok(UserTweets {
            user: user.profile(),
            user_tweets: UserTweetPage {
                tweets,
                summary: PageSummary::new(total, &pagination),
            },
        })
    }

    /// Same shape as [`TweetService::list`], filtered to one author id, with
    /// `total` taken from the fetched page.
    pub async fn list_by_user(&self, user: UserID, pagination: Pagination) -> Result<TweetList> {
        let tweets = self
            .tweet_repo
            .find_page(&TweetFilter::ByUser(user), &pagination)
            .await?;
        let total = tweets.len() as i64;
        let data = self.expand(tweets, true).await?;

        Ok(TweetList {
            summary: PageSummary::new(total, &pagination),
            data,
        })
    }

    /// Any failure, absence included, is reported as `TweetNotFound`.
    pub async fn get_one(&self, id: &TweetID) -> Result<TweetEnvelope> {
        let lookup = async {
            let tweet = self.tweet_repo.find_by_id(id).await?;
            let mut views = self.expand(vec![tweet], true).await?;
            views
                .pop()
                .ok_or_else(|| ServiceError::only(RepositoryError::RecordNotFound))
        };

        match lookup.await {
            Ok(tweet) => Ok(TweetEnvelope { tweet }),
            Err(err) => {
                debug!(tweet = %id, error_type = %err.error_type(), "tweet lookup failed");
                Err(
                    ServiceError::new(TweetServiceError::TweetNotFound, err.into_inner())
                        .with_message(TWEET_NOT_FOUND),
                )
            }
        }
    }

    pub async fn create(&self, content: String, user: UserID) -> Result<Tweet> {
        let tweet = Tweet::new(content, user);
        self.tweet_repo.create(tweet.clone()).await?;
        debug!(tweet = %tweet.id, user = %tweet.user, "tweet created");
        Ok(tweet)
    }

    /// Set-inserts the comment. A missing tweet is not an error.
    pub async fn comment(&self, tweet_id: &TweetID, comment: String, user: UserID) -> Result<CommentAdded> {
        let entry = Comment {
            comment: comment.clone(),
            user: user.clone(),
        };
        match self.tweet_repo.append_comment(tweet_id, entry).await {
            Ok(outcome) => {
                if outcome.matched() {
                    debug!(tweet = %tweet_id, ?outcome, "comment appended");
                } else {
                    debug!(tweet = %tweet_id, "comment on a missing tweet dropped");
                }
                Ok(CommentAdded {
                    message: "ok".to_string(),
                    comment,
                    user,
                })
            }
            Err(err) => Err(self.update_failed(tweet_id, err)),
        }
    }

    pub async fn like(&self, tweet_id: &TweetID) -> Result<Ack> {
        match self.tweet_repo.increment_likes(tweet_id).await {
            Ok(outcome) => {
                debug!(tweet = %tweet_id, ?outcome, "tweet liked");
                Ok(Ack {
                    message: "ok".to_string(),
                })
            }
            Err(err) => Err(self.update_failed(tweet_id, err)),
        }
    }

    /// Deletes the tweet if `user` owns it. Someone else's tweet is reported
    /// exactly like a missing one.
    pub async fn delete(&self, tweet_id: &TweetID, user: &UserID) -> Result<Deleted> {
        match self.tweet_repo.delete_owned(tweet_id, user).await {
            Ok(Some(tweet)) => {
                debug!(tweet = %tweet.id, user = %user, "tweet deleted");
                Ok(Deleted {
                    message: self.translator.translate("success.tweet.onDelete"),
                    id: tweet.id,
                })
            }
            Ok(None) => Err(ServiceError::only(TweetServiceError::TweetNotFound)
                .with_message(self.translator.translate("errors.tweet.tweetNotExists"))),
            Err(err) => {
                warn!(tweet = %tweet_id, error = ?err, "delete failed");
                Err(
                    ServiceError::new(TweetServiceError::DeleteFailed, err.into_inner())
                        .with_message(self.translator.translate("errors.tweet.onDelete")),
                )
            }
        }
    }

    pub async fn external_tweets(&self, username: &str) -> Result<Vec<ExternalTweetView>> {
        let tweets = self.tweet_source.tweets_by_username(username).await?;
        Ok(tweets
            .into_iter()
            .map(|t| ExternalTweetView {
                text: t.text,
                created_at: t.created_at,
            })
            .collect())
    }

    fn update_failed(&self, tweet_id: &TweetID, err: ServiceError) -> ServiceError {
        warn!(tweet = %tweet_id, error = ?err, "update failed");
        ServiceError::new(TweetServiceError::UpdateFailed, err.into_inner()).with_message(NOT_UPDATED)
    }

    /// Resolves user references with one lookup for the whole batch.
    async fn expand(&self, tweets: Vec<Tweet>, expand_author: bool) -> Result<Vec<TweetView>> {
        let ids: HashSet<UserID> = tweets
            .iter()
            .flat_map(|t| {
                let skip = usize::from(!expand_author);
                t.referenced_users().skip(skip)
            })
            .cloned()
            .collect();
        let users: HashMap<UserID, UserSummary> = self
            .user_repo
            .find_summaries(ids.into_iter().collect())
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(tweets
            .into_iter()
            .map(|t| TweetView::compose(t, &users, expand_author))
            .collect())
    }
}
