use crate::domain::model::{TweetID, UserID, UserSummary};
use chrono::{DateTime, Utc};
use serde::*;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: TweetID,
    pub content: String,
    pub user: UserID,
    pub comments: Vec<Comment>,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    pub fn new(content: String, user: UserID) -> Self {
        Tweet {
            id: TweetID::generate(),
            content,
            user,
            comments: vec![],
            likes: 0,
            created_at: Utc::now(),
        }
    }

    /// Every user this tweet references, author first.
    pub fn referenced_users(&self) -> impl Iterator<Item = &UserID> {
        std::iter::once(&self.user).chain(self.comments.iter().map(|c| &c.user))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    pub comment: String,
    pub user: UserID,
}

/// Which tweets a page query selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetFilter {
    All,
    ByUser(UserID),
}

/// Result of a single-document update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No tweet had the given id.
    Unmatched,
    /// The tweet exists but the update changed nothing (duplicate comment).
    Unchanged,
    Modified,
}

impl UpdateOutcome {
    pub fn matched(&self) -> bool {
        !matches!(self, UpdateOutcome::Unmatched)
    }
}

/// How the author of a tweet is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Author {
    Reference(UserID),
    /// `None` when the referenced user no longer exists.
    Expanded(Option<UserSummary>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentView {
    pub comment: String,
    pub user: Option<UserSummary>,
}

/// A tweet with its references resolved for a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: TweetID,
    pub content: String,
    pub comments: Vec<CommentView>,
    pub likes: i64,
    pub user: Author,
    pub created_at: DateTime<Utc>,
}

impl TweetView {
    pub fn compose(
        tweet: Tweet,
        users: &HashMap<UserID, UserSummary>,
        expand_author: bool,
    ) -> Self {
        let user = if expand_author {
            Author::Expanded(users.get(&tweet.user).cloned())
        } else {
            Author::Reference(tweet.user)
        };
        let comments = tweet
            .comments
            .into_iter()
            .map(|c| CommentView {
                user: users.get(&c.user).cloned(),
                comment: c.comment,
            })
            .collect();

        TweetView {
            id: tweet.id,
            content: tweet.content,
            comments,
            likes: tweet.likes,
            user,
            created_at: tweet.created_at,
        }
    }
}
