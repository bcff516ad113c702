use serde::*;
use std::hash::Hash;

#[derive(Clone, Debug, PartialEq, Default, Eq, Hash)]
pub struct TweetID(pub String);

impl TweetID {
    pub fn generate() -> Self {
        TweetID(uuid::Uuid::new_v4().to_string())
    }
}

// TweetID to String
impl From<TweetID> for String {
    fn from(tweet_id: TweetID) -> Self {
        tweet_id.0
    }
}

// String to TweetID
impl From<String> for TweetID {
    fn from(tweet_id: String) -> Self {
        TweetID(tweet_id)
    }
}

impl std::fmt::Display for TweetID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

derive_newtype_serde!(TweetID, String);

#[derive(Clone, Debug, PartialEq, Default, Eq, Hash)]
pub struct UserID(pub String);

impl UserID {
    pub fn generate() -> Self {
        UserID(uuid::Uuid::new_v4().to_string())
    }

    /// Rejects blank ids, which can never reference a user.
    pub fn parse(user_id: String) -> Result<Self, String> {
        if user_id.trim().is_empty() {
            Err(user_id)
        } else {
            Ok(UserID(user_id))
        }
    }
}

impl From<UserID> for String {
    fn from(user_id: UserID) -> Self {
        user_id.0
    }
}

impl From<String> for UserID {
    fn from(user_id: String) -> Self {
        UserID(user_id)
    }
}

impl std::fmt::Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

derive_newtype_serde!(UserID, String; UserID::parse, "user id must not be empty");

/// The caller resolved from a bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserID,
}
