use crate::domain::model::UserID;
use chrono::{DateTime, Utc};
use serde::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, username: String, email: String) -> Self {
        User {
            id: UserID::generate(),
            name,
            username,
            email,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            username: self.username.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.clone(),
            name: self.name.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// The fields a user reference expands to inside tweets and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserID,
    pub name: String,
    pub username: String,
}

/// Public profile returned next to a user's tweets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}
