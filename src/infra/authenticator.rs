use crate::domain::interface::IAuthenticator;
use crate::domain::model::{Identity, UserID};
use crate::error::*;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug)]
pub enum AuthConfigError {
    InvalidTokenSpec,
}

impl IServiceError for AuthConfigError {
    fn error_type(&self) -> String {
        match self {
            AuthConfigError::InvalidTokenSpec => "invalid_token_spec".to_string(),
        }
    }
}

/// Bearer tokens issued out of band, each bound to one user.
#[derive(Debug, Clone, Default)]
pub struct TokenAuthenticator {
    tokens: HashMap<String, UserID>,
}

impl TokenAuthenticator {
    /// Parses `token=userId` pairs separated by commas. Blank input yields an
    /// authenticator that rejects everything.
    pub fn from_spec(spec: &str) -> Result<Self> {
        let mut tokens = HashMap::new();
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (token, user) = pair
                .split_once('=')
                .map(|(t, u)| (t.trim(), u.trim()))
                .filter(|(t, u)| !t.is_empty() && !u.is_empty())
                .ok_or_else(|| {
                    ServiceError::new(
                        AuthConfigError::InvalidTokenSpec,
                        anyhow::anyhow!("expected token=userId, got {:?}", pair),
                    )
                })?;
            tokens.insert(token.to_string(), UserID(user.to_string()));
        }
        Ok(TokenAuthenticator { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IAuthenticator for TokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).map(|user_id| Identity {
            user_id: user_id.clone(),
        })
    }
}
