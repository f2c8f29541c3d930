//! In-memory identity provider for tests and local development.

use super::{EmailAddress, IdentityProvider, ProviderUser};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use std::collections::HashMap;

/// Maps opaque tokens to user ids and user ids to directory records.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, String>,
    users: HashMap<String, ProviderUser>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user reachable with `token`.
    pub fn with_user(mut self, token: &str, user_id: &str, name: &str, email: &str) -> Self {
        let (first, last) = name.split_once(' ').unwrap_or((name, ""));
        self.tokens.insert(token.to_string(), user_id.to_string());
        self.users.insert(
            user_id.to_string(),
            ProviderUser {
                id: user_id.to_string(),
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                image_url: format!("https://img.example.com/{user_id}.png"),
                primary_email_address_id: Some(format!("email_{user_id}")),
                email_addresses: vec![EmailAddress {
                    id: format!("email_{user_id}"),
                    email_address: email.to_string(),
                }],
            },
        );
        self
    }

    /// Register a token whose user has no directory record.
    pub fn with_token(mut self, token: &str, user_id: &str) -> Self {
        self.tokens.insert(token.to_string(), user_id.to_string());
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_session(&self, token: &str) -> AppResult<String> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AppError::Unauthorized)
    }

    async fn fetch_user(&self, user_id: &str) -> AppResult<ProviderUser> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| AppError::IdentityProvider(format!("unknown user '{user_id}'")))
    }
}
