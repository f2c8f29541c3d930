//! Identity provider seam: session-token verification and user lookup.
//!
//! The service never stores names or e-mail addresses; those are fetched from
//! the hosted user directory on demand.

pub mod clerk;
pub mod fake;

use crate::errors::AppResult;
use async_trait::async_trait;
use serde::Deserialize;

pub use clerk::ClerkProvider;
pub use fake::StaticIdentityProvider;

/// User record as returned by the hosted directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: String,
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
}

impl ProviderUser {
    /// The address flagged as primary, if the user has one.
    pub fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref()?;
        self.email_addresses
            .iter()
            .find(|e| e.id == primary)
            .map(|e| e.email_address.as_str())
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a session token and return the user id it was issued for.
    /// Any failure is reported as `AppError::Unauthorized`.
    async fn verify_session(&self, token: &str) -> AppResult<String>;

    /// Fetch a user record from the directory.
    async fn fetch_user(&self, user_id: &str) -> AppResult<ProviderUser>;
}
