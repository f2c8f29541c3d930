//! Hosted identity provider client (Clerk backend API).
//!
//! Session tokens are RS256 JWTs. They are verified locally against the
//! instance's JWKS, which is fetched with the secret key and cached until a
//! token shows up with an unknown `kid`.

use super::{IdentityProvider, ProviderUser};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const DEFAULT_API_URL: &str = "https://api.clerk.com/v1";

#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
}

#[derive(Clone)]
pub struct ClerkProvider {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
    issuer: String,
    jwks_cache: Arc<RwLock<HashMap<String, Jwk>>>,
}

impl ClerkProvider {
    pub fn new(api_url: &str, secret_key: &str, publishable_key: &str) -> AppResult<Self> {
        let issuer = issuer_from_publishable_key(publishable_key)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
            issuer,
            jwks_cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    async fn get_jwk(&self, kid: &str) -> AppResult<Jwk> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(jwk) = cache.get(kid) {
                return Ok(jwk.clone());
            }
        }

        self.refresh_jwks().await?;

        let cache = self.jwks_cache.read().await;
        cache.get(kid).cloned().ok_or_else(|| {
            warn!(kid, "no signing key found for session token");
            AppError::Unauthorized
        })
    }

    async fn refresh_jwks(&self) -> AppResult<()> {
        let url = format!("{}/jwks", self.api_url);
        debug!(%url, "fetching JWKS");

        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(AppError::IdentityProvider(format!(
                "JWKS request returned status {}",
                res.status()
            )));
        }
        let set: JwkSet = res.json().await?;

        let mut fresh = HashMap::new();
        for jwk in set.keys {
            if let Some(kid) = jwk.common.key_id.clone() {
                fresh.insert(kid, jwk);
            }
        }

        let mut cache = self.jwks_cache.write().await;
        *cache = fresh;
        info!(keys = cache.len(), "JWKS cache refreshed");
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for ClerkProvider {
    async fn verify_session(&self, token: &str) -> AppResult<String> {
        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "malformed session token");
            AppError::Unauthorized
        })?;
        let kid = header.kid.ok_or(AppError::Unauthorized)?;

        let jwk = self.get_jwk(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|e| AppError::IdentityProvider(format!("invalid JWK '{kid}': {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;

        let data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
            debug!(error = %e, "session token rejected");
            AppError::Unauthorized
        })?;

        Ok(data.claims.sub)
    }

    async fn fetch_user(&self, user_id: &str) -> AppResult<ProviderUser> {
        let url = format!("{}/users/{}", self.api_url, user_id);
        let res = self
            .http
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::IdentityProvider(format!(
                "user lookup for '{user_id}' returned {status}: {body}"
            )));
        }

        Ok(res.json::<ProviderUser>().await?)
    }
}

/// Publishable keys look like `pk_<env>_<base64("<frontend-host>$")>`; the
/// session token issuer is `https://<frontend-host>`.
pub fn issuer_from_publishable_key(key: &str) -> AppResult<String> {
    let invalid = || AppError::Config(format!("invalid publishable key '{key}'"));

    let encoded = key
        .strip_prefix("pk_test_")
        .or_else(|| key.strip_prefix("pk_live_"))
        .ok_or_else(invalid)?;

    let bytes = STANDARD_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|_| invalid())?;
    let decoded = String::from_utf8(bytes).map_err(|_| invalid())?;
    let host = decoded.trim_end_matches('$');

    if host.is_empty() || host.contains('/') {
        return Err(invalid());
    }
    Ok(format!("https://{host}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn issuer_is_decoded_from_publishable_key() {
        let key = format!("pk_test_{}", STANDARD.encode("clever-otter-12.clerk.accounts.dev$"));
        assert_eq!(
            issuer_from_publishable_key(&key).unwrap(),
            "https://clever-otter-12.clerk.accounts.dev"
        );
    }

    #[test]
    fn malformed_publishable_key_is_a_config_error() {
        assert!(matches!(
            issuer_from_publishable_key("sk_test_abc"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            issuer_from_publishable_key("pk_live_!!!"),
            Err(AppError::Config(_))
        ));
    }
}
