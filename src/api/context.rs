use super::AppState;
use crate::auth::IdentityProvider;
use crate::core::users::UserLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::Caller;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use std::sync::Arc;
use tracing::{Span, debug};

/// Cookie set by the identity provider's browser SDK.
pub const SESSION_COOKIE: &str = "__session";

/// Authenticated caller plus what a handler needs to act on its behalf.
pub struct RequestContext {
    pub caller: Caller,
    pub identity: Arc<dyn IdentityProvider>,
    database: Arc<str>,
}

impl RequestContext {
    /// Run `f` on the blocking pool against a fresh connection.
    pub async fn run<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut DbPool, &Caller) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let caller = self.caller.clone();
        with_db(self.database.clone(), move |pool| f(pool, &caller)).await
    }
}

async fn with_db<T, F>(database: Arc<str>, f: F) -> AppResult<T>
where
    F: FnOnce(&mut DbPool) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut pool = DbPool::new(&database)?;
        f(&mut pool)
    })
    .await
    .map_err(|e| AppError::Other(format!("blocking task failed: {e}")))?
}

/// Session token from `Authorization: Bearer ...`, else from the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user_id = state.identity.verify_session(&token).await?;

        let lookup = user_id.clone();
        let caller = with_db(state.database.clone(), move |pool| {
            UserLogic::resolve(pool, &lookup)
        })
        .await?;

        Span::current().record("role", caller.role());
        debug!(user_id = %user_id, role = caller.role(), "caller resolved");

        Ok(Self {
            caller,
            identity: state.identity.clone(),
            database: state.database.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer tok-a"));
        headers.insert(COOKIE, HeaderValue::from_static("__session=tok-b"));
        assert_eq!(session_token(&headers).as_deref(), Some("tok-a"));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; __session=tok-c; lang=en"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("tok-c"));
    }

    #[test]
    fn missing_or_blank_credentials_yield_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        headers.insert(COOKIE, HeaderValue::from_static("__session="));
        assert_eq!(session_token(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(session_token(&headers), None);
    }
}
