//! Typed request bodies and the extractors that reject bad input with 400.

use crate::core::tasks::TaskInput;
use crate::errors::{AppError, AppResult};
use crate::models::Status;
use crate::utils::date::parse_date;
use async_trait::async_trait;
use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Field-level checks run after a body deserialized.
pub trait Validate {
    fn validate(&self) -> AppResult<()>;
}

/// JSON body that deserialized and passed [`Validate`].
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Numeric `:id` path segment.
pub struct IdParam(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        raw.parse::<i64>()
            .map(IdParam)
            .map_err(|_| AppError::validation(format!("invalid id '{raw}'")))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWeekRequest {
    #[serde(default)]
    pub week_start: Option<String>,
}

impl UpdateWeekRequest {
    pub fn week_start(&self) -> AppResult<Option<NaiveDate>> {
        match self.week_start.as_deref() {
            None => Ok(None),
            Some(raw) => parse_date(raw.trim())
                .map(Some)
                .ok_or_else(|| AppError::InvalidDate(raw.to_string())),
        }
    }
}

impl Validate for UpdateWeekRequest {
    fn validate(&self) -> AppResult<()> {
        self.week_start().map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub to_status: Status,
}

impl Validate for StatusRequest {
    fn validate(&self) -> AppResult<()> {
        if self.to_status.is_contractor_status() {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "toStatus must be draft or submitted, got {}",
                self.to_status
            )))
        }
    }
}

impl Validate for TaskInput {
    fn validate(&self) -> AppResult<()> {
        TaskInput::validate(self)
    }
}
