//! Typed HTTP client for the JSON API.

use super::cache::{Mutation, ServerValue};
use crate::api::response::ErrorBody;
use crate::core::tasks::TaskInput;
use crate::errors::{AppError, AppResult};
use crate::models::user::Me;
use crate::models::{HistoryEntry, Profile, Status, Task, Timesheet, TimesheetDetail, TimesheetSummary};
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

/// Map a non-2xx response to an error. The body is read as text first so a
/// non-JSON error page never reaches the JSON decoder.
async fn check(res: Response) -> AppResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.clone());

    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        StatusCode::FORBIDDEN => AppError::Forbidden,
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::BAD_REQUEST => AppError::Validation(message),
        _ => AppError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        },
    })
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8787`.
    pub fn new(base_url: &str, token: &str) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/api{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> AppResult<T> {
        let res = check(req.send().await?).await?;
        Ok(res.json::<T>().await?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        self.send(self.request(method, path).json(body)).await
    }

    pub async fn list_timesheets(&self) -> AppResult<Vec<TimesheetSummary>> {
        self.send(self.request(Method::GET, "/timesheets")).await
    }

    pub async fn create_timesheet(&self) -> AppResult<Timesheet> {
        self.send(self.request(Method::POST, "/timesheets")).await
    }

    pub async fn get_timesheet(&self, id: i64) -> AppResult<TimesheetDetail> {
        self.send(self.request(Method::GET, &format!("/timesheets/{id}")))
            .await
    }

    pub async fn assign_week(
        &self,
        id: i64,
        week_start: Option<NaiveDate>,
    ) -> AppResult<Option<NaiveDate>> {
        self.send_json(
            Method::PUT,
            &format!("/timesheets/{id}"),
            &json!({ "weekStart": week_start }),
        )
        .await
    }

    pub async fn change_status(&self, id: i64, to_status: Status) -> AppResult<HistoryEntry> {
        self.send_json(
            Method::PUT,
            &format!("/timesheets/{id}/status"),
            &json!({ "toStatus": to_status }),
        )
        .await
    }

    pub async fn history(&self, id: i64) -> AppResult<Vec<HistoryEntry>> {
        self.send(self.request(Method::GET, &format!("/timesheets/{id}/history")))
            .await
    }

    pub async fn upsert_task(&self, input: &TaskInput) -> AppResult<Task> {
        let body = json!({
            "id": input.id,
            "timesheetId": input.timesheet_id,
            "weekday": input.weekday,
            "name": input.name,
            "hours": input.hours,
        });
        self.send_json(Method::PATCH, "/timesheets/tasks", &body).await
    }

    pub async fn delete_task(&self, task_id: i64) -> AppResult<i64> {
        self.send(self.request(Method::DELETE, &format!("/timesheets/tasks/{task_id}")))
            .await
    }

    pub async fn profile(&self, contractor_id: i64) -> AppResult<Profile> {
        self.send(self.request(Method::GET, &format!("/users/profile/{contractor_id}")))
            .await
    }

    pub async fn me(&self) -> AppResult<Me> {
        self.send(self.request(Method::GET, "/users/me")).await
    }

    /// Send a cached mutation and return the answer to fold back into the cache.
    pub async fn execute(&self, mutation: &Mutation) -> AppResult<ServerValue> {
        Ok(match mutation {
            Mutation::ChangeStatus {
                timesheet_id,
                to_status,
            } => ServerValue::History(self.change_status(*timesheet_id, *to_status).await?),
            Mutation::AssignWeek {
                timesheet_id,
                week_start,
            } => ServerValue::WeekStart(self.assign_week(*timesheet_id, *week_start).await?),
            Mutation::UpsertTask(input) => ServerValue::Task(self.upsert_task(input).await?),
            Mutation::DeleteTask { task_id, .. } => {
                ServerValue::Deleted(self.delete_task(*task_id).await?)
            }
        })
    }
}
