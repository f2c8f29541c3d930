use super::context::RequestContext;
use super::validate::{IdParam, StatusRequest, UpdateWeekRequest, ValidJson};
use crate::core::profile::ProfileLogic;
use crate::core::status::StatusLogic;
use crate::core::tasks::{TaskInput, TaskLogic};
use crate::core::timesheets::TimesheetLogic;
use crate::core::users::UserLogic;
use crate::errors::AppResult;
use crate::models::user::Me;
use crate::models::{HistoryEntry, Profile, Task, Timesheet, TimesheetDetail, TimesheetSummary};
use axum::Json;
use axum::http::StatusCode;
use chrono::NaiveDate;

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn list_timesheets(ctx: RequestContext) -> AppResult<Json<Vec<TimesheetSummary>>> {
    let rows = ctx.run(TimesheetLogic::list).await?;
    Ok(Json(rows))
}

pub async fn create_timesheet(ctx: RequestContext) -> AppResult<(StatusCode, Json<Timesheet>)> {
    let ts = ctx.run(TimesheetLogic::create).await?;
    Ok((StatusCode::CREATED, Json(ts)))
}

pub async fn get_timesheet(
    ctx: RequestContext,
    IdParam(id): IdParam,
) -> AppResult<Json<TimesheetDetail>> {
    let detail = ctx
        .run(move |pool, caller| TimesheetLogic::detail(pool, caller, id))
        .await?;
    Ok(Json(detail))
}

pub async fn assign_week(
    ctx: RequestContext,
    IdParam(id): IdParam,
    ValidJson(body): ValidJson<UpdateWeekRequest>,
) -> AppResult<Json<Option<NaiveDate>>> {
    let week_start = body.week_start()?;
    let stored = ctx
        .run(move |pool, caller| TimesheetLogic::assign_week(pool, caller, id, week_start))
        .await?;
    Ok(Json(stored))
}

pub async fn change_status(
    ctx: RequestContext,
    IdParam(id): IdParam,
    ValidJson(body): ValidJson<StatusRequest>,
) -> AppResult<Json<HistoryEntry>> {
    let to_status = body.to_status;
    let entry = ctx
        .run(move |pool, caller| StatusLogic::transition(pool, caller, id, to_status))
        .await?;
    Ok(Json(entry))
}

pub async fn list_history(
    ctx: RequestContext,
    IdParam(id): IdParam,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let history = ctx
        .run(move |pool, caller| TimesheetLogic::history(pool, caller, id))
        .await?;
    Ok(Json(history))
}

pub async fn upsert_task(
    ctx: RequestContext,
    ValidJson(input): ValidJson<TaskInput>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let outcome = ctx
        .run(move |pool, caller| TaskLogic::upsert(pool, caller, &input))
        .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.task)))
}

pub async fn delete_task(ctx: RequestContext, IdParam(id): IdParam) -> AppResult<Json<i64>> {
    let deleted = ctx
        .run(move |pool, caller| TaskLogic::delete(pool, caller, id))
        .await?;
    Ok(Json(deleted))
}

pub async fn get_profile(ctx: RequestContext, IdParam(id): IdParam) -> AppResult<Json<Profile>> {
    let contractor = ctx
        .run(move |pool, caller| ProfileLogic::authorize(pool, caller, id))
        .await?;
    let profile = ProfileLogic::fetch(ctx.identity.as_ref(), &contractor).await?;
    Ok(Json(profile))
}

pub async fn me(ctx: RequestContext) -> Json<Me> {
    Json(UserLogic::me(&ctx.caller))
}
