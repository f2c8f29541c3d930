use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::users;
use crate::errors::{AppError, AppResult};
use crate::models::user::Me;
use crate::models::{Caller, Contractor, Manager};

/// User administration. Managers and contractors are provisioned by an
/// operator; the HTTP surface only reads them.
pub struct UserLogic;

fn check_clerk_id(clerk_id: &str) -> AppResult<&str> {
    let trimmed = clerk_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("clerk id must not be empty"));
    }
    Ok(trimmed)
}

fn check_terms(rate: Option<f64>, approved_hours: Option<i64>) -> AppResult<()> {
    if let Some(r) = rate
        && (!r.is_finite() || r < 0.0)
    {
        return Err(AppError::validation(format!("invalid rate {r}")));
    }
    if let Some(h) = approved_hours
        && h < 0
    {
        return Err(AppError::validation(format!("invalid approved hours {h}")));
    }
    Ok(())
}

impl UserLogic {
    pub fn add_manager(pool: &mut DbPool, clerk_id: &str) -> AppResult<Manager> {
        let clerk_id = check_clerk_id(clerk_id)?;
        let manager = users::insert_manager(&pool.conn, clerk_id)?;
        ttlog(
            &pool.conn,
            "manager_add",
            clerk_id,
            &format!("Manager {} created", manager.id),
        )?;
        Ok(manager)
    }

    pub fn add_contractor(
        pool: &mut DbPool,
        clerk_id: &str,
        manager_id: i64,
        rate: f64,
        approved_hours: i64,
    ) -> AppResult<Contractor> {
        let clerk_id = check_clerk_id(clerk_id)?;
        check_terms(Some(rate), Some(approved_hours))?;

        if users::find_manager(&pool.conn, manager_id)?.is_none() {
            return Err(AppError::not_found(format!("manager {manager_id}")));
        }

        let contractor =
            users::insert_contractor(&pool.conn, clerk_id, manager_id, rate, approved_hours)?;
        ttlog(
            &pool.conn,
            "contractor_add",
            clerk_id,
            &format!(
                "Contractor {} created (manager {}, rate {}, approved hours {})",
                contractor.id, manager_id, rate, approved_hours
            ),
        )?;
        Ok(contractor)
    }

    /// Change the terms of a contractor. Existing timesheets keep their snapshot.
    pub fn update_contractor(
        pool: &mut DbPool,
        id: i64,
        rate: Option<f64>,
        approved_hours: Option<i64>,
    ) -> AppResult<Contractor> {
        if rate.is_none() && approved_hours.is_none() {
            return Err(AppError::validation("nothing to update: pass --rate and/or --approved-hours"));
        }
        check_terms(rate, approved_hours)?;

        let contractor = users::update_contractor(&pool.conn, id, rate, approved_hours)?
            .ok_or_else(|| AppError::not_found(format!("contractor {id}")))?;
        ttlog(
            &pool.conn,
            "contractor_update",
            &contractor.clerk_id,
            &format!(
                "Contractor {} now at rate {}, approved hours {}",
                contractor.id, contractor.rate, contractor.approved_hours
            ),
        )?;
        Ok(contractor)
    }

    pub fn list_managers(pool: &mut DbPool) -> AppResult<Vec<Manager>> {
        users::list_managers(&pool.conn)
    }

    pub fn list_contractors(pool: &mut DbPool, manager_id: Option<i64>) -> AppResult<Vec<Contractor>> {
        users::list_contractors(&pool.conn, manager_id)
    }

    /// Resolve the session user to a contractor or manager row.
    pub fn resolve(pool: &mut DbPool, clerk_id: &str) -> AppResult<Caller> {
        users::resolve_caller(&pool.conn, clerk_id)?.ok_or(AppError::Forbidden)
    }

    pub fn me(caller: &Caller) -> Me {
        Me::from(caller)
    }
}
