use crate::auth::IdentityProvider;
use crate::db::pool::DbPool;
use crate::db::users::find_contractor;
use crate::errors::{AppError, AppResult};
use crate::models::{Caller, Contractor, Profile};
use tracing::debug;

/// Contractor profile reads, backed by the identity provider's user directory.
pub struct ProfileLogic;

impl ProfileLogic {
    /// Load the contractor row and check the caller may see it.
    ///
    /// Contractors may read their own profile, managers the profiles of the
    /// contractors they manage.
    pub fn authorize(pool: &mut DbPool, caller: &Caller, contractor_id: i64) -> AppResult<Contractor> {
        let contractor = find_contractor(&pool.conn, contractor_id)?
            .ok_or_else(|| AppError::not_found(format!("contractor {contractor_id}")))?;

        let allowed = match caller {
            Caller::Contractor(c) => c.id == contractor.id,
            Caller::Manager(m) => m.id == contractor.manager_id,
        };
        if !allowed {
            return Err(AppError::Forbidden);
        }
        Ok(contractor)
    }

    pub async fn fetch(identity: &dyn IdentityProvider, contractor: &Contractor) -> AppResult<Profile> {
        debug!(contractor_id = contractor.id, "fetching profile");
        let user = identity.fetch_user(&contractor.clerk_id).await?;
        Ok(Profile::from_provider(contractor.id, &user))
    }
}
