//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not meet the requirement. Use these in route handlers to enforce
//! authorization at the type level. Decisions that depend on the target
//! row (e.g. "principal of the campaign's school") stay in the handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use fundra_core::error::CoreError;
use fundra_core::roles::{ROLE_ADMIN, ROLE_DONOR, ROLE_SCHOOL};
use fundra_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires the `school` role with a school scope in the token.
///
/// School staff tokens always carry a `school_id` claim; a staff token
/// without one is malformed and rejected.
pub struct RequireSchool {
    pub user: AuthUser,
    /// The school the token is scoped to.
    pub school_id: DbId,
}

impl FromRequestParts<AppState> for RequireSchool {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_SCHOOL {
            return Err(AppError::Core(CoreError::Forbidden(
                "School staff role required".into(),
            )));
        }
        let school_id = user.school_id.ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "School staff token is missing its school scope".into(),
            ))
        })?;
        Ok(RequireSchool { user, school_id })
    }
}

/// Requires the `donor` role. Rejects with 403 Forbidden otherwise.
pub struct RequireDonor(pub AuthUser);

impl FromRequestParts<AppState> for RequireDonor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_DONOR {
            return Err(AppError::Core(CoreError::Forbidden(
                "Donor role required".into(),
            )));
        }
        Ok(RequireDonor(user))
    }
}

/// Requires any authenticated account (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use in
/// route definitions where the intent "this route requires authentication"
/// should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}
