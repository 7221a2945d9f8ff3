//! Handlers for the `/schools` registry.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use fundra_core::error::CoreError;
use fundra_core::school::validate_new_school;
use fundra_core::types::DbId;
use fundra_db::models::school::CreateSchool;
use fundra_db::repositories::SchoolRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SchoolListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/schools
///
/// Register a school, admin only. School names are unique; a duplicate
/// rejects with 409. Returns 201.
pub async fn create_school(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateSchool>,
) -> AppResult<impl IntoResponse> {
    validate_new_school(&input.name, &input.contact_email)?;

    let school = SchoolRepo::create(&state.pool, &input).await?;
    tracing::info!(school_id = school.id, created_by = admin.user_id, "School registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: school })))
}

/// GET /api/v1/schools
pub async fn list_schools(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<SchoolListQuery>,
) -> AppResult<impl IntoResponse> {
    let schools = SchoolRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: schools }))
}

/// GET /api/v1/schools/{id}
pub async fn get_school(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(school_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let school = SchoolRepo::find_by_id(&state.pool, school_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "School",
            id: school_id,
        }))?;
    Ok(Json(DataResponse { data: school }))
}
