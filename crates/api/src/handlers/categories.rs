//! Handler for the seeded campaign category lookup.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use fundra_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}
