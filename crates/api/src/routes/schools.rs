//! Route definitions for school management.

use axum::routing::get;
use axum::Router;

use crate::handlers::schools;
use crate::state::AppState;

/// Routes mounted at `/schools`.
///
/// ```text
/// GET    /       -> list_schools
/// POST   /       -> create_school       (admin)
/// GET    /{id}   -> get_school
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(schools::list_schools).post(schools::create_school),
        )
        .route("/{id}", get(schools::get_school))
}
