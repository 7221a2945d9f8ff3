//! Route definitions for donor profiles.

use axum::routing::get;
use axum::Router;

use crate::handlers::donors;
use crate::state::AppState;

/// Routes mounted at `/donors`.
///
/// ```text
/// GET    /me     -> get_my_profile   (donor)
/// GET    /{id}   -> get_donor        (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(donors::get_my_profile))
        .route("/{id}", get(donors::get_donor))
}
