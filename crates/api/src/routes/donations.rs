//! Route definitions for the `/donations` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::donations;
use crate::state::AppState;

/// Routes mounted at `/donations`.
///
/// ```text
/// GET    /              -> list_my_donations
/// POST   /              -> record_donation
/// GET    /{id}          -> get_donation
/// PUT    /{id}/status   -> update_donation_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(donations::list_my_donations).post(donations::record_donation),
        )
        .route("/{id}", get(donations::get_donation))
        .route("/{id}/status", put(donations::update_donation_status))
}
