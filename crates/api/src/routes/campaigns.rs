//! Route definitions for the `/campaigns` resource.
//!
//! All endpoints require authentication; write access is further
//! restricted per handler.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                  -> list_campaigns
/// POST   /                  -> create_campaign
/// GET    /{id}              -> get_campaign
/// DELETE /{id}              -> delete_campaign
/// POST   /{id}/approve      -> approve_campaign
/// POST   /{id}/reject       -> reject_campaign
/// GET    /{id}/progress     -> get_progress
/// GET    /{id}/donations    -> list_campaign_donations
/// GET    /{id}/decisions    -> list_decisions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route(
            "/{id}",
            get(campaigns::get_campaign).delete(campaigns::delete_campaign),
        )
        .route("/{id}/approve", post(campaigns::approve_campaign))
        .route("/{id}/reject", post(campaigns::reject_campaign))
        .route("/{id}/progress", get(campaigns::get_progress))
        .route("/{id}/donations", get(campaigns::list_campaign_donations))
        .route("/{id}/decisions", get(campaigns::list_decisions))
}
