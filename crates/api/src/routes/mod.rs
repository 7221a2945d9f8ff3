pub mod campaigns;
pub mod categories;
pub mod donations;
pub mod donors;
pub mod health;
pub mod payments;
pub mod schools;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /schools                       list (auth), register (admin only)
/// /schools/{id}                  get (auth)
///
/// /categories                    list seeded categories (auth)
///
/// /campaigns                     list (auth), submit (school staff)
/// /campaigns/{id}                get (auth), delete (owning school/admin)
/// /campaigns/{id}/approve        decide (admin or school principal, POST)
/// /campaigns/{id}/reject         decide (admin or school principal, POST)
/// /campaigns/{id}/progress       funding progress (auth)
/// /campaigns/{id}/donations      donation ledger (owning school/admin)
/// /campaigns/{id}/decisions      decision audit trail (owning school/admin)
///
/// /donations                     list own (donor), record (donor, POST)
/// /donations/{id}                get (donor/owning school/admin)
/// /donations/{id}/status         settle or cancel a pledge (PUT)
///
/// /payments/callback             gateway webhook, HMAC-signed (POST)
///
/// /donors/me                     own profile with totals and tier (donor)
/// /donors/{id}                   donor profile (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // School registry.
        .nest("/schools", schools::router())
        // Campaign category lookup.
        .nest("/categories", categories::router())
        // Campaign lifecycle: submission, approval, progress, deletion.
        .nest("/campaigns", campaigns::router())
        // Donation ledger: recording and pledge settlement.
        .nest("/donations", donations::router())
        // Payment gateway callback (signature-authenticated, no JWT).
        .nest("/payments", payments::router())
        // Donor profiles and recognition tiers.
        .nest("/donors", donors::router())
}
