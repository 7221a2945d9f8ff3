//! Handlers for donor profiles and recognition tiers.
//!
//! The tier shown to a donor is reconciled on every read: the stored cache
//! and the tier recomputed from counted totals can disagree (a campaign
//! deletion shrinks totals, a raced update lags behind), and the higher of
//! the two wins. A recognised tier is never taken away.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use fundra_core::error::CoreError;
use fundra_core::tier::{compute_tier, reconcile, DonorTier};
use fundra_core::types::DbId;
use fundra_db::models::donor::Donor;
use fundra_db::repositories::{DonationRepo, DonorRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireDonor};
use crate::response::DataResponse;
use crate::state::AppState;

/// Donor profile with lifetime counted totals and recognition tier.
#[derive(Debug, Serialize)]
pub struct DonorProfileResponse {
    pub donor_id: DbId,
    pub total_donated: i64,
    pub items_donated: i64,
    pub tier: &'static str,
}

/// Recompute the donor's tier from counted totals and raise the cached
/// value if it lags. Called whenever a donation reaches a counted status.
pub(crate) async fn refresh_donor_tier(state: &AppState, donor_id: DbId) -> AppResult<()> {
    let totals = DonationRepo::donor_totals(&state.pool, donor_id).await?;
    let computed = compute_tier(totals.total_amount, totals.total_items, &state.config.policy);
    if DonorRepo::raise_tier(&state.pool, donor_id, computed).await? {
        tracing::info!(donor_id, tier = computed.as_str(), "Donor tier raised");
    }
    Ok(())
}

async fn build_profile(state: &AppState, donor_id: DbId) -> AppResult<DonorProfileResponse> {
    let stored = DonorRepo::find_by_id(&state.pool, donor_id).await?;
    let totals = DonationRepo::donor_totals(&state.pool, donor_id).await?;

    let stored_tier = stored
        .as_ref()
        .and_then(Donor::tier)
        .unwrap_or(DonorTier::None);
    let computed = compute_tier(totals.total_amount, totals.total_items, &state.config.policy);
    let tier = reconcile(stored_tier, computed);

    // Persist a raise so later reads see it without recomputation.
    if stored.is_some() && tier > stored_tier {
        DonorRepo::raise_tier(&state.pool, donor_id, tier).await?;
    }

    Ok(DonorProfileResponse {
        donor_id,
        total_donated: totals.total_amount,
        items_donated: totals.total_items,
        tier: tier.as_str(),
    })
}

/// GET /api/v1/donors/me
///
/// The calling donor's own profile. A donor who has never donated has no
/// row yet; the profile still renders with zero totals and no tier.
pub async fn get_my_profile(
    actor: RequireDonor,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = build_profile(&state, actor.0.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/donors/{id}
///
/// A donor profile by id, admin only. 404 for ids the ledger has never
/// seen.
pub async fn get_donor(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(donor_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let known = DonorRepo::find_by_id(&state.pool, donor_id).await?.is_some();
    if !known {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Donor",
            id: donor_id,
        }));
    }
    let profile = build_profile(&state, donor_id).await?;
    Ok(Json(DataResponse { data: profile }))
}
