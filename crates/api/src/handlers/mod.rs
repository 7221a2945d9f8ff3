//! Request handlers, one submodule per resource.
//!
//! Handlers delegate domain rules to `fundra_core`, persistence to the
//! repositories in `fundra_db`, and map errors via [`AppError`].

pub mod campaigns;
pub mod categories;
pub mod donations;
pub mod donors;
pub mod payments;
pub mod schools;

use fundra_core::campaign::{ApprovalState, CampaignKind};
use fundra_core::donation::DonationStatus;
use fundra_core::error::CoreError;
use fundra_core::roles::{ROLE_ADMIN, ROLE_PRINCIPAL, ROLE_SCHOOL};
use fundra_core::types::DbId;
use fundra_db::models::campaign::Campaign;
use fundra_db::models::donation::Donation;
use fundra_db::repositories::DonationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

// ---------------------------------------------------------------------------
// Lookup id decoding
// ---------------------------------------------------------------------------
// Lookup FKs keep discriminants in range, so a decode failure means the
// seeds and the enums have drifted apart. Surface that as a 500, never as
// a caller error.

pub(crate) fn campaign_kind(campaign: &Campaign) -> AppResult<CampaignKind> {
    campaign.kind().ok_or_else(|| {
        AppError::InternalError(format!("unknown campaign kind id {}", campaign.kind_id))
    })
}

pub(crate) fn campaign_state(campaign: &Campaign) -> AppResult<ApprovalState> {
    campaign.approval_state().ok_or_else(|| {
        AppError::InternalError(format!(
            "unknown approval state id {}",
            campaign.approval_state_id
        ))
    })
}

pub(crate) fn donation_status(donation: &Donation) -> AppResult<DonationStatus> {
    donation.status().ok_or_else(|| {
        AppError::InternalError(format!("unknown donation status id {}", donation.status_id))
    })
}

// ---------------------------------------------------------------------------
// Shared authorization checks
// ---------------------------------------------------------------------------

/// True if the caller is school staff or the principal scoped to `school_id`.
pub(crate) fn is_school_actor(auth: &AuthUser, school_id: DbId) -> bool {
    (auth.role == ROLE_SCHOOL || auth.role == ROLE_PRINCIPAL)
        && auth.school_id == Some(school_id)
}

/// Admins and the owning school's staff/principal pass; everyone else is
/// rejected with the given message.
pub(crate) fn ensure_school_actor(
    auth: &AuthUser,
    school_id: DbId,
    message: &str,
) -> AppResult<()> {
    if auth.role == ROLE_ADMIN || is_school_actor(auth, school_id) {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(message.into())))
}

/// The campaign's counted ledger total in its own unit: completed amounts
/// for monetary campaigns, received quantities for non-monetary ones.
pub(crate) async fn counted_total(pool: &sqlx::PgPool, campaign: &Campaign) -> AppResult<i64> {
    let totals = DonationRepo::campaign_totals(pool, campaign.id).await?;
    Ok(match campaign_kind(campaign)? {
        CampaignKind::Monetary => totals.raised_amount,
        CampaignKind::NonMonetary => totals.items_received,
    })
}
