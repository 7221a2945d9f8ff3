//! Handlers for the `/donations` resource.
//!
//! Donors record donations against approved, still-open campaigns.
//! Monetary donations open as `pending` and are settled exclusively by
//! the payment gateway callback; non-monetary pledges open as `pledged`
//! and are settled by school staff (or cancelled by the donor).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fundra_core::campaign::CampaignKind;
use fundra_core::donation::{
    validate_common, validate_monetary, validate_non_monetary, visibility, DonationStatus,
    TransitionOutcome,
};
use fundra_core::error::CoreError;
use fundra_core::progress::ensure_accepting_donations;
use fundra_core::roles::{ROLE_ADMIN, ROLE_DONOR};
use fundra_core::types::DbId;
use fundra_db::models::donation::{CreateDonation, Donation, DonationListQuery};
use fundra_db::repositories::{CampaignRepo, DonationRepo, DonorRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::donors::refresh_donor_tier;
use crate::handlers::{
    campaign_kind, campaign_state, counted_total, donation_status, ensure_school_actor,
    is_school_actor,
};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireDonor;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Donation as serialized in API responses, with lookup ids resolved to
/// their wire names.
#[derive(Debug, Serialize)]
pub struct DonationResponse {
    pub id: DbId,
    pub campaign_id: DbId,
    pub donor_id: DbId,
    pub kind: &'static str,
    pub status: &'static str,
    pub amount: Option<i64>,
    pub quantity: Option<i32>,
    pub visibility: String,
    pub message: Option<String>,
    pub delivery_method: Option<String>,
    pub delivery_deadline: Option<DateTime<Utc>>,
    pub proof_reference: Option<String>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl DonationResponse {
    pub(crate) fn from_row(donation: Donation) -> AppResult<Self> {
        let kind = donation.kind().ok_or_else(|| {
            AppError::InternalError(format!("unknown donation kind id {}", donation.kind_id))
        })?;
        let status = donation_status(&donation)?;
        Ok(Self {
            id: donation.id,
            campaign_id: donation.campaign_id,
            donor_id: donation.donor_id,
            kind: kind.as_str(),
            status: status.as_str(),
            amount: donation.amount,
            quantity: donation.quantity,
            visibility: donation.visibility,
            message: donation.message,
            delivery_method: donation.delivery_method,
            delivery_deadline: donation.delivery_deadline,
            proof_reference: donation.proof_reference,
            payment_reference: donation.payment_reference,
            created_at: donation.created_at,
            finalized_at: donation.finalized_at,
        })
    }
}

/// Checkout details handed to the client so it can start the gateway
/// payment flow. Only present for monetary donations.
#[derive(Debug, Serialize)]
pub struct CheckoutIntent {
    pub donation_id: DbId,
    pub amount: i64,
    pub currency: String,
    pub campaign_reference: String,
}

/// Response body for a newly recorded donation.
#[derive(Debug, Serialize)]
pub struct DonationCreatedResponse {
    pub donation: DonationResponse,
    pub checkout: Option<CheckoutIntent>,
}

/// Request body for PUT /donations/{id}/status.
#[derive(Debug, Deserialize)]
pub struct UpdateDonationStatus {
    /// Target status wire name, e.g. `received`.
    pub status: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Donation",
        id,
    })
}

async fn find_donation(pool: &sqlx::PgPool, id: DbId) -> AppResult<Donation> {
    DonationRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Apply a validated transition, tolerating races: if another writer got
/// there first with the same terminal outcome the row is returned as-is,
/// a conflicting outcome is a 409.
pub(crate) async fn apply_transition(
    state: &AppState,
    donation: &Donation,
    expected: DonationStatus,
    next: DonationStatus,
    payment_reference: Option<&str>,
) -> AppResult<Donation> {
    let moved =
        DonationRepo::transition(&state.pool, donation.id, expected, next, payment_reference)
            .await?;
    if !moved {
        let current = find_donation(&state.pool, donation.id).await?;
        if current.status() == Some(next) {
            return Ok(current);
        }
        let current_status = donation_status(&current)?;
        return Err(AppError::Core(CoreError::InvalidTransition(format!(
            "donation cannot move from {current_status} to {next}"
        ))));
    }

    if next.is_counted() {
        refresh_donor_tier(state, donation.donor_id).await?;
    }

    tracing::info!(
        donation_id = donation.id,
        from = expected.as_str(),
        to = next.as_str(),
        "Donation status updated",
    );

    find_donation(&state.pool, donation.id).await
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// POST /api/v1/donations
///
/// Record a donation. The campaign must be approved, before its deadline,
/// and short of its target; anything else rejects with 409
/// `CAMPAIGN_CLOSED`. Monetary donations return a checkout intent for the
/// payment gateway. Returns 201.
pub async fn record_donation(
    actor: RequireDonor,
    State(state): State<AppState>,
    Json(input): Json<CreateDonation>,
) -> AppResult<impl IntoResponse> {
    let auth = actor.0;
    let campaign = CampaignRepo::find_by_id(&state.pool, input.campaign_id())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: input.campaign_id(),
        }))?;

    let kind = campaign_kind(&campaign)?;
    if input.kind() != kind {
        return Err(AppError::Core(CoreError::Validation(format!(
            "a {} donation cannot be recorded against a {} campaign",
            input.kind(),
            kind
        ))));
    }

    // Campaign-level gate first: a closed campaign rejects even a payload
    // that would also fail validation.
    let counted = counted_total(&state.pool, &campaign).await?;
    ensure_accepting_donations(
        campaign_state(&campaign)?,
        counted,
        campaign.target(),
        campaign.deadline,
        Utc::now(),
    )?;

    match &input {
        CreateDonation::Monetary {
            amount,
            visibility: vis,
            message,
            ..
        } => {
            validate_common(
                vis.as_deref().unwrap_or(visibility::PUBLIC),
                message.as_deref(),
            )?;
            validate_monetary(*amount)?;
        }
        CreateDonation::NonMonetary {
            quantity,
            delivery_method,
            proof_reference,
            visibility: vis,
            message,
            ..
        } => {
            validate_common(
                vis.as_deref().unwrap_or(visibility::PUBLIC),
                message.as_deref(),
            )?;
            validate_non_monetary(*quantity, delivery_method, proof_reference.as_deref())?;
        }
    }

    DonorRepo::ensure(&state.pool, auth.user_id).await?;
    let donation = DonationRepo::record(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        donation_id = donation.id,
        campaign_id = donation.campaign_id,
        donor_id = donation.donor_id,
        kind = kind.as_str(),
        "Donation recorded",
    );

    let checkout = match kind {
        CampaignKind::Monetary => Some(CheckoutIntent {
            donation_id: donation.id,
            amount: donation.amount.unwrap_or(0),
            currency: state.config.policy.currency.clone(),
            campaign_reference: format!("campaign-{}", campaign.id),
        }),
        CampaignKind::NonMonetary => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DonationCreatedResponse {
                donation: DonationResponse::from_row(donation)?,
                checkout,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// List / get
// ---------------------------------------------------------------------------

/// GET /api/v1/donations
///
/// The calling donor's own donations, newest first. Supports an optional
/// `status` filter plus `limit`/`offset`.
pub async fn list_my_donations(
    actor: RequireDonor,
    State(state): State<AppState>,
    Query(params): Query<DonationListQuery>,
) -> AppResult<impl IntoResponse> {
    let status_id = match params.status.as_deref() {
        Some(name) => Some(
            DonationStatus::parse(name)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(format!(
                        "unknown donation status: {name}"
                    )))
                })?
                .id(),
        ),
        None => None,
    };

    let donations = DonationRepo::list_by_donor(
        &state.pool,
        actor.0.user_id,
        status_id,
        params.limit,
        params.offset,
    )
    .await?;
    let data = donations
        .into_iter()
        .map(DonationResponse::from_row)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/donations/{id}
///
/// A single donation. Visible to its donor, the campaign's school
/// staff/principal, and admins.
pub async fn get_donation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(donation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let donation = find_donation(&state.pool, donation_id).await?;

    let owner = auth.role == ROLE_DONOR && donation.donor_id == auth.user_id;
    if !owner {
        let campaign = CampaignRepo::find_by_id(&state.pool, donation.campaign_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "campaign {} missing for donation {}",
                    donation.campaign_id, donation.id
                ))
            })?;
        ensure_school_actor(
            &auth,
            campaign.school_id,
            "Cannot view another donor's donation",
        )?;
    }

    Ok(Json(DataResponse {
        data: DonationResponse::from_row(donation)?,
    }))
}

// ---------------------------------------------------------------------------
// Status updates (pledge machine)
// ---------------------------------------------------------------------------

/// PUT /api/v1/donations/{id}/status
///
/// Settle a non-monetary pledge: school staff of the campaign's school
/// (or an admin) mark it `received`; they or the pledging donor may mark
/// it `cancelled`. Monetary statuses move only via the payment gateway
/// callback. Re-applying the status a donation already holds is a no-op.
pub async fn update_donation_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(donation_id): Path<DbId>,
    Json(input): Json<UpdateDonationStatus>,
) -> AppResult<impl IntoResponse> {
    let next = DonationStatus::parse(&input.status).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "unknown donation status: {}",
            input.status
        )))
    })?;

    if next.kind() == CampaignKind::Monetary {
        return Err(AppError::Core(CoreError::Forbidden(
            "Payment statuses are set by the payment gateway callback".into(),
        )));
    }

    let donation = find_donation(&state.pool, donation_id).await?;
    let campaign = CampaignRepo::find_by_id(&state.pool, donation.campaign_id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "campaign {} missing for donation {}",
                donation.campaign_id, donation.id
            ))
        })?;

    let school_actor = auth.role == ROLE_ADMIN || is_school_actor(&auth, campaign.school_id);
    let donor_owner = auth.role == ROLE_DONOR && donation.donor_id == auth.user_id;
    let allowed = match next {
        // Only the receiving school confirms that items actually arrived.
        DonationStatus::Received => school_actor,
        DonationStatus::Cancelled => school_actor || donor_owner,
        _ => school_actor,
    };
    if !allowed {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Not allowed to mark this donation {next}"
        ))));
    }

    let current = donation_status(&donation)?;
    let updated = match fundra_core::donation::validate_transition(current, next)? {
        TransitionOutcome::AlreadyApplied => donation,
        TransitionOutcome::Apply => {
            apply_transition(&state, &donation, current, next, None).await?
        }
    };

    Ok(Json(DataResponse {
        data: DonationResponse::from_row(updated)?,
    }))
}
