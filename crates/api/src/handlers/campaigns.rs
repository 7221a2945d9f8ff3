//! Handlers for the `/campaigns` resource.
//!
//! Campaigns are submitted by school staff, routed to the approval queue
//! the policy threshold selects, decided by an admin or the school's
//! principal, and browsed by everyone once approved.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fundra_core::campaign::{
    authorize_decision, route_submission, validate_new_campaign, ApprovalState, CampaignKind,
    DecisionAction,
};
use fundra_core::donation::DonationStatus;
use fundra_core::error::CoreError;
use fundra_core::progress;
use fundra_core::roles::{ROLE_ADMIN, ROLE_PRINCIPAL, ROLE_SCHOOL};
use fundra_core::types::DbId;
use fundra_db::models::campaign::{
    Campaign, CampaignFilter, CampaignListQuery, CreateCampaign, NewCampaign,
};
use fundra_db::models::donation::DonationListQuery;
use fundra_db::repositories::{
    CampaignRepo, CategoryRepo, DecisionRepo, DonationRepo, SchoolRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::donations::DonationResponse;
use crate::handlers::{campaign_kind, campaign_state, ensure_school_actor, is_school_actor};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireSchool};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response shapes
// ---------------------------------------------------------------------------

/// Campaign as serialized in API responses, with lookup ids resolved to
/// their wire names.
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    pub id: DbId,
    pub school_id: DbId,
    pub category_id: DbId,
    pub kind: &'static str,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: Option<i64>,
    pub target_quantity: Option<i32>,
    pub deadline: DateTime<Utc>,
    pub approval_state: &'static str,
    pub created_by: DbId,
    pub decided_by: Option<DbId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignResponse {
    pub(crate) fn from_row(campaign: Campaign) -> AppResult<Self> {
        let kind = campaign_kind(&campaign)?;
        let state = campaign_state(&campaign)?;
        Ok(Self {
            id: campaign.id,
            school_id: campaign.school_id,
            category_id: campaign.category_id,
            kind: kind.as_str(),
            title: campaign.title,
            description: campaign.description,
            target_amount: campaign.target_amount,
            target_quantity: campaign.target_quantity,
            deadline: campaign.deadline,
            approval_state: state.as_str(),
            created_by: campaign.created_by,
            decided_by: campaign.decided_by,
            decided_at: campaign.decided_at,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        })
    }
}

/// Funding progress derived from the donation ledger.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub campaign_id: DbId,
    pub kind: &'static str,
    pub target: i64,
    pub raised_amount: i64,
    pub items_received: i64,
    pub percent_complete: i16,
    pub remaining_needed: i64,
    pub is_closed: bool,
}

/// Optional body for approve/reject calls.
#[derive(Debug, Default, Deserialize)]
pub struct DecideBody {
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Campaign",
        id,
    })
}

async fn find_campaign(pool: &sqlx::PgPool, id: DbId) -> AppResult<Campaign> {
    CampaignRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Fetch a campaign applying read visibility: approved campaigns are
/// public to authenticated callers, unapproved ones exist only for admins
/// and the owning school's staff/principal.
async fn find_visible(pool: &sqlx::PgPool, id: DbId, auth: &AuthUser) -> AppResult<Campaign> {
    let campaign = find_campaign(pool, id).await?;
    let visible = auth.role == ROLE_ADMIN
        || campaign.approval_state() == Some(ApprovalState::Approved)
        || is_school_actor(auth, campaign.school_id);
    if !visible {
        // Hidden rather than forbidden: outsiders cannot probe for
        // unapproved campaigns.
        return Err(not_found(id));
    }
    Ok(campaign)
}

fn parse_state(name: &str) -> AppResult<ApprovalState> {
    ApprovalState::parse(name).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "unknown approval state: {name}"
        )))
    })
}

fn parse_kind(name: &str) -> AppResult<CampaignKind> {
    CampaignKind::parse(name).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!("unknown campaign kind: {name}")))
    })
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/campaigns
///
/// Submit a campaign for the caller's school. The routing value (target
/// amount or quantity) picks the approval queue: above the policy
/// threshold goes to the principal, everything else to a platform admin.
/// Returns 201 with the created campaign.
pub async fn create_campaign(
    actor: RequireSchool,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    let kind = parse_kind(&input.kind)?;

    let target = match kind {
        CampaignKind::Monetary => {
            if input.target_quantity.is_some() {
                return Err(AppError::Core(CoreError::Validation(
                    "target_quantity must not be set for monetary campaigns".into(),
                )));
            }
            input.target_amount.ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "target_amount is required for monetary campaigns".into(),
                ))
            })?
        }
        CampaignKind::NonMonetary => {
            if input.target_amount.is_some() {
                return Err(AppError::Core(CoreError::Validation(
                    "target_amount must not be set for non-monetary campaigns".into(),
                )));
            }
            i64::from(input.target_quantity.ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "target_quantity is required for non-monetary campaigns".into(),
                ))
            })?)
        }
    };

    validate_new_campaign(
        &input.title,
        input.description.as_deref(),
        target,
        input.deadline,
        Utc::now(),
    )?;

    SchoolRepo::find_by_id(&state.pool, actor.school_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "School",
            id: actor.school_id,
        }))?;
    CategoryRepo::find_by_id(&state.pool, input.category_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id: input.category_id,
        }))?;

    let approval_state = route_submission(target, state.config.policy.approval_threshold);

    let campaign = CampaignRepo::create(
        &state.pool,
        &NewCampaign {
            school_id: actor.school_id,
            category_id: input.category_id,
            kind,
            title: input.title,
            description: input.description,
            target_amount: (kind == CampaignKind::Monetary).then_some(target),
            target_quantity: input.target_quantity,
            deadline: input.deadline,
            approval_state,
            created_by: actor.user.user_id,
        },
    )
    .await?;

    tracing::info!(
        campaign_id = campaign.id,
        school_id = campaign.school_id,
        state = approval_state.as_str(),
        "Campaign submitted",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CampaignResponse::from_row(campaign)?,
        }),
    ))
}

// ---------------------------------------------------------------------------
// List / get
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns
///
/// List campaigns. Admins see everything the filters match. School staff
/// and principals default to their own school and see all of its states;
/// asking for another school narrows the view to approved campaigns.
/// Donors always see approved campaigns only.
pub async fn list_campaigns(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<CampaignListQuery>,
) -> AppResult<impl IntoResponse> {
    let approval_state_id = match params.state.as_deref() {
        Some(name) => Some(parse_state(name)?.id()),
        None => None,
    };
    let kind_id = match params.kind.as_deref() {
        Some(name) => Some(parse_kind(name)?.id()),
        None => None,
    };

    let mut filter = CampaignFilter {
        approval_state_id,
        kind_id,
        school_id: params.school_id,
        category_id: params.category_id,
        limit: params.limit,
        offset: params.offset,
    };

    if auth.role != ROLE_ADMIN {
        let own_school = (auth.role == ROLE_SCHOOL || auth.role == ROLE_PRINCIPAL)
            .then_some(auth.school_id)
            .flatten();
        match own_school {
            Some(own) => {
                let target_school = filter.school_id.unwrap_or(own);
                if target_school != own {
                    filter.approval_state_id = Some(ApprovalState::Approved.id());
                }
                filter.school_id = Some(target_school);
            }
            None => filter.approval_state_id = Some(ApprovalState::Approved.id()),
        }
    }

    let campaigns = CampaignRepo::list(&state.pool, &filter).await?;
    let data = campaigns
        .into_iter()
        .map(CampaignResponse::from_row)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_visible(&state.pool, campaign_id, &auth).await?;
    Ok(Json(DataResponse {
        data: CampaignResponse::from_row(campaign)?,
    }))
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns/{id}/progress
///
/// Funding progress derived from counted donations. Always renders, even
/// when the ledger is empty or the campaign already closed.
pub async fn get_progress(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_visible(&state.pool, campaign_id, &auth).await?;
    let totals = DonationRepo::campaign_totals(&state.pool, campaign.id).await?;
    let kind = campaign_kind(&campaign)?;
    let counted = match kind {
        CampaignKind::Monetary => totals.raised_amount,
        CampaignKind::NonMonetary => totals.items_received,
    };
    let target = campaign.target();

    Ok(Json(DataResponse {
        data: ProgressResponse {
            campaign_id: campaign.id,
            kind: kind.as_str(),
            target,
            raised_amount: totals.raised_amount,
            items_received: totals.items_received,
            percent_complete: progress::percent_complete(counted, target),
            remaining_needed: progress::remaining_needed(counted, target),
            is_closed: progress::is_closed(counted, target, campaign.deadline, Utc::now()),
        },
    }))
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

async fn decide_campaign(
    state: &AppState,
    auth: &AuthUser,
    campaign_id: DbId,
    action: DecisionAction,
    comment: Option<String>,
) -> AppResult<Json<DataResponse<CampaignResponse>>> {
    let campaign = find_campaign(&state.pool, campaign_id).await?;
    let current = campaign_state(&campaign)?;

    authorize_decision(current, &auth.role, auth.school_id, campaign.school_id)?;

    let new_state = action.target_state();
    let moved = CampaignRepo::decide(&state.pool, campaign.id, current, new_state, auth.user_id)
        .await?;
    if !moved {
        // Lost a race with another decision on the same pending campaign.
        return Err(AppError::Core(CoreError::InvalidTransition(
            "campaign has already been decided".into(),
        )));
    }

    DecisionRepo::append(
        &state.pool,
        campaign.id,
        auth.user_id,
        &auth.role,
        action,
        comment.as_deref(),
        current,
        new_state,
    )
    .await?;

    tracing::info!(
        campaign_id = campaign.id,
        action = action.as_str(),
        decided_by = auth.user_id,
        role = %auth.role,
        "Campaign decided",
    );

    let updated = find_campaign(&state.pool, campaign_id).await?;
    Ok(Json(DataResponse {
        data: CampaignResponse::from_row(updated)?,
    }))
}

/// POST /api/v1/campaigns/{id}/approve
///
/// Approve a pending campaign. Admin-pending campaigns require the admin
/// role; principal-pending campaigns require the principal of the
/// campaign's own school. Decided campaigns reject with 409.
pub async fn approve_campaign(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    body: Option<Json<DecideBody>>,
) -> AppResult<impl IntoResponse> {
    let comment = body.and_then(|Json(b)| b.comment);
    decide_campaign(&state, &auth, campaign_id, DecisionAction::Approve, comment).await
}

/// POST /api/v1/campaigns/{id}/reject
///
/// Reject a pending campaign. Same authorization rules as approve.
/// Rejection is terminal; the campaign never accepts donations.
pub async fn reject_campaign(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    body: Option<Json<DecideBody>>,
) -> AppResult<impl IntoResponse> {
    let comment = body.and_then(|Json(b)| b.comment);
    decide_campaign(&state, &auth, campaign_id, DecisionAction::Reject, comment).await
}

/// GET /api/v1/campaigns/{id}/decisions
///
/// The append-only decision audit trail. Visible to admins and the
/// campaign's school staff/principal.
pub async fn list_decisions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_campaign(&state.pool, campaign_id).await?;
    ensure_school_actor(
        &auth,
        campaign.school_id,
        "Only the campaign's school may view its decision history",
    )?;
    let decisions = DecisionRepo::list_by_campaign(&state.pool, campaign.id).await?;
    Ok(Json(DataResponse { data: decisions }))
}

// ---------------------------------------------------------------------------
// Ledger view
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns/{id}/donations
///
/// The campaign's donation ledger, newest first. Visible to admins and
/// the campaign's school staff/principal; supports an optional `status`
/// filter plus `limit`/`offset`.
pub async fn list_campaign_donations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Query(params): Query<DonationListQuery>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_campaign(&state.pool, campaign_id).await?;
    ensure_school_actor(
        &auth,
        campaign.school_id,
        "Only the campaign's school may view its donation ledger",
    )?;

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

    let donations = DonationRepo::list_by_campaign(
        &state.pool,
        campaign.id,
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

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/v1/campaigns/{id}
///
/// Remove a campaign that has not received a counted donation. Uncounted
/// rows (open payments, unconfirmed or cancelled pledges, failed
/// payments) are removed with it. Returns 409 once any donation counts.
pub async fn delete_campaign(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = find_campaign(&state.pool, campaign_id).await?;
    if auth.role != ROLE_ADMIN && !(auth.role == ROLE_SCHOOL && auth.school_id == Some(campaign.school_id)) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owning school or an admin may delete a campaign".into(),
        )));
    }

    let deleted = CampaignRepo::delete_if_uncounted(&state.pool, campaign.id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::Conflict(
            "Campaign has counted donations and cannot be deleted".into(),
        )));
    }

    tracing::info!(campaign_id, deleted_by = auth.user_id, "Campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}
