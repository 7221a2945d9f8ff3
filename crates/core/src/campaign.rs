//! Campaign approval workflow: review routing and decision legality.
//!
//! A submitted campaign lands directly in one of two pending states based
//! on its size, then moves exactly once:
//!
//! ```text
//!   submit ──(routing value <= threshold)──> PendingAdminApproval ──┐
//!   submit ──(routing value >  threshold)──> PendingPrincipalApproval ─┤
//!                                                                     ├─ approve ─> Approved
//!                                                                     └─ reject ──> Rejected
//! ```
//!
//! `Approved` is the only state in which a campaign accepts donations.
//! `Rejected` is terminal. An Admin decides admin-pending campaigns; only
//! the owning school's Principal decides principal-pending ones.

use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_PRINCIPAL};
use crate::status::define_status_enum;
use crate::types::{DbId, Timestamp};

define_status_enum! {
    /// Campaign approval state. Discriminants match the `approval_states`
    /// seed data.
    ApprovalState {
        PendingAdminApproval = 1 => "pending_admin_approval",
        PendingPrincipalApproval = 2 => "pending_principal_approval",
        Approved = 3 => "approved",
        Rejected = 4 => "rejected",
    }
}

define_status_enum! {
    /// What a campaign collects. Discriminants match the `campaign_kinds`
    /// seed data. Donations inherit the kind of their campaign.
    CampaignKind {
        Monetary = 1 => "monetary",
        NonMonetary = 2 => "non_monetary",
    }
}

impl ApprovalState {
    /// Whether the campaign is still awaiting review.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            ApprovalState::PendingAdminApproval | ApprovalState::PendingPrincipalApproval
        )
    }
}

/// Maximum campaign title length.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum campaign description length.
pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// The reviewer's verdict on a pending campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAction {
    Approve,
    Reject,
}

impl DecisionAction {
    /// Action name recorded in the decision audit trail.
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionAction::Approve => "approve",
            DecisionAction::Reject => "reject",
        }
    }

    /// The state the campaign moves to when this action is applied.
    pub fn target_state(self) -> ApprovalState {
        match self {
            DecisionAction::Approve => ApprovalState::Approved,
            DecisionAction::Reject => ApprovalState::Rejected,
        }
    }
}

/// Route a submitted campaign to its review path.
///
/// The routing value is the campaign target (amount for monetary,
/// quantity for non-monetary). Strictly greater than the threshold goes to
/// principal review; exactly at the threshold stays on the admin path.
pub fn route_submission(routing_value: i64, approval_threshold: i64) -> ApprovalState {
    if routing_value > approval_threshold {
        ApprovalState::PendingPrincipalApproval
    } else {
        ApprovalState::PendingAdminApproval
    }
}

/// Validate a campaign submission before anything is stored.
pub fn validate_new_campaign(
    title: &str,
    description: Option<&str>,
    target: i64,
    deadline: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    if title.len() > TITLE_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {TITLE_MAX_LEN} characters"
        )));
    }
    if let Some(desc) = description {
        if desc.len() > DESCRIPTION_MAX_LEN {
            return Err(CoreError::Validation(format!(
                "description must be at most {DESCRIPTION_MAX_LEN} characters"
            )));
        }
    }
    if target <= 0 {
        return Err(CoreError::Validation("target must be positive".into()));
    }
    if deadline <= now {
        return Err(CoreError::Validation(
            "deadline must be in the future".into(),
        ));
    }
    Ok(())
}

/// Check that `actor` may decide a campaign in its current state.
///
/// Fails with `InvalidTransition` when the campaign has already been
/// decided, and with `Forbidden` when the actor does not hold the role the
/// pending state requires. Principal review additionally requires the
/// actor's school scope to match the campaign's owning school.
pub fn authorize_decision(
    current: ApprovalState,
    actor_role: &str,
    actor_school_id: Option<DbId>,
    campaign_school_id: DbId,
) -> Result<(), CoreError> {
    match current {
        ApprovalState::PendingAdminApproval => {
            if actor_role != ROLE_ADMIN {
                return Err(CoreError::Forbidden(
                    "only an admin may decide a campaign awaiting admin approval".into(),
                ));
            }
            Ok(())
        }
        ApprovalState::PendingPrincipalApproval => {
            if actor_role != ROLE_PRINCIPAL || actor_school_id != Some(campaign_school_id) {
                return Err(CoreError::Forbidden(
                    "only the school's principal may decide this campaign".into(),
                ));
            }
            Ok(())
        }
        ApprovalState::Approved | ApprovalState::Rejected => Err(CoreError::InvalidTransition(
            format!("campaign has already been decided ({current})"),
        )),
    }
}
