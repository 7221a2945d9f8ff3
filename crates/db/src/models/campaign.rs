use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fundra_core::campaign::{ApprovalState, CampaignKind};
use fundra_core::status::StatusId;
use fundra_core::types::DbId;

/// A row from the `campaigns` table.
///
/// Exactly one of `target_amount` / `target_quantity` is set, enforced by a
/// CHECK constraint against `kind_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub school_id: DbId,
    pub category_id: DbId,
    pub kind_id: StatusId,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: Option<i64>,
    pub target_quantity: Option<i32>,
    pub deadline: DateTime<Utc>,
    pub approval_state_id: StatusId,
    pub created_by: DbId,
    pub decided_by: Option<DbId>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    /// Decode the kind discriminant. `None` only if the row predates the
    /// current lookup seeds, which the FK makes impossible in practice.
    pub fn kind(&self) -> Option<CampaignKind> {
        CampaignKind::from_id(self.kind_id)
    }

    /// Decode the approval state discriminant.
    pub fn approval_state(&self) -> Option<ApprovalState> {
        ApprovalState::from_id(self.approval_state_id)
    }

    /// The campaign's numeric goal: amount for monetary, quantity for
    /// non-monetary campaigns.
    pub fn target(&self) -> i64 {
        self.target_amount
            .or_else(|| self.target_quantity.map(i64::from))
            .unwrap_or(0)
    }
}

/// Request body for submitting a campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    pub description: Option<String>,
    /// Wire name of the campaign kind: `monetary` or `non_monetary`.
    pub kind: String,
    pub category_id: DbId,
    pub target_amount: Option<i64>,
    pub target_quantity: Option<i32>,
    pub deadline: DateTime<Utc>,
}

/// Insert payload for `CampaignRepo::create`, resolved by the handler after
/// validation and approval routing.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub school_id: DbId,
    pub category_id: DbId,
    pub kind: CampaignKind,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: Option<i64>,
    pub target_quantity: Option<i32>,
    pub deadline: DateTime<Utc>,
    pub approval_state: ApprovalState,
    pub created_by: DbId,
}

/// Query parameters accepted by the campaign list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignListQuery {
    /// Approval state wire name, e.g. `approved`.
    pub state: Option<String>,
    /// Campaign kind wire name.
    pub kind: Option<String>,
    pub school_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Resolved list filter passed to the repository.
#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    pub approval_state_id: Option<StatusId>,
    pub kind_id: Option<StatusId>,
    pub school_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
