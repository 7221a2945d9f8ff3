use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use fundra_core::status::StatusId;
use fundra_core::types::DbId;

/// A row from the `campaign_decisions` audit table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignDecision {
    pub id: DbId,
    pub campaign_id: DbId,
    pub decided_by: DbId,
    pub actor_role: String,
    pub action: String,
    pub comment: Option<String>,
    pub previous_state_id: StatusId,
    pub new_state_id: StatusId,
    pub created_at: DateTime<Utc>,
}
