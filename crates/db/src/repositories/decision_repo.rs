//! Repository for the campaign decision audit trail.

use sqlx::PgPool;

use crate::models::decision::CampaignDecision;
use fundra_core::campaign::{ApprovalState, DecisionAction};
use fundra_core::types::DbId;

const COLUMNS: &str = "id, campaign_id, decided_by, actor_role, action, comment, \
     previous_state_id, new_state_id, created_at";

pub struct DecisionRepo;

impl DecisionRepo {
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        pool: &PgPool,
        campaign_id: DbId,
        decided_by: DbId,
        actor_role: &str,
        action: DecisionAction,
        comment: Option<&str>,
        previous_state: ApprovalState,
        new_state: ApprovalState,
    ) -> Result<CampaignDecision, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_decisions
                 (campaign_id, decided_by, actor_role, action, comment,
                  previous_state_id, new_state_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CampaignDecision>(&query)
            .bind(campaign_id)
            .bind(decided_by)
            .bind(actor_role)
            .bind(action.as_str())
            .bind(comment)
            .bind(previous_state.id())
            .bind(new_state.id())
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CampaignDecision>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_decisions
             WHERE campaign_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, CampaignDecision>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }
}
