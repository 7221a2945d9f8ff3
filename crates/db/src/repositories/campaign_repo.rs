//! Repository for campaign persistence and lifecycle updates.

use sqlx::PgPool;

use crate::models::campaign::{Campaign, CampaignFilter, NewCampaign};
use crate::repositories::clamp_page;
use fundra_core::campaign::ApprovalState;
use fundra_core::donation::DonationStatus;
use fundra_core::types::DbId;

const COLUMNS: &str = "id, school_id, category_id, kind_id, title, description, \
     target_amount, target_quantity, deadline, approval_state_id, created_by, \
     decided_by, decided_at, created_at, updated_at";

pub struct CampaignRepo;

impl CampaignRepo {
    pub async fn create(pool: &PgPool, input: &NewCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (school_id, category_id, kind_id, title, description,
                                    target_amount, target_quantity, deadline,
                                    approval_state_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(input.school_id)
            .bind(input.category_id)
            .bind(input.kind.id())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.target_amount)
            .bind(input.target_quantity)
            .bind(input.deadline)
            .bind(input.approval_state.id())
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, filter: &CampaignFilter) -> Result<Vec<Campaign>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx = 1;

        if filter.approval_state_id.is_some() {
            conditions.push(format!("approval_state_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.kind_id.is_some() {
            conditions.push(format!("kind_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.school_id.is_some() {
            conditions.push(format!("school_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.category_id.is_some() {
            conditions.push(format!("category_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let (limit, offset) = clamp_page(filter.limit, filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns {where_clause}
             ORDER BY created_at DESC
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, Campaign>(&query);
        if let Some(state_id) = filter.approval_state_id {
            q = q.bind(state_id);
        }
        if let Some(kind_id) = filter.kind_id {
            q = q.bind(kind_id);
        }
        if let Some(school_id) = filter.school_id {
            q = q.bind(school_id);
        }
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Move a campaign out of a pending state, compare-and-swap on the
    /// expected current state. Returns `false` if the campaign was not in
    /// `expected` (already decided, or raced by another decision).
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        expected: ApprovalState,
        new_state: ApprovalState,
        decided_by: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns
             SET approval_state_id = $2, decided_by = $3, decided_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND approval_state_id = $4",
        )
        .bind(id)
        .bind(new_state.id())
        .bind(decided_by)
        .bind(expected.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a campaign unless its ledger holds any counted donation.
    /// The existence check and the delete are one statement, so a donation
    /// completing concurrently cannot slip through. Uncounted donations go
    /// with the campaign via `ON DELETE CASCADE`.
    pub async fn delete_if_uncounted(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM campaigns
             WHERE id = $1 AND NOT EXISTS (
                 SELECT 1 FROM donations
                 WHERE campaign_id = $1 AND status_id IN ($2, $3)
             )",
        )
        .bind(id)
        .bind(DonationStatus::Completed.id())
        .bind(DonationStatus::Received.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
