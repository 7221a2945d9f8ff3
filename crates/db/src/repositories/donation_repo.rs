//! Repository for the donation ledger.
//!
//! Status updates are compare-and-swap on the expected current status, so
//! a gateway callback and a school staff action racing on the same row can
//! never both win.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::donation::{CampaignTotals, CreateDonation, Donation, DonorTotals};
use crate::repositories::clamp_page;
use fundra_core::donation::{visibility, DonationStatus};
use fundra_core::status::StatusId;
use fundra_core::types::DbId;

const COLUMNS: &str = "id, campaign_id, donor_id, kind_id, status_id, amount, quantity, \
     visibility, message, delivery_method, delivery_deadline, proof_reference, \
     payment_reference, created_at, updated_at, finalized_at";

/// Row counts from one expiry sweep pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiredCounts {
    pub payments_failed: u64,
    pub pledges_cancelled: u64,
}

pub struct DonationRepo;

impl DonationRepo {
    /// Insert a donation in the initial status for its kind.
    pub async fn record(
        pool: &PgPool,
        donor_id: DbId,
        input: &CreateDonation,
    ) -> Result<Donation, sqlx::Error> {
        let kind = input.kind();
        let status = DonationStatus::initial_for(kind);
        let (campaign_id, amount, quantity, vis, message, delivery_method, delivery_deadline, proof) =
            match input {
                CreateDonation::Monetary {
                    campaign_id,
                    amount,
                    visibility,
                    message,
                } => (*campaign_id, Some(*amount), None, visibility, message, None, None, None),
                CreateDonation::NonMonetary {
                    campaign_id,
                    quantity,
                    delivery_method,
                    delivery_deadline,
                    proof_reference,
                    visibility,
                    message,
                } => (
                    *campaign_id,
                    None,
                    Some(*quantity),
                    visibility,
                    message,
                    Some(delivery_method.as_str()),
                    *delivery_deadline,
                    proof_reference.as_deref(),
                ),
            };

        let query = format!(
            "INSERT INTO donations (campaign_id, donor_id, kind_id, status_id, amount, quantity,
                                    visibility, message, delivery_method, delivery_deadline,
                                    proof_reference)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(campaign_id)
            .bind(donor_id)
            .bind(kind.id())
            .bind(status.id())
            .bind(amount)
            .bind(quantity)
            .bind(vis.as_deref().unwrap_or(visibility::PUBLIC))
            .bind(message)
            .bind(delivery_method)
            .bind(delivery_deadline)
            .bind(proof)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM donations WHERE id = $1");
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a donation `expected -> next`, stamping `finalized_at` (every
    /// legal target is terminal in both machines). `payment_reference` is
    /// attached when present and the row has none yet. Returns `false` if
    /// the row was not in `expected`.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        expected: DonationStatus,
        next: DonationStatus,
        payment_reference: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE donations
             SET status_id = $2,
                 payment_reference = COALESCE(payment_reference, $3),
                 finalized_at = NOW(),
                 updated_at = NOW()
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(next.id())
        .bind(payment_reference)
        .bind(expected.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
        status_id: Option<StatusId>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        Self::list_by(pool, "campaign_id", campaign_id, status_id, limit, offset).await
    }

    pub async fn list_by_donor(
        pool: &PgPool,
        donor_id: DbId,
        status_id: Option<StatusId>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        Self::list_by(pool, "donor_id", donor_id, status_id, limit, offset).await
    }

    async fn list_by(
        pool: &PgPool,
        column: &str,
        owner_id: DbId,
        status_id: Option<StatusId>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        let (limit, offset) = clamp_page(limit, offset);
        let status_clause = if status_id.is_some() {
            "AND status_id = $4"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM donations
             WHERE {column} = $1 {status_clause}
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let mut q = sqlx::query_as::<_, Donation>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset);
        if let Some(status_id) = status_id {
            q = q.bind(status_id);
        }
        q.fetch_all(pool).await
    }

    /// Counted totals for one campaign: completed amounts and received
    /// quantities. Rows in any other status contribute nothing.
    pub async fn campaign_totals(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<CampaignTotals, sqlx::Error> {
        sqlx::query_as::<_, CampaignTotals>(
            "SELECT
                 COALESCE(SUM(amount) FILTER (WHERE status_id = $2), 0)::BIGINT AS raised_amount,
                 COALESCE(SUM(quantity) FILTER (WHERE status_id = $3), 0)::BIGINT AS items_received
             FROM donations
             WHERE campaign_id = $1",
        )
        .bind(campaign_id)
        .bind(DonationStatus::Completed.id())
        .bind(DonationStatus::Received.id())
        .fetch_one(pool)
        .await
    }

    /// Lifetime counted totals for one donor, across all campaigns.
    pub async fn donor_totals(pool: &PgPool, donor_id: DbId) -> Result<DonorTotals, sqlx::Error> {
        sqlx::query_as::<_, DonorTotals>(
            "SELECT
                 COALESCE(SUM(amount) FILTER (WHERE status_id = $2), 0)::BIGINT AS total_amount,
                 COALESCE(SUM(quantity) FILTER (WHERE status_id = $3), 0)::BIGINT AS total_items
             FROM donations
             WHERE donor_id = $1",
        )
        .bind(donor_id)
        .bind(DonationStatus::Completed.id())
        .bind(DonationStatus::Received.id())
        .fetch_one(pool)
        .await
    }

    /// Resolve donations still open on campaigns whose deadline fell before
    /// `deadline_before`: pending payments fail, unconfirmed pledges are
    /// cancelled.
    pub async fn expire_overdue(
        pool: &PgPool,
        deadline_before: DateTime<Utc>,
    ) -> Result<ExpiredCounts, sqlx::Error> {
        let failed = Self::expire_status(
            pool,
            DonationStatus::Pending,
            DonationStatus::Failed,
            deadline_before,
        )
        .await?;
        let cancelled = Self::expire_status(
            pool,
            DonationStatus::Pledged,
            DonationStatus::Cancelled,
            deadline_before,
        )
        .await?;
        Ok(ExpiredCounts {
            payments_failed: failed,
            pledges_cancelled: cancelled,
        })
    }

    async fn expire_status(
        pool: &PgPool,
        from: DonationStatus,
        to: DonationStatus,
        deadline_before: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE donations d
             SET status_id = $1, finalized_at = NOW(), updated_at = NOW()
             FROM campaigns c
             WHERE d.campaign_id = c.id
               AND d.status_id = $2
               AND c.deadline < $3",
        )
        .bind(to.id())
        .bind(from.id())
        .bind(deadline_before)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
