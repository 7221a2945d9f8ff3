//! Repository for donor rows and the cached recognition tier.

use sqlx::PgPool;

use crate::models::donor::Donor;
use fundra_core::tier::DonorTier;
use fundra_core::types::DbId;

const COLUMNS: &str = "id, tier_id, tier_updated_at, created_at, updated_at";

pub struct DonorRepo;

impl DonorRepo {
    /// Create the donor row for an identity-platform subject if it does not
    /// exist yet. Called before a donation insert so the FK holds.
    pub async fn ensure(pool: &PgPool, donor_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO donors (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(donor_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Donor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM donors WHERE id = $1");
        sqlx::query_as::<_, Donor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Raise the cached tier to `tier`. The guard keeps the cache monotonic:
    /// tier ids are ordered, and a recognised tier is never taken away even
    /// if a concurrent writer saw older totals.
    pub async fn raise_tier(
        pool: &PgPool,
        donor_id: DbId,
        tier: DonorTier,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE donors
             SET tier_id = $2, tier_updated_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND tier_id < $2",
        )
        .bind(donor_id)
        .bind(tier.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
