use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use fundra_core::status::StatusId;
use fundra_core::tier::DonorTier;
use fundra_core::types::DbId;

/// A row from the `donors` table.
///
/// `id` is the subject claim issued by the identity platform; rows are
/// created lazily on a donor's first donation. `tier_id` is a cache of the
/// recognition tier derived from counted donations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donor {
    pub id: DbId,
    pub tier_id: StatusId,
    pub tier_updated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Donor {
    pub fn tier(&self) -> Option<DonorTier> {
        DonorTier::from_id(self.tier_id)
    }
}
