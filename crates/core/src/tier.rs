//! Donor recognition tiers derived from lifetime counted contributions.
//!
//! Tiers are strictly ordered `None < Bronze < Silver < Gold`. The stored
//! tier on a donor row is a cache that may lag the ledger; `reconcile`
//! guarantees the displayed tier never regresses below either value.

use crate::policy::EnginePolicy;
use crate::status::define_status_enum;

define_status_enum! {
    /// Donor recognition tier. Discriminants match the `donor_tiers` seed
    /// data and double as the ordering used by `reconcile`.
    DonorTier {
        None = 1 => "none",
        Bronze = 2 => "bronze",
        Silver = 3 => "silver",
        Gold = 4 => "gold",
    }
}

/// Minimum lifetime totals for Bronze/Silver/Gold under one schedule.
#[derive(Debug, Clone)]
pub struct TierSchedule {
    pub bronze: i64,
    pub silver: i64,
    pub gold: i64,
}

impl TierSchedule {
    /// Map a lifetime total onto a tier: highest threshold met wins.
    pub fn tier_for(&self, total: i64) -> DonorTier {
        if total >= self.gold {
            DonorTier::Gold
        } else if total >= self.silver {
            DonorTier::Silver
        } else if total >= self.bronze {
            DonorTier::Bronze
        } else {
            DonorTier::None
        }
    }
}

/// Compute a donor's tier from lifetime counted totals.
///
/// The monetary and item schedules are evaluated independently and the
/// higher tier wins, so predominantly in-kind donors are recognized on the
/// item schedule. A donor with no counted donations lands on `None`.
pub fn compute_tier(amount_total: i64, item_total: i64, policy: &EnginePolicy) -> DonorTier {
    let by_amount = policy.amount_tiers.tier_for(amount_total);
    let by_items = policy.item_tiers.tier_for(item_total);
    by_amount.max(by_items)
}

/// Reconcile a stored tier against a freshly computed one.
///
/// Returns the maximum under the tier ordering. Tier storage is updated
/// asynchronously relative to the ledger; whichever value is higher is
/// authoritative, so a stale cache can never downgrade a donor visibly.
pub fn reconcile(stored: DonorTier, computed: DonorTier) -> DonorTier {
    stored.max(computed)
}
