//! Engine policy: the configured thresholds the state machines run against.
//!
//! All values are injected at startup (see the API crate's config loader);
//! transition and aggregation logic never reads environment variables or
//! hard-codes threshold literals.

use crate::tier::TierSchedule;

/// Routing value above which a campaign requires principal review.
/// Comparison is strict greater-than; exactly-at-threshold takes the
/// admin path.
pub const DEFAULT_APPROVAL_THRESHOLD: i64 = 50_000;

/// Lifetime counted monetary value required for each tier.
pub const DEFAULT_BRONZE_AMOUNT: i64 = 20_000;
pub const DEFAULT_SILVER_AMOUNT: i64 = 40_000;
pub const DEFAULT_GOLD_AMOUNT: i64 = 80_000;

/// Lifetime counted item quantity required for each tier.
pub const DEFAULT_BRONZE_ITEMS: i64 = 100;
pub const DEFAULT_SILVER_ITEMS: i64 = 200;
pub const DEFAULT_GOLD_ITEMS: i64 = 400;

/// Currency code attached to checkout intents. Amounts are whole currency
/// units; the platform currency has no fractional unit in practice.
pub const DEFAULT_CURRENCY: &str = "IDR";

/// Configured policy values for approval routing and donor tiers.
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// Campaign routing value (amount or quantity) above which principal
    /// review is required.
    pub approval_threshold: i64,
    /// Tier thresholds over lifetime counted monetary value.
    pub amount_tiers: TierSchedule,
    /// Tier thresholds over lifetime counted item quantity.
    pub item_tiers: TierSchedule,
    /// Currency code for payment checkout intents.
    pub currency: String,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            approval_threshold: DEFAULT_APPROVAL_THRESHOLD,
            amount_tiers: TierSchedule {
                bronze: DEFAULT_BRONZE_AMOUNT,
                silver: DEFAULT_SILVER_AMOUNT,
                gold: DEFAULT_GOLD_AMOUNT,
            },
            item_tiers: TierSchedule {
                bronze: DEFAULT_BRONZE_ITEMS,
                silver: DEFAULT_SILVER_ITEMS,
                gold: DEFAULT_GOLD_ITEMS,
            },
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}
