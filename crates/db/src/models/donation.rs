use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fundra_core::campaign::CampaignKind;
use fundra_core::donation::DonationStatus;
use fundra_core::status::StatusId;
use fundra_core::types::DbId;

/// A row from the `donations` ledger.
///
/// `amount` is set for monetary donations, `quantity` and `delivery_method`
/// for non-monetary pledges. `payment_reference` is the gateway transaction
/// id attached when a monetary donation completes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Donation {
    pub id: DbId,
    pub campaign_id: DbId,
    pub donor_id: DbId,
    pub kind_id: StatusId,
    pub status_id: StatusId,
    pub amount: Option<i64>,
    pub quantity: Option<i32>,
    pub visibility: String,
    pub message: Option<String>,
    pub delivery_method: Option<String>,
    pub delivery_deadline: Option<DateTime<Utc>>,
    pub proof_reference: Option<String>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Donation {
    pub fn kind(&self) -> Option<CampaignKind> {
        CampaignKind::from_id(self.kind_id)
    }

    pub fn status(&self) -> Option<DonationStatus> {
        DonationStatus::from_id(self.status_id)
    }
}

/// Request body for recording a donation, tagged by campaign kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreateDonation {
    Monetary {
        campaign_id: DbId,
        amount: i64,
        visibility: Option<String>,
        message: Option<String>,
    },
    NonMonetary {
        campaign_id: DbId,
        quantity: i32,
        delivery_method: String,
        delivery_deadline: Option<DateTime<Utc>>,
        proof_reference: Option<String>,
        visibility: Option<String>,
        message: Option<String>,
    },
}

impl CreateDonation {
    pub fn campaign_id(&self) -> DbId {
        match self {
            Self::Monetary { campaign_id, .. } => *campaign_id,
            Self::NonMonetary { campaign_id, .. } => *campaign_id,
        }
    }

    pub fn kind(&self) -> CampaignKind {
        match self {
            Self::Monetary { .. } => CampaignKind::Monetary,
            Self::NonMonetary { .. } => CampaignKind::NonMonetary,
        }
    }
}

/// Query parameters accepted by the donation list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonationListQuery {
    /// Donation status wire name, e.g. `pledged`.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Counted totals for a single campaign, summed over the ledger.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct CampaignTotals {
    pub raised_amount: i64,
    pub items_received: i64,
}

/// Lifetime counted totals for a single donor.
#[derive(Debug, Clone, Copy, Default, FromRow, Serialize)]
pub struct DonorTotals {
    pub total_amount: i64,
    pub total_items: i64,
}
