//! Database row structs and request DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct mirroring the table columns.
//! - `Deserialize` DTOs for the write paths that create those rows.
//! - Plain filter structs consumed by the list queries.

pub mod campaign;
pub mod category;
pub mod decision;
pub mod donation;
pub mod donor;
pub mod school;

pub use campaign::{Campaign, CampaignFilter, CampaignListQuery, CreateCampaign, NewCampaign};
pub use category::Category;
pub use decision::CampaignDecision;
pub use donation::{
    CampaignTotals, CreateDonation, Donation, DonationListQuery, DonorTotals,
};
pub use donor::Donor;
pub use school::{CreateSchool, School};
