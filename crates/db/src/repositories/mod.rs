//! Query code, one repository per aggregate.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&PgPool` as their first argument. Status-changing updates are
//! compare-and-swap: the expected current state is part of the `WHERE`
//! clause and the caller learns from `rows_affected` whether it won.

pub mod campaign_repo;
pub mod category_repo;
pub mod decision_repo;
pub mod donation_repo;
pub mod donor_repo;
pub mod school_repo;

pub use campaign_repo::CampaignRepo;
pub use category_repo::CategoryRepo;
pub use decision_repo::DecisionRepo;
pub use donation_repo::DonationRepo;
pub use donor_repo::DonorRepo;
pub use school_repo::SchoolRepo;

/// Hard cap applied to list queries.
pub(crate) const MAX_LIMIT: i64 = 100;

/// Page size when the caller does not ask for one.
pub(crate) const DEFAULT_LIMIT: i64 = 50;

pub(crate) fn clamp_page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}
