//! Donation ledger domain: the two status state machines, the counted
//! mapping, and recording validation.
//!
//! Two independent machines share one ledger and one status lookup:
//!
//! ```text
//!   monetary:     pending ──> completed | failed
//!   non-monetary: pledged ──> received  | cancelled
//! ```
//!
//! There is no transition out of a terminal status. A donation is counted
//! toward campaign progress and donor totals iff it sits in the
//! terminal-success status of its machine (`completed` / `received`); this
//! mapping lives here and nowhere else.

use crate::campaign::CampaignKind;
use crate::error::CoreError;
use crate::status::define_status_enum;

define_status_enum! {
    /// Donation status across both machines. Discriminants match the
    /// `donation_statuses` seed data: ids 1-3 belong to the monetary
    /// machine, 4-6 to the non-monetary (pledge) machine.
    DonationStatus {
        Pending = 1 => "pending",
        Completed = 2 => "completed",
        Failed = 3 => "failed",
        Pledged = 4 => "pledged",
        Received = 5 => "received",
        Cancelled = 6 => "cancelled",
    }
}

impl DonationStatus {
    /// Which machine (and therefore which donation kind) a status belongs to.
    pub fn kind(self) -> CampaignKind {
        match self {
            DonationStatus::Pending | DonationStatus::Completed | DonationStatus::Failed => {
                CampaignKind::Monetary
            }
            DonationStatus::Pledged | DonationStatus::Received | DonationStatus::Cancelled => {
                CampaignKind::NonMonetary
            }
        }
    }

    /// The status a newly recorded donation starts in.
    pub fn initial_for(kind: CampaignKind) -> DonationStatus {
        match kind {
            CampaignKind::Monetary => DonationStatus::Pending,
            CampaignKind::NonMonetary => DonationStatus::Pledged,
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        match self {
            DonationStatus::Pending | DonationStatus::Pledged => false,
            DonationStatus::Completed
            | DonationStatus::Failed
            | DonationStatus::Received
            | DonationStatus::Cancelled => true,
        }
    }

    /// The single counted/not-counted rule: only the terminal-success
    /// status of each machine contributes to aggregates.
    pub fn is_counted(self) -> bool {
        matches!(self, DonationStatus::Completed | DonationStatus::Received)
    }

    /// Legal successors. Exhaustive on purpose so a new status cannot
    /// silently bypass the machines.
    pub fn can_transition_to(self, next: DonationStatus) -> bool {
        match self {
            DonationStatus::Pending => {
                matches!(next, DonationStatus::Completed | DonationStatus::Failed)
            }
            DonationStatus::Pledged => {
                matches!(next, DonationStatus::Received | DonationStatus::Cancelled)
            }
            DonationStatus::Completed
            | DonationStatus::Failed
            | DonationStatus::Received
            | DonationStatus::Cancelled => false,
        }
    }
}

/// What a requested transition should do to the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The move is legal; apply it with a conditional update.
    Apply,
    /// The donation is already in the requested terminal status. External
    /// confirmations are delivered at least once, so this is a silent
    /// no-op, not an error.
    AlreadyApplied,
}

/// Validate a requested status change against the current status.
pub fn validate_transition(
    current: DonationStatus,
    next: DonationStatus,
) -> Result<TransitionOutcome, CoreError> {
    if current == next && current.is_terminal() {
        return Ok(TransitionOutcome::AlreadyApplied);
    }
    if current.can_transition_to(next) {
        return Ok(TransitionOutcome::Apply);
    }
    Err(CoreError::InvalidTransition(format!(
        "donation cannot move from {current} to {next}"
    )))
}

/// Donation visibility values stored on the ledger row.
pub mod visibility {
    pub const PUBLIC: &str = "public";
    pub const ANONYMOUS: &str = "anonymous";

    pub const VALID_VISIBILITIES: &[&str] = &[PUBLIC, ANONYMOUS];

    pub fn is_valid(value: &str) -> bool {
        VALID_VISIBILITIES.contains(&value)
    }
}

/// Delivery methods accepted for non-monetary pledges.
pub mod delivery_methods {
    pub const DROP_OFF: &str = "drop_off";
    pub const PICKUP: &str = "pickup";
    pub const COURIER: &str = "courier";

    pub const VALID_DELIVERY_METHODS: &[&str] = &[DROP_OFF, PICKUP, COURIER];

    pub fn is_valid(value: &str) -> bool {
        VALID_DELIVERY_METHODS.contains(&value)
    }
}

/// Maximum donor message length.
pub const MESSAGE_MAX_LEN: usize = 500;

/// Maximum length of an opaque proof-of-item storage reference.
pub const PROOF_REFERENCE_MAX_LEN: usize = 255;

/// Validate fields common to both donation kinds.
pub fn validate_common(visibility_value: &str, message: Option<&str>) -> Result<(), CoreError> {
    if !visibility::is_valid(visibility_value) {
        return Err(CoreError::Validation(format!(
            "visibility must be one of: {}",
            visibility::VALID_VISIBILITIES.join(", ")
        )));
    }
    if let Some(msg) = message {
        if msg.len() > MESSAGE_MAX_LEN {
            return Err(CoreError::Validation(format!(
                "message must be at most {MESSAGE_MAX_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Validate the monetary-specific fields of a new donation.
pub fn validate_monetary(amount: i64) -> Result<(), CoreError> {
    if amount <= 0 {
        return Err(CoreError::Validation("amount must be positive".into()));
    }
    Ok(())
}

/// Validate the non-monetary-specific fields of a new donation.
pub fn validate_non_monetary(
    quantity: i32,
    delivery_method: &str,
    proof_reference: Option<&str>,
) -> Result<(), CoreError> {
    if quantity < 1 {
        return Err(CoreError::Validation(
            "quantity must be at least 1".into(),
        ));
    }
    if !delivery_methods::is_valid(delivery_method) {
        return Err(CoreError::Validation(format!(
            "delivery_method must be one of: {}",
            delivery_methods::VALID_DELIVERY_METHODS.join(", ")
        )));
    }
    if let Some(proof) = proof_reference {
        if proof.len() > PROOF_REFERENCE_MAX_LEN {
            return Err(CoreError::Validation(format!(
                "proof_reference must be at most {PROOF_REFERENCE_MAX_LEN} characters"
            )));
        }
    }
    Ok(())
}
