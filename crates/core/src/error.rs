use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// Every state-changing operation validates fully before mutating and fails
/// with one of these variants; the API layer maps them onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced campaign/donation/donor/school does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Bad input shape or value (non-positive amount, past deadline, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request conflicts with existing state (duplicate name, deletion
    /// of a campaign with counted donations).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested status change is not reachable from the current status.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// A donation was attempted against a campaign that is not open:
    /// not yet approved, rejected, past its deadline, or fully funded.
    #[error("Campaign closed: {0}")]
    CampaignClosed(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The actor lacks the role required for the requested operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
