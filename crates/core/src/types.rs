//! Primitive type aliases shared across the engine.

/// Identifier for campaigns, donations, schools, and identity-platform
/// accounts. Maps to PostgreSQL BIGSERIAL/BIGINT.
pub type DbId = i64;

/// All deadlines and audit timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
