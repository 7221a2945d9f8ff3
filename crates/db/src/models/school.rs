use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use fundra_core::types::DbId;

/// A row from the `schools` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct School {
    pub id: DbId,
    pub name: String,
    pub contact_email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for registering a school.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSchool {
    pub name: String,
    pub contact_email: String,
    pub address: Option<String>,
}
