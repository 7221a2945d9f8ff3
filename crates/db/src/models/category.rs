use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use fundra_core::types::DbId;

/// A row from the `categories` lookup table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
