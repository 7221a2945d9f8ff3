//! Repository for the seeded campaign categories.

use sqlx::PgPool;

use crate::models::category::Category;
use fundra_core::types::DbId;

const COLUMNS: &str = "id, name, description, created_at";

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY id");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
