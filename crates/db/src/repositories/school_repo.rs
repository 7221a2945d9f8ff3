//! Repository for the school registry.

use sqlx::PgPool;

use crate::models::school::{CreateSchool, School};
use crate::repositories::clamp_page;
use fundra_core::types::DbId;

const COLUMNS: &str = "id, name, contact_email, address, created_at, updated_at";

pub struct SchoolRepo;

impl SchoolRepo {
    pub async fn create(pool: &PgPool, input: &CreateSchool) -> Result<School, sqlx::Error> {
        let query = format!(
            "INSERT INTO schools (name, contact_email, address)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, School>(&query)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<School>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM schools WHERE id = $1");
        sqlx::query_as::<_, School>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<School>, sqlx::Error> {
        let (limit, offset) = clamp_page(limit, offset);
        let query = format!("SELECT {COLUMNS} FROM schools ORDER BY name LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, School>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
