//! Repository for the `difficulties` table.

use questlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::difficulty::{CreateDifficulty, Difficulty};

/// Column list for `difficulties` queries. `multiplier` is `NUMERIC(3,2)`
/// and is read back as `DOUBLE PRECISION`.
const COLUMNS: &str = "\
    id, name, multiplier::DOUBLE PRECISION AS multiplier, \
    first_time_bonus_percent, sort_order, created_at, updated_at";

/// Provides data access for difficulty tiers.
pub struct DifficultyRepo;

impl DifficultyRepo {
    /// Insert a new difficulty, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDifficulty,
    ) -> Result<Difficulty, sqlx::Error> {
        let query = format!(
            "INSERT INTO difficulties (name, multiplier, first_time_bonus_percent, sort_order) \
             VALUES ($1, ROUND($2::NUMERIC, 2), $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Difficulty>(&query)
            .bind(&input.name)
            .bind(input.multiplier)
            .bind(input.first_time_bonus_percent)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Difficulty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM difficulties WHERE id = $1");
        sqlx::query_as::<_, Difficulty>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Difficulty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM difficulties WHERE name = $1");
        sqlx::query_as::<_, Difficulty>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// All difficulties in canonical display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Difficulty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM difficulties ORDER BY sort_order, id");
        sqlx::query_as::<_, Difficulty>(&query).fetch_all(pool).await
    }

    /// Delete a difficulty. Fails while reward rows reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM difficulties WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
