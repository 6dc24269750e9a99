//! Repository for the `locations` table.
//!
//! The table is self-referential through `parent_location_id`. A trigger
//! rejects any parent assignment that would close a cycle, and deleting a
//! location cascades to its descendants.

use questlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

/// Column list for `locations` queries.
const COLUMNS: &str = "id, name, area_type, parent_location_id, created_at, updated_at";

/// Provides data access for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (name, area_type, parent_location_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let location = sqlx::query_as::<_, Location>(&query)
            .bind(&input.name)
            .bind(input.area_type)
            .bind(input.parent_location_id)
            .fetch_one(pool)
            .await?;
        tracing::debug!(location_id = location.id, name = %location.name, "location created");
        Ok(location)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All locations ordered by id, which fixes the child order used by
    /// the in-memory tree.
    pub async fn list(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY id");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    /// Partially update a location.
    ///
    /// Uses `COALESCE` so only provided fields are changed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET \
                 name = COALESCE($2, name), \
                 area_type = COALESCE($3, area_type) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.area_type)
            .fetch_optional(pool)
            .await
    }

    /// Move a location under `parent_id`, or make it a root with `None`.
    ///
    /// Returns a database error if the move would create a cycle.
    pub async fn set_parent(
        pool: &PgPool,
        id: DbId,
        parent_id: Option<DbId>,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET parent_location_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(parent_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a location and, by cascade, all of its descendants. Quests
    /// located there keep existing with their location cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() > 0 {
            tracing::info!(location_id = id, "location deleted with descendants");
        }
        Ok(result.rows_affected() > 0)
    }
}
