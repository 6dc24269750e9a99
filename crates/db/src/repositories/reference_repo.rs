//! Read-only access to the `durations`, `patrons` and `adventure_packs`
//! reference tables.

use questlog_core::reference::{AdventurePack, Duration, Patron};
use sqlx::PgPool;

const DURATION_COLUMNS: &str = "id, name, estimated_minutes, created_at, updated_at";
const PATRON_COLUMNS: &str = "id, name, description, created_at, updated_at";
const PACK_COLUMNS: &str = "id, name, purchase_type, release_date, created_at, updated_at";

/// Lookups for quest reference data.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Durations from shortest to longest; unestimated ones last.
    pub async fn list_durations(pool: &PgPool) -> Result<Vec<Duration>, sqlx::Error> {
        let query = format!(
            "SELECT {DURATION_COLUMNS} FROM durations ORDER BY estimated_minutes NULLS LAST, id"
        );
        sqlx::query_as::<_, Duration>(&query).fetch_all(pool).await
    }

    pub async fn list_patrons(pool: &PgPool) -> Result<Vec<Patron>, sqlx::Error> {
        let query = format!("SELECT {PATRON_COLUMNS} FROM patrons ORDER BY name");
        sqlx::query_as::<_, Patron>(&query).fetch_all(pool).await
    }

    pub async fn list_adventure_packs(pool: &PgPool) -> Result<Vec<AdventurePack>, sqlx::Error> {
        let query = format!("SELECT {PACK_COLUMNS} FROM adventure_packs ORDER BY name");
        sqlx::query_as::<_, AdventurePack>(&query).fetch_all(pool).await
    }
}
