//! Loads a full catalog snapshot for the read-side operations.

use questlog_core::catalog::{Catalog, CatalogRows};
use sqlx::PgPool;

use super::{DifficultyRepo, LocationRepo, QuestRepo, QuestXpRewardRepo, ReferenceRepo};

/// Snapshot loader over all catalog tables.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Read every catalog table and join the rows in memory.
    pub async fn load(pool: &PgPool) -> Result<Catalog, sqlx::Error> {
        let rows = CatalogRows {
            quests: QuestRepo::list(pool).await?,
            xp_rewards: QuestXpRewardRepo::list(pool).await?,
            difficulties: DifficultyRepo::list(pool).await?,
            durations: ReferenceRepo::list_durations(pool).await?,
            patrons: ReferenceRepo::list_patrons(pool).await?,
            adventure_packs: ReferenceRepo::list_adventure_packs(pool).await?,
            locations: LocationRepo::list(pool).await?,
        };

        tracing::debug!(
            quests = rows.quests.len(),
            xp_rewards = rows.xp_rewards.len(),
            locations = rows.locations.len(),
            "catalog loaded"
        );
        Ok(Catalog::assemble(rows))
    }
}
