//! Repository for the `quest_xp_rewards` table.
//!
//! Rows are unique per (quest, difficulty, is_epic, is_legendary) and are
//! removed together with their quest.

use questlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::xp_reward::{CreateQuestXpReward, QuestXpReward};

/// Column list for `quest_xp_rewards` queries.
const COLUMNS: &str = "\
    id, quest_id, difficulty_id, is_epic, is_legendary, base_xp, created_at, updated_at";

/// Provides data access for quest XP rewards.
pub struct QuestXpRewardRepo;

impl QuestXpRewardRepo {
    /// Insert a reward row. Fails on a duplicate (difficulty, tier) for the
    /// same quest.
    pub async fn create(
        pool: &PgPool,
        input: &CreateQuestXpReward,
    ) -> Result<QuestXpReward, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let reward = Self::create_in(&mut tx, input).await?;
        tx.commit().await?;
        Ok(reward)
    }

    /// Insert a reward row inside an existing transaction.
    pub async fn create_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateQuestXpReward,
    ) -> Result<QuestXpReward, sqlx::Error> {
        let query = format!(
            "INSERT INTO quest_xp_rewards \
                 (quest_id, difficulty_id, is_epic, is_legendary, base_xp) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestXpReward>(&query)
            .bind(input.quest_id)
            .bind(input.difficulty_id)
            .bind(input.is_epic)
            .bind(input.is_legendary)
            .bind(input.base_xp)
            .fetch_one(&mut **tx)
            .await
    }

    /// Single-row lookup by the uniqueness key.
    pub async fn find_for(
        pool: &PgPool,
        quest_id: DbId,
        difficulty_id: DbId,
        is_epic: bool,
        is_legendary: bool,
    ) -> Result<Option<QuestXpReward>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quest_xp_rewards \
             WHERE quest_id = $1 AND difficulty_id = $2 AND is_epic = $3 AND is_legendary = $4"
        );
        sqlx::query_as::<_, QuestXpReward>(&query)
            .bind(quest_id)
            .bind(difficulty_id)
            .bind(is_epic)
            .bind(is_legendary)
            .fetch_optional(pool)
            .await
    }

    /// Rewards for one quest in insertion order.
    pub async fn list_by_quest(
        pool: &PgPool,
        quest_id: DbId,
    ) -> Result<Vec<QuestXpReward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quest_xp_rewards WHERE quest_id = $1 ORDER BY id");
        sqlx::query_as::<_, QuestXpReward>(&query)
            .bind(quest_id)
            .fetch_all(pool)
            .await
    }

    /// Every reward row, ordered by quest then insertion.
    pub async fn list(pool: &PgPool) -> Result<Vec<QuestXpReward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quest_xp_rewards ORDER BY quest_id, id");
        sqlx::query_as::<_, QuestXpReward>(&query).fetch_all(pool).await
    }

    /// Change the stored base XP for a reward row.
    pub async fn update_base_xp(
        pool: &PgPool,
        id: DbId,
        base_xp: i32,
    ) -> Result<Option<QuestXpReward>, sqlx::Error> {
        let query = format!(
            "UPDATE quest_xp_rewards SET base_xp = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestXpReward>(&query)
            .bind(id)
            .bind(base_xp)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quest_xp_rewards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
