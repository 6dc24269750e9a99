//! Repository for the `quests` table.
//!
//! Applies the slug policy on write: a missing slug is derived from the name
//! on insert, and a rename regenerates the slug unless the same update
//! supplies one.

use questlog_core::quest::{resolve_slug_on_create, resolve_slug_on_update};
use questlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::quest::{CreateQuest, Quest, UpdateQuest};

/// Column list for `quests` queries.
const COLUMNS: &str = "\
    id, name, slug, heroic_level, epic_level, legendary_level, \
    duration_id, patron_id, adventure_pack_id, location_id, \
    base_favor, extreme_challenge, overview, objectives, tips, wiki_url, \
    created_at, updated_at";

/// Provides CRUD operations for quests.
pub struct QuestRepo;

impl QuestRepo {
    /// Insert a new quest, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateQuest) -> Result<Quest, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let quest = Self::create_in(&mut tx, input).await?;
        tx.commit().await?;
        Ok(quest)
    }

    /// Insert a new quest inside an existing transaction.
    pub async fn create_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateQuest,
    ) -> Result<Quest, sqlx::Error> {
        let slug = resolve_slug_on_create(&input.name, input.slug.as_deref());
        let query = format!(
            "INSERT INTO quests \
                 (name, slug, heroic_level, epic_level, legendary_level, \
                  duration_id, patron_id, adventure_pack_id, location_id, \
                  base_favor, extreme_challenge, overview, objectives, tips, wiki_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, \
                     COALESCE($10, 0), COALESCE($11, false), $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        let quest = sqlx::query_as::<_, Quest>(&query)
            .bind(&input.name)
            .bind(&slug)
            .bind(input.heroic_level)
            .bind(input.epic_level)
            .bind(input.legendary_level)
            .bind(input.duration_id)
            .bind(input.patron_id)
            .bind(input.adventure_pack_id)
            .bind(input.location_id)
            .bind(input.base_favor)
            .bind(input.extreme_challenge)
            .bind(&input.overview)
            .bind(&input.objectives)
            .bind(&input.tips)
            .bind(&input.wiki_url)
            .fetch_one(&mut **tx)
            .await?;

        tracing::info!(quest_id = quest.id, slug = %quest.slug, "quest created");
        Ok(quest)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = $1");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE slug = $1");
        sqlx::query_as::<_, Quest>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// All quests ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests ORDER BY id");
        sqlx::query_as::<_, Quest>(&query).fetch_all(pool).await
    }

    /// Partially update a quest.
    ///
    /// Uses `COALESCE` so only provided fields are changed. The current row
    /// is locked while the new slug is worked out. A patch that leaves the
    /// levels out of order fails on the table's check constraints; callers
    /// can report it earlier with `UpdateQuest::validate_levels_against`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuest,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(String,)> =
            sqlx::query_as("SELECT name FROM quests WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((current_name,)) = current else {
            return Ok(None);
        };

        let slug = resolve_slug_on_update(
            &current_name,
            input.name.as_deref(),
            input.slug.as_deref(),
        );

        let query = format!(
            "UPDATE quests SET \
                 name = COALESCE($2, name), \
                 slug = COALESCE($3, slug), \
                 heroic_level = COALESCE($4, heroic_level), \
                 epic_level = COALESCE($5, epic_level), \
                 legendary_level = COALESCE($6, legendary_level), \
                 duration_id = COALESCE($7, duration_id), \
                 patron_id = COALESCE($8, patron_id), \
                 adventure_pack_id = COALESCE($9, adventure_pack_id), \
                 location_id = COALESCE($10, location_id), \
                 base_favor = COALESCE($11, base_favor), \
                 extreme_challenge = COALESCE($12, extreme_challenge), \
                 overview = COALESCE($13, overview), \
                 objectives = COALESCE($14, objectives), \
                 tips = COALESCE($15, tips), \
                 wiki_url = COALESCE($16, wiki_url) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let quest = sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&slug)
            .bind(input.heroic_level)
            .bind(input.epic_level)
            .bind(input.legendary_level)
            .bind(input.duration_id)
            .bind(input.patron_id)
            .bind(input.adventure_pack_id)
            .bind(input.location_id)
            .bind(input.base_favor)
            .bind(input.extreme_challenge)
            .bind(&input.overview)
            .bind(&input.objectives)
            .bind(&input.tips)
            .bind(&input.wiki_url)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        if let Some(q) = &quest {
            tracing::debug!(quest_id = q.id, slug = %q.slug, "quest updated");
        }
        Ok(quest)
    }

    /// Delete a quest. Its XP reward rows go with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
