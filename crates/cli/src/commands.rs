//! Read-side commands. Each one runs over a loaded [`Catalog`] and returns a
//! serializable value for the binary to print.

use anyhow::{anyhow, bail, Result};
use questlog_core::catalog::Catalog;
use questlog_core::pagination::Page;
use questlog_core::projection::{LocationView, QuestDetailView, QuestView};
use questlog_core::quest::{QuestRecord, QuestType};
use questlog_core::quest_filter::QuestFilterParams;
use questlog_core::stats::{catalog_stats, CatalogStats};
use questlog_core::xp_reward::{calculate_quest_xp, XpCalculation};

/// Filtered, sorted and paginated quest listing.
pub fn quests(catalog: &Catalog, params: QuestFilterParams) -> Page<QuestView> {
    params
        .into_filter()
        .apply(&catalog.quests)
        .map(|record| QuestView::build(record, &catalog.locations))
}

/// One quest with its rewards grouped by tier.
pub fn quest(catalog: &Catalog, key: &str) -> Result<QuestDetailView> {
    find_quest(catalog, key).map(|record| QuestDetailView::build(record, &catalog.locations))
}

/// Options for [`xp`].
#[derive(Debug, Clone, Default)]
pub struct XpQuery {
    pub difficulty: String,
    pub is_epic: bool,
    pub is_legendary: bool,
    pub first_time: bool,
}

/// XP for a quest at a named difficulty. Fails when the quest has no reward
/// row for that difficulty and tier.
pub fn xp(catalog: &Catalog, key: &str, query: &XpQuery) -> Result<XpCalculation> {
    let record = find_quest(catalog, key)?;
    let difficulty = catalog
        .difficulty_by_name(&query.difficulty)
        .ok_or_else(|| anyhow!("unknown difficulty: {}", query.difficulty))?;

    let rewards = record.xp_rewards.as_loaded().map(Vec::as_slice).unwrap_or(&[]);
    match calculate_quest_xp(
        rewards,
        difficulty,
        query.is_epic,
        query.is_legendary,
        query.first_time,
    ) {
        Some(calc) => Ok(calc),
        None => bail!(
            "quest {} has no {} reward at {}",
            record.quest.slug,
            QuestType::from_flags(query.is_epic, query.is_legendary),
            difficulty.name
        ),
    }
}

/// Every location with its full path.
pub fn locations(catalog: &Catalog) -> Result<Vec<LocationView>> {
    Ok(LocationView::build_all(&catalog.locations)?)
}

pub fn stats(catalog: &Catalog) -> CatalogStats {
    catalog_stats(catalog)
}

fn find_quest<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a QuestRecord> {
    catalog
        .quest_by_id_or_slug(key)
        .ok_or_else(|| anyhow!("quest not found: {key}"))
}
