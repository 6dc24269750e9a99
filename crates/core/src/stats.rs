//! Catalog statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::quest::Quest;
use crate::reference::AdventurePack;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogOverview {
    pub total_quests: usize,
    pub total_patrons: usize,
    pub total_adventure_packs: usize,
    pub total_locations: usize,
    pub free_to_play_quests: usize,
    pub premium_quests: usize,
    pub extreme_challenge_quests: usize,
}

/// Headline counts. Free-to-play and premium use the same pack predicates
/// as quest filtering, so quests without a pack count as neither.
pub fn overview(catalog: &Catalog) -> CatalogOverview {
    let count_packs = |pred: fn(&AdventurePack) -> bool| {
        catalog
            .quests
            .iter()
            .filter(|r| r.adventure_pack.present().is_some_and(pred))
            .count()
    };

    CatalogOverview {
        total_quests: catalog.quests.len(),
        total_patrons: catalog.patrons.len(),
        total_adventure_packs: catalog.adventure_packs.len(),
        total_locations: catalog.locations.len(),
        free_to_play_quests: count_packs(AdventurePack::is_free_to_play),
        premium_quests: count_packs(AdventurePack::is_premium),
        extreme_challenge_quests: catalog
            .quests
            .iter()
            .filter(|r| r.quest.extreme_challenge)
            .count(),
    }
}

/// A single `(level, quest count)` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelDistribution {
    pub heroic: Vec<LevelCount>,
    pub epic: Vec<LevelCount>,
    pub legendary: Vec<LevelCount>,
}

fn distribution(catalog: &Catalog, level_of: fn(&Quest) -> Option<i32>) -> Vec<LevelCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for level in catalog.quests.iter().filter_map(|r| level_of(&r.quest)) {
        *counts.entry(level).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(level, count)| LevelCount { level, count })
        .collect()
}

/// Quest counts per level for each tier, ascending by level.
pub fn level_distribution(catalog: &Catalog) -> LevelDistribution {
    LevelDistribution {
        heroic: distribution(catalog, |q| q.heroic_level),
        epic: distribution(catalog, |q| q.epic_level),
        legendary: distribution(catalog, |q| q.legendary_level),
    }
}

/// Both statistics blocks together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub overview: CatalogOverview,
    pub level_distribution: LevelDistribution,
}

pub fn catalog_stats(catalog: &Catalog) -> CatalogStats {
    CatalogStats {
        overview: overview(catalog),
        level_distribution: level_distribution(catalog),
    }
}
