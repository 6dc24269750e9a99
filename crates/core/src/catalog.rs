//! In-memory catalog snapshot.
//!
//! The persistence layer loads every table once and hands the rows to
//! [`Catalog::assemble`], which joins quests with their relations and XP
//! rewards with their difficulties. All read-side operations then run over
//! this immutable snapshot.

use std::collections::HashMap;

use crate::difficulty::{self, Difficulty};
use crate::location::{Location, LocationTree};
use crate::quest::{Quest, QuestRecord};
use crate::reference::{AdventurePack, Duration, Patron};
use crate::relation::Loaded;
use crate::types::DbId;
use crate::xp_reward::{QuestXpReward, XpRewardRecord};

/// Raw rows as loaded from storage.
#[derive(Debug, Clone, Default)]
pub struct CatalogRows {
    pub quests: Vec<Quest>,
    pub xp_rewards: Vec<QuestXpReward>,
    pub difficulties: Vec<Difficulty>,
    pub durations: Vec<Duration>,
    pub patrons: Vec<Patron>,
    pub adventure_packs: Vec<AdventurePack>,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub quests: Vec<QuestRecord>,
    pub difficulties: Vec<Difficulty>,
    pub durations: Vec<Duration>,
    pub patrons: Vec<Patron>,
    pub adventure_packs: Vec<AdventurePack>,
    pub locations: LocationTree,
}

fn index_by_id<T: Clone>(rows: &[T], id_of: impl Fn(&T) -> DbId) -> HashMap<DbId, T> {
    rows.iter().map(|row| (id_of(row), row.clone())).collect()
}

/// Resolve a nullable foreign key. A dangling key resolves to `None`.
fn lookup<T: Clone>(index: &HashMap<DbId, T>, id: Option<DbId>) -> Loaded<Option<T>> {
    Loaded::Loaded(id.and_then(|id| index.get(&id).cloned()))
}

impl Catalog {
    /// Join raw rows into fully loaded quest records.
    ///
    /// Quest order and per-quest reward order follow the input rows.
    pub fn assemble(rows: CatalogRows) -> Self {
        let durations = index_by_id(&rows.durations, |d| d.id);
        let patrons = index_by_id(&rows.patrons, |p| p.id);
        let packs = index_by_id(&rows.adventure_packs, |p| p.id);
        let locations = index_by_id(&rows.locations, |l| l.id);
        let difficulties = index_by_id(&rows.difficulties, |d| d.id);

        let mut rewards_by_quest: HashMap<DbId, Vec<XpRewardRecord>> = HashMap::new();
        for reward in rows.xp_rewards {
            let difficulty = difficulties.get(&reward.difficulty_id).cloned();
            rewards_by_quest
                .entry(reward.quest_id)
                .or_default()
                .push(XpRewardRecord::new(reward, difficulty));
        }

        let quests = rows
            .quests
            .into_iter()
            .map(|quest| {
                let xp_rewards = rewards_by_quest.remove(&quest.id).unwrap_or_default();
                QuestRecord {
                    duration: lookup(&durations, quest.duration_id),
                    patron: lookup(&patrons, quest.patron_id),
                    adventure_pack: lookup(&packs, quest.adventure_pack_id),
                    location: lookup(&locations, quest.location_id),
                    xp_rewards: Loaded::Loaded(xp_rewards),
                    quest,
                }
            })
            .collect();

        Self {
            quests,
            difficulties: rows.difficulties,
            durations: rows.durations,
            patrons: rows.patrons,
            adventure_packs: rows.adventure_packs,
            locations: LocationTree::new(rows.locations),
        }
    }

    pub fn quest(&self, id: DbId) -> Option<&QuestRecord> {
        self.quests.iter().find(|r| r.quest.id == id)
    }

    pub fn quest_by_slug(&self, slug: &str) -> Option<&QuestRecord> {
        self.quests.iter().find(|r| r.quest.slug == slug)
    }

    /// Look a quest up by numeric id, falling back to slug.
    pub fn quest_by_id_or_slug(&self, key: &str) -> Option<&QuestRecord> {
        key.parse::<DbId>()
            .ok()
            .and_then(|id| self.quest(id))
            .or_else(|| self.quest_by_slug(key))
    }

    pub fn difficulty_by_name(&self, name: &str) -> Option<&Difficulty> {
        difficulty::find_by_name(&self.difficulties, name)
    }

    /// Sum of `base_favor` over the patron's quests.
    pub fn patron_total_favor(&self, patron_id: DbId) -> i64 {
        self.quests
            .iter()
            .filter(|r| r.quest.patron_id == Some(patron_id))
            .map(|r| i64::from(r.quest.base_favor))
            .sum()
    }
}
