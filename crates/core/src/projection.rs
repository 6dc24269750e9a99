//! Serializable views over loaded records.
//!
//! Relations that were not loaded are omitted from the output; relations
//! that were loaded but are empty serialize as `null`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::difficulty::Difficulty;
use crate::error::CoreError;
use crate::location::{AreaType, Location, LocationTree};
use crate::quest::{QuestRecord, QuestType};
use crate::reference::{AdventurePack, Duration, Patron, PurchaseType};
use crate::relation::Loaded;
use crate::types::{DbId, Timestamp};
use crate::xp_reward::{group_xp_rewards, GroupedXpRewards, XpRewardRecord};

// ---------------------------------------------------------------------------
// Reference views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationView {
    pub id: DbId,
    pub name: String,
    pub estimated_minutes: Option<i32>,
    pub display_name: String,
}

impl From<&Duration> for DurationView {
    fn from(d: &Duration) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            estimated_minutes: d.estimated_minutes,
            display_name: d.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatronView {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Patron> for PatronView {
    fn from(p: &Patron) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            description: p.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdventurePackView {
    pub id: DbId,
    pub name: String,
    pub purchase_type: PurchaseType,
    pub release_date: Option<NaiveDate>,
    pub is_free_to_play: bool,
}

impl From<&AdventurePack> for AdventurePackView {
    fn from(p: &AdventurePack) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            purchase_type: p.purchase_type,
            release_date: p.release_date,
            is_free_to_play: p.is_free_to_play(),
        }
    }
}

/// Location as embedded in a quest. `full_path` is only filled in when the
/// view is built against a [`LocationTree`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub id: DbId,
    pub name: String,
    pub area_type: AreaType,
    pub parent_location_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
}

impl From<&Location> for LocationSummary {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
            area_type: l.area_type,
            parent_location_id: l.parent_location_id,
            full_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyView {
    pub id: DbId,
    pub name: String,
    pub multiplier: f64,
    pub first_time_bonus_percent: Option<i32>,
    pub sort_order: i32,
    pub display_name: String,
}

impl From<&Difficulty> for DifficultyView {
    fn from(d: &Difficulty) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            multiplier: d.multiplier,
            first_time_bonus_percent: d.first_time_bonus_percent,
            sort_order: d.sort_order,
            display_name: d.display_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Location view
// ---------------------------------------------------------------------------

/// Standalone location with its rendered ancestor path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub id: DbId,
    pub name: String,
    pub area_type: AreaType,
    pub parent_location_id: Option<DbId>,
    pub is_root: bool,
    pub full_path: String,
}

impl LocationView {
    pub fn build(tree: &LocationTree, location: &Location) -> Result<Self, CoreError> {
        Ok(Self {
            id: location.id,
            name: location.name.clone(),
            area_type: location.area_type,
            parent_location_id: location.parent_location_id,
            is_root: location.is_root(),
            full_path: tree.full_path(location.id)?,
        })
    }

    /// Every location in the tree, in load order.
    pub fn build_all(tree: &LocationTree) -> Result<Vec<Self>, CoreError> {
        tree.iter().map(|loc| Self::build(tree, loc)).collect()
    }
}

// ---------------------------------------------------------------------------
// XP reward view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpRewardView {
    pub id: DbId,
    pub difficulty_id: DbId,
    #[serde(skip_serializing_if = "Loaded::is_not_loaded")]
    pub difficulty: Loaded<DifficultyView>,
    pub quest_type: QuestType,
    pub is_epic: bool,
    pub is_legendary: bool,
    pub base_xp: i32,
    pub calculated_xp: Option<i64>,
    pub xp_with_first_time_bonus: Option<i64>,
    pub description: Option<String>,
}

impl From<&XpRewardRecord> for XpRewardView {
    fn from(r: &XpRewardRecord) -> Self {
        Self {
            id: r.reward.id,
            difficulty_id: r.reward.difficulty_id,
            difficulty: r.difficulty.as_ref().map(DifficultyView::from),
            quest_type: r.quest_type(),
            is_epic: r.reward.is_epic,
            is_legendary: r.reward.is_legendary,
            base_xp: r.reward.base_xp,
            calculated_xp: r.calculated_xp(),
            xp_with_first_time_bonus: r.xp_with_first_time_bonus(),
            description: r.description(),
        }
    }
}

// ---------------------------------------------------------------------------
// Quest view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelsView {
    pub heroic: Option<i32>,
    pub epic: Option<i32>,
    pub legendary: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentView {
    pub overview: Option<String>,
    pub objectives: Option<String>,
    pub tips: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataView {
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestView {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub levels: LevelsView,
    pub primary_level: Option<i32>,
    pub quest_type: QuestType,
    pub is_free_to_play: bool,
    #[serde(skip_serializing_if = "Loaded::is_not_loaded")]
    pub duration: Loaded<Option<DurationView>>,
    #[serde(skip_serializing_if = "Loaded::is_not_loaded")]
    pub patron: Loaded<Option<PatronView>>,
    #[serde(skip_serializing_if = "Loaded::is_not_loaded")]
    pub adventure_pack: Loaded<Option<AdventurePackView>>,
    #[serde(skip_serializing_if = "Loaded::is_not_loaded")]
    pub location: Loaded<Option<LocationSummary>>,
    pub base_favor: i32,
    pub extreme_challenge: bool,
    pub content: ContentView,
    pub wiki_url: Option<String>,
    #[serde(skip_serializing_if = "Loaded::is_not_loaded")]
    pub xp_rewards: Loaded<Vec<XpRewardView>>,
    pub metadata: MetadataView,
}

fn view_of<'a, T: 'a, V: From<&'a T>>(related: &'a Loaded<Option<T>>) -> Loaded<Option<V>> {
    related.as_ref().map(|opt| opt.as_ref().map(V::from))
}

impl QuestView {
    /// Project `record`, rendering its location's path from `locations`.
    pub fn build(record: &QuestRecord, locations: &LocationTree) -> Self {
        let mut view = Self::from(record);
        if let Loaded::Loaded(Some(location)) = &mut view.location {
            location.full_path = locations.full_path(location.id).ok();
        }
        view
    }
}

impl From<&QuestRecord> for QuestView {
    fn from(record: &QuestRecord) -> Self {
        let q = &record.quest;
        Self {
            id: q.id,
            name: q.name.clone(),
            slug: q.slug.clone(),
            levels: LevelsView {
                heroic: q.heroic_level,
                epic: q.epic_level,
                legendary: q.legendary_level,
            },
            primary_level: q.primary_level(),
            quest_type: q.quest_type(),
            is_free_to_play: record.is_free_to_play(),
            duration: view_of(&record.duration),
            patron: view_of(&record.patron),
            adventure_pack: view_of(&record.adventure_pack),
            location: view_of(&record.location),
            base_favor: q.base_favor,
            extreme_challenge: q.extreme_challenge,
            content: ContentView {
                overview: q.overview.clone(),
                objectives: q.objectives.clone(),
                tips: q.tips.clone(),
            },
            wiki_url: q.wiki_url.clone(),
            xp_rewards: record
                .xp_rewards
                .as_ref()
                .map(|rewards| rewards.iter().map(XpRewardView::from).collect()),
            metadata: MetadataView {
                created_at: q.created_at,
                updated_at: q.updated_at,
            },
        }
    }
}

/// Quest detail: the quest view plus its rewards grouped by tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestDetailView {
    #[serde(flatten)]
    pub quest: QuestView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_xp_rewards: Option<GroupedXpRewards<XpRewardView>>,
}

impl QuestDetailView {
    pub fn build(record: &QuestRecord, locations: &LocationTree) -> Self {
        Self {
            quest: QuestView::build(record, locations),
            ..Self::from(record)
        }
    }
}

impl From<&QuestRecord> for QuestDetailView {
    fn from(record: &QuestRecord) -> Self {
        Self {
            quest: QuestView::from(record),
            grouped_xp_rewards: record
                .xp_rewards
                .as_loaded()
                .map(|rewards| group_xp_rewards(rewards).map(XpRewardView::from)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::quest::Quest;
    use crate::xp_reward::QuestXpReward;

    fn record() -> QuestRecord {
        QuestRecord::new(Quest {
            id: 5,
            name: "The Pit".to_string(),
            slug: "the-pit".to_string(),
            heroic_level: Some(5),
            epic_level: Some(22),
            base_favor: 6,
            ..Quest::default()
        })
    }

    fn elite() -> Difficulty {
        Difficulty {
            id: 4,
            name: "Elite".to_string(),
            multiplier: 1.5,
            first_time_bonus_percent: Some(45),
            sort_order: 4,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn reward(id: DbId, is_epic: bool, base_xp: i32) -> XpRewardRecord {
        XpRewardRecord::new(
            QuestXpReward {
                id,
                quest_id: 5,
                difficulty_id: 4,
                is_epic,
                is_legendary: false,
                base_xp,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            },
            Some(elite()),
        )
    }

    #[test]
    fn unloaded_relations_are_omitted() {
        let json = serde_json::to_value(QuestView::from(&record())).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["duration", "patron", "adventure_pack", "location", "xp_rewards"] {
            assert!(!obj.contains_key(key), "{key} should be omitted");
        }
        assert_eq!(json["quest_type"], "Epic");
        assert_eq!(json["primary_level"], 5);
        assert_eq!(json["levels"], json!({ "heroic": 5, "epic": 22, "legendary": null }));
        assert_eq!(json["is_free_to_play"], false);
    }

    #[test]
    fn loaded_empty_relation_is_null() {
        let mut r = record();
        r.patron = Loaded::Loaded(None);
        let json = serde_json::to_value(QuestView::from(&r)).unwrap();
        assert_eq!(json["patron"], serde_json::Value::Null);
        assert!(json.as_object().unwrap().contains_key("patron"));
    }

    #[test]
    fn free_pack_is_projected() {
        let mut r = record();
        r.adventure_pack = Loaded::Loaded(Some(AdventurePack {
            id: 1,
            name: "Korthos".to_string(),
            purchase_type: PurchaseType::FreeToPlay,
            release_date: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }));
        let json = serde_json::to_value(QuestView::from(&r)).unwrap();
        assert_eq!(json["is_free_to_play"], true);
        assert_eq!(json["adventure_pack"]["purchase_type"], "Free to Play");
    }

    #[test]
    fn xp_reward_view_computes_values() {
        let view = XpRewardView::from(&reward(1, true, 2000));
        assert_eq!(view.quest_type, QuestType::Epic);
        assert_eq!(view.calculated_xp, Some(3000));
        assert_eq!(view.xp_with_first_time_bonus, Some(4350));
        assert_eq!(view.description.as_deref(), Some("Epic Elite: 3,000 XP"));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["difficulty"]["display_name"], "Elite (1.50x)");
    }

    #[test]
    fn detail_groups_rewards() {
        let mut r = record();
        r.xp_rewards = Loaded::Loaded(vec![reward(1, false, 500), reward(2, true, 2000)]);
        let detail = QuestDetailView::from(&r);
        let grouped = detail.grouped_xp_rewards.unwrap();
        assert_eq!(grouped.heroic.len(), 1);
        assert_eq!(grouped.epic[0].id, 2);
        assert!(grouped.legendary.is_empty());
    }

    fn harbor_tree() -> LocationTree {
        let now = chrono::Utc::now();
        LocationTree::new(vec![
            Location {
                id: 1,
                name: "Stormreach".to_string(),
                area_type: AreaType::City,
                parent_location_id: None,
                created_at: now,
                updated_at: now,
            },
            Location {
                id: 2,
                name: "The Harbor".to_string(),
                area_type: AreaType::City,
                parent_location_id: Some(1),
                created_at: now,
                updated_at: now,
            },
        ])
    }

    #[test]
    fn location_view_renders_path() {
        let views = LocationView::build_all(&harbor_tree()).unwrap();
        assert!(views[0].is_root);
        assert_eq!(views[1].full_path, "Stormreach > The Harbor");
        assert!(!views[1].is_root);
    }

    #[test]
    fn quest_location_carries_full_path() {
        let tree = harbor_tree();
        let mut r = record();
        r.quest.location_id = Some(2);
        r.location = Loaded::Loaded(tree.get(2).cloned());
        r.xp_rewards = Loaded::Loaded(vec![reward(1, false, 500)]);

        let json = serde_json::to_value(QuestView::build(&r, &tree)).unwrap();
        assert_eq!(json["location"]["full_path"], "Stormreach > The Harbor");

        let detail = QuestDetailView::build(&r, &tree);
        assert_eq!(
            detail.quest.location.present().and_then(|l| l.full_path.as_deref()),
            Some("Stormreach > The Harbor")
        );
        assert_eq!(detail.grouped_xp_rewards.map(|g| g.heroic.len()), Some(1));

        // Without a tree the path is left out.
        let json = serde_json::to_value(QuestView::from(&r)).unwrap();
        assert!(json["location"].get("full_path").is_none());
    }
}
