//! JSON quest import.
//!
//! The input is an array of quests. Each entry carries the quest fields plus
//! an optional `xp_rewards` list whose rows name their difficulty:
//!
//! ```json
//! [
//!   {
//!     "name": "The Pit",
//!     "heroic_level": 5,
//!     "xp_rewards": [{ "difficulty": "Elite", "base_xp": 1200 }]
//!   }
//! ]
//! ```
//!
//! Every entry is validated and every difficulty resolved before anything
//! is written. The whole file is then inserted in a single transaction.

use std::collections::HashSet;

use anyhow::{anyhow, bail, Context, Result};
use questlog_core::difficulty::{self, Difficulty};
use questlog_core::types::DbId;
use questlog_db::models::quest::CreateQuest;
use questlog_db::models::xp_reward::CreateQuestXpReward;
use questlog_db::repositories::{DifficultyRepo, QuestRepo, QuestXpRewardRepo};
use questlog_db::DbPool;
use serde::{Deserialize, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ImportQuest {
    #[serde(flatten)]
    pub quest: CreateQuest,
    #[serde(default)]
    pub xp_rewards: Vec<ImportReward>,
}

/// A reward row keyed by difficulty name.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImportReward {
    #[validate(length(min = 1))]
    pub difficulty: String,
    #[serde(default)]
    pub is_epic: bool,
    #[serde(default)]
    pub is_legendary: bool,
    #[validate(range(min = 0))]
    pub base_xp: i32,
}

pub fn parse(json: &str) -> Result<Vec<ImportQuest>> {
    serde_json::from_str(json).context("import file is not a JSON array of quests")
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// A validated reward with its difficulty resolved to an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReward {
    pub difficulty_id: DbId,
    pub is_epic: bool,
    pub is_legendary: bool,
    pub base_xp: i32,
}

#[derive(Debug, Clone)]
pub struct PlannedQuest {
    pub quest: CreateQuest,
    pub rewards: Vec<PlannedReward>,
}

/// Validate every entry and resolve difficulty names.
///
/// Fails on the first bad entry, naming its position and quest name.
pub fn plan(entries: Vec<ImportQuest>, difficulties: &[Difficulty]) -> Result<Vec<PlannedQuest>> {
    let mut names = HashSet::new();
    let mut planned = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let label = format!("quest #{} ({})", index + 1, entry.quest.name);

        entry
            .quest
            .validate()
            .with_context(|| format!("{label} is invalid"))?;
        if !names.insert(entry.quest.name.clone()) {
            bail!("{label} appears more than once in the file");
        }

        let mut keys = HashSet::new();
        let mut rewards = Vec::with_capacity(entry.xp_rewards.len());
        for reward in &entry.xp_rewards {
            reward
                .validate()
                .with_context(|| format!("{label} has an invalid reward"))?;
            if reward.is_epic && reward.is_legendary {
                bail!("{label} has a reward marked both epic and legendary");
            }
            let difficulty = difficulty::find_by_name(difficulties, &reward.difficulty)
                .ok_or_else(|| anyhow!("{label} references unknown difficulty {}", reward.difficulty))?;
            if !keys.insert((difficulty.id, reward.is_epic, reward.is_legendary)) {
                bail!("{label} lists the {} reward twice", difficulty.name);
            }
            rewards.push(PlannedReward {
                difficulty_id: difficulty.id,
                is_epic: reward.is_epic,
                is_legendary: reward.is_legendary,
                base_xp: reward.base_xp,
            });
        }

        planned.push(PlannedQuest {
            quest: entry.quest,
            rewards,
        });
    }

    Ok(planned)
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub quests: usize,
    pub xp_rewards: usize,
}

/// Plan and insert all entries in one transaction.
pub async fn run(pool: &DbPool, entries: Vec<ImportQuest>) -> Result<ImportSummary> {
    let difficulties = DifficultyRepo::list(pool).await?;
    let planned = plan(entries, &difficulties)?;

    let mut summary = ImportSummary {
        quests: 0,
        xp_rewards: 0,
    };
    let mut tx = pool.begin().await?;

    for item in &planned {
        let quest = QuestRepo::create_in(&mut tx, &item.quest)
            .await
            .with_context(|| format!("failed to insert quest {}", item.quest.name))?;
        summary.quests += 1;

        for reward in &item.rewards {
            let input = CreateQuestXpReward {
                quest_id: quest.id,
                difficulty_id: reward.difficulty_id,
                is_epic: reward.is_epic,
                is_legendary: reward.is_legendary,
                base_xp: reward.base_xp,
            };
            QuestXpRewardRepo::create_in(&mut tx, &input)
                .await
                .with_context(|| format!("failed to insert reward for quest {}", quest.slug))?;
            summary.xp_rewards += 1;
        }
    }

    tx.commit().await?;
    tracing::info!(
        quests = summary.quests,
        xp_rewards = summary.xp_rewards,
        "import committed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use questlog_core::types::Timestamp;

    fn difficulties() -> Vec<Difficulty> {
        ["Normal", "Elite"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| Difficulty {
                id: i as DbId + 1,
                name: name.to_string(),
                multiplier: 1.0 + i as f64 * 0.5,
                first_time_bonus_percent: None,
                sort_order: i as i32,
                created_at: Timestamp::default(),
                updated_at: Timestamp::default(),
            })
            .collect()
    }

    #[test]
    fn parse_and_plan() {
        let entries = parse(
            r#"[
                {
                    "name": "The Pit",
                    "heroic_level": 5,
                    "base_favor": 6,
                    "xp_rewards": [
                        { "difficulty": "Normal", "base_xp": 800 },
                        { "difficulty": "Elite", "base_xp": 800, "is_epic": false }
                    ]
                },
                { "name": "Stormcleave Outpost", "heroic_level": 8 }
            ]"#,
        )
        .unwrap();

        let planned = plan(entries, &difficulties()).unwrap();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].quest.base_favor, Some(6));
        assert_eq!(planned[0].rewards[1].difficulty_id, 2);
        assert!(planned[1].rewards.is_empty());
    }

    #[test]
    fn rejects_non_array() {
        assert!(parse(r#"{ "name": "The Pit" }"#).is_err());
    }

    #[test]
    fn rejects_invalid_levels() {
        let entries = parse(r#"[{ "name": "Levelless" }]"#).unwrap();
        let err = plan(entries, &difficulties()).unwrap_err();
        assert!(err.to_string().contains("quest #1 (Levelless)"));
    }

    #[test]
    fn rejects_unknown_difficulty() {
        let entries = parse(
            r#"[{ "name": "The Pit", "heroic_level": 5,
                  "xp_rewards": [{ "difficulty": "Reaper", "base_xp": 1 }] }]"#,
        )
        .unwrap();
        let err = plan(entries, &difficulties()).unwrap_err();
        assert!(err.to_string().contains("unknown difficulty Reaper"));
    }

    #[test]
    fn rejects_duplicate_reward_key() {
        let entries = parse(
            r#"[{ "name": "The Pit", "heroic_level": 5,
                  "xp_rewards": [
                      { "difficulty": "Normal", "base_xp": 1 },
                      { "difficulty": "Normal", "base_xp": 2 }
                  ] }]"#,
        )
        .unwrap();
        assert_matches!(plan(entries, &difficulties()), Err(_));
    }

    #[test]
    fn rejects_duplicate_quest_names_and_mixed_tiers() {
        let dup = parse(
            r#"[{ "name": "The Pit", "heroic_level": 5 },
                { "name": "The Pit", "heroic_level": 6 }]"#,
        )
        .unwrap();
        assert!(plan(dup, &difficulties()).is_err());

        let mixed = parse(
            r#"[{ "name": "The Pit", "heroic_level": 5,
                  "xp_rewards": [{ "difficulty": "Normal", "base_xp": 1,
                                   "is_epic": true, "is_legendary": true }] }]"#,
        )
        .unwrap();
        assert!(plan(mixed, &difficulties()).is_err());
    }
}
