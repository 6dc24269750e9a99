//! XP reward table lookups.
//!
//! Each quest has at most one reward row per (difficulty, tier) pair. The
//! helpers here operate on a quest's already-loaded rows; absence of a row is
//! a normal outcome and is reported as `None`.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::quest::QuestType;
use crate::relation::Loaded;
use crate::types::{DbId, Timestamp};

/// A row from the `quest_xp_rewards` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct QuestXpReward {
    pub id: DbId,
    pub quest_id: DbId,
    pub difficulty_id: DbId,
    pub is_epic: bool,
    pub is_legendary: bool,
    pub base_xp: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QuestXpReward {
    pub fn quest_type(&self) -> QuestType {
        QuestType::from_flags(self.is_epic, self.is_legendary)
    }

    fn matches_key(&self, difficulty_id: DbId, is_epic: bool, is_legendary: bool) -> bool {
        self.difficulty_id == difficulty_id
            && self.is_epic == is_epic
            && self.is_legendary == is_legendary
    }
}

/// A reward row with its difficulty, when the loader joined it.
#[derive(Debug, Clone, PartialEq)]
pub struct XpRewardRecord {
    pub reward: QuestXpReward,
    pub difficulty: Loaded<Difficulty>,
}

impl XpRewardRecord {
    pub fn new(reward: QuestXpReward, difficulty: Option<Difficulty>) -> Self {
        Self {
            reward,
            difficulty: difficulty.map_or(Loaded::NotLoaded, Loaded::Loaded),
        }
    }

    pub fn quest_type(&self) -> QuestType {
        self.reward.quest_type()
    }

    /// Base XP scaled by the difficulty multiplier.
    pub fn calculated_xp(&self) -> Option<i64> {
        self.difficulty
            .as_loaded()
            .map(|d| d.calculate_xp(self.reward.base_xp, false))
    }

    /// Base XP scaled by the multiplier and the first-time bonus.
    pub fn xp_with_first_time_bonus(&self) -> Option<i64> {
        self.difficulty
            .as_loaded()
            .map(|d| d.calculate_xp(self.reward.base_xp, true))
    }

    /// `"Epic Elite: 3,000 XP"`.
    pub fn description(&self) -> Option<String> {
        let difficulty = self.difficulty.as_loaded()?;
        let xp = difficulty.calculate_xp(self.reward.base_xp, false);
        Some(format!(
            "{} {}: {} XP",
            self.quest_type(),
            difficulty.name,
            format_thousands(xp)
        ))
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Base XP stored for one (difficulty, tier) combination.
pub fn xp_for_difficulty(
    rewards: &[XpRewardRecord],
    difficulty_id: DbId,
    is_epic: bool,
    is_legendary: bool,
) -> Option<i32> {
    rewards
        .iter()
        .find(|r| r.reward.matches_key(difficulty_id, is_epic, is_legendary))
        .map(|r| r.reward.base_xp)
}

/// A quest's rewards partitioned by tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedXpRewards<T> {
    pub heroic: Vec<T>,
    pub epic: Vec<T>,
    pub legendary: Vec<T>,
}

impl<T> GroupedXpRewards<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> GroupedXpRewards<U> {
        GroupedXpRewards {
            heroic: self.heroic.into_iter().map(&mut f).collect(),
            epic: self.epic.into_iter().map(&mut f).collect(),
            legendary: self.legendary.into_iter().map(&mut f).collect(),
        }
    }
}

/// Split rewards into heroic / epic / legendary buckets, keeping input order
/// within each bucket. A row flagged legendary lands in `legendary` even when
/// it is also flagged epic.
pub fn group_xp_rewards(rewards: &[XpRewardRecord]) -> GroupedXpRewards<&XpRewardRecord> {
    let mut grouped = GroupedXpRewards {
        heroic: Vec::new(),
        epic: Vec::new(),
        legendary: Vec::new(),
    };
    for record in rewards {
        match record.quest_type() {
            QuestType::Legendary => grouped.legendary.push(record),
            QuestType::Epic => grouped.epic.push(record),
            _ => grouped.heroic.push(record),
        }
    }
    grouped
}

// ---------------------------------------------------------------------------
// XP calculation
// ---------------------------------------------------------------------------

/// Result of computing a quest's XP at one difficulty and tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XpCalculation {
    pub base_xp: i32,
    pub difficulty_multiplier: f64,
    pub total_xp: i64,
    pub difficulty: String,
}

/// Compute XP for a quest at `difficulty`, or `None` when the quest has no
/// reward row for that difficulty and tier.
pub fn calculate_quest_xp(
    rewards: &[XpRewardRecord],
    difficulty: &Difficulty,
    is_epic: bool,
    is_legendary: bool,
    include_first_time_bonus: bool,
) -> Option<XpCalculation> {
    let base_xp = xp_for_difficulty(rewards, difficulty.id, is_epic, is_legendary)?;
    Some(XpCalculation {
        base_xp,
        difficulty_multiplier: difficulty.multiplier,
        total_xp: difficulty.calculate_xp(base_xp, include_first_time_bonus),
        difficulty: difficulty.name.clone(),
    })
}

/// Render an integer with `,` between groups of three digits.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
