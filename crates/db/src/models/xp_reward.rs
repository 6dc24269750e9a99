//! Quest XP reward DTOs.

use questlog_core::types::DbId;
use serde::Deserialize;
use validator::Validate;

pub use questlog_core::xp_reward::QuestXpReward;

/// DTO for creating a reward row.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestXpReward {
    pub quest_id: DbId,
    pub difficulty_id: DbId,
    #[serde(default)]
    pub is_epic: bool,
    #[serde(default)]
    pub is_legendary: bool,
    #[validate(range(min = 0))]
    pub base_xp: i32,
}
