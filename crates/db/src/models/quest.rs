//! Quest DTOs.
//!
//! Field limits mirror the catalog's accepted ranges; the cross-field level
//! rules come from `questlog_core::quest::validate_levels`.

use questlog_core::error::CoreError;
use questlog_core::quest::validate_levels;
use questlog_core::types::DbId;
use serde::Deserialize;
use validator::{Validate, ValidationError};

pub use questlog_core::quest::Quest;

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a new quest. A missing or empty `slug` is derived from
/// the name.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_create_levels"))]
pub struct CreateQuest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 255))]
    pub slug: Option<String>,
    #[validate(range(min = 1, max = 30))]
    pub heroic_level: Option<i32>,
    #[validate(range(min = 20, max = 33))]
    pub epic_level: Option<i32>,
    #[validate(range(min = 30, max = 35))]
    pub legendary_level: Option<i32>,
    pub duration_id: Option<DbId>,
    pub patron_id: Option<DbId>,
    pub adventure_pack_id: Option<DbId>,
    pub location_id: Option<DbId>,
    #[validate(range(min = 0, max = 999))]
    pub base_favor: Option<i32>,
    pub extreme_challenge: Option<bool>,
    #[validate(length(max = 5000))]
    pub overview: Option<String>,
    #[validate(length(max = 5000))]
    pub objectives: Option<String>,
    #[validate(length(max = 5000))]
    pub tips: Option<String>,
    #[validate(url, length(max = 512))]
    pub wiki_url: Option<String>,
}

/// DTO for partially updating a quest.
///
/// The slug is regenerated from a changed name unless `slug` is supplied in
/// the same update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    #[validate(range(min = 1, max = 30))]
    pub heroic_level: Option<i32>,
    #[validate(range(min = 20, max = 33))]
    pub epic_level: Option<i32>,
    #[validate(range(min = 30, max = 35))]
    pub legendary_level: Option<i32>,
    pub duration_id: Option<DbId>,
    pub patron_id: Option<DbId>,
    pub adventure_pack_id: Option<DbId>,
    pub location_id: Option<DbId>,
    #[validate(range(min = 0, max = 999))]
    pub base_favor: Option<i32>,
    pub extreme_challenge: Option<bool>,
    #[validate(length(max = 5000))]
    pub overview: Option<String>,
    #[validate(length(max = 5000))]
    pub objectives: Option<String>,
    #[validate(length(max = 5000))]
    pub tips: Option<String>,
    #[validate(url, length(max = 512))]
    pub wiki_url: Option<String>,
}

impl UpdateQuest {
    /// Check the level rules against the levels the quest will have after
    /// this patch is applied.
    pub fn validate_levels_against(&self, current: &Quest) -> Result<(), CoreError> {
        validate_levels(
            self.heroic_level.or(current.heroic_level),
            self.epic_level.or(current.epic_level),
            self.legendary_level.or(current.legendary_level),
        )
    }
}

fn validate_create_levels(dto: &CreateQuest) -> Result<(), ValidationError> {
    validate_levels(dto.heroic_level, dto.epic_level, dto.legendary_level).map_err(|e| {
        ValidationError::new("levels").with_message(e.to_string().into())
    })
}
