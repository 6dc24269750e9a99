//! Quest entity, derived attributes, slug policy and level rules.

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::CoreError;
use crate::location::Location;
use crate::reference::{AdventurePack, Duration, Patron};
use crate::relation::Loaded;
use crate::types::{DbId, Timestamp};
use crate::xp_reward::XpRewardRecord;

/// A row from the `quests` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Quest {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub heroic_level: Option<i32>,
    pub epic_level: Option<i32>,
    pub legendary_level: Option<i32>,
    pub duration_id: Option<DbId>,
    pub patron_id: Option<DbId>,
    pub adventure_pack_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub base_favor: i32,
    pub extreme_challenge: bool,
    pub overview: Option<String>,
    pub objectives: Option<String>,
    pub tips: Option<String>,
    pub wiki_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Quest {
    /// First set level among heroic, epic, legendary.
    pub fn primary_level(&self) -> Option<i32> {
        self.heroic_level.or(self.epic_level).or(self.legendary_level)
    }

    /// Highest tier the quest is offered at.
    pub fn quest_type(&self) -> QuestType {
        if self.legendary_level.is_some() {
            QuestType::Legendary
        } else if self.epic_level.is_some() {
            QuestType::Epic
        } else if self.heroic_level.is_some() {
            QuestType::Heroic
        } else {
            QuestType::Unknown
        }
    }

    pub fn has_epic(&self) -> bool {
        self.epic_level.is_some()
    }

    pub fn has_legendary(&self) -> bool {
        self.legendary_level.is_some()
    }
}

// ---------------------------------------------------------------------------
// Quest type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestType {
    Heroic,
    Epic,
    Legendary,
    Unknown,
}

impl QuestType {
    /// Tier of an XP reward row from its flags. Legendary wins over epic.
    pub fn from_flags(is_epic: bool, is_legendary: bool) -> Self {
        if is_legendary {
            QuestType::Legendary
        } else if is_epic {
            QuestType::Epic
        } else {
            QuestType::Heroic
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuestType::Heroic => "Heroic",
            QuestType::Epic => "Epic",
            QuestType::Legendary => "Legendary",
            QuestType::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for QuestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Quest with relations
// ---------------------------------------------------------------------------

/// A quest plus whichever relations the loader fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestRecord {
    pub quest: Quest,
    pub duration: Loaded<Option<Duration>>,
    pub patron: Loaded<Option<Patron>>,
    pub adventure_pack: Loaded<Option<AdventurePack>>,
    pub location: Loaded<Option<Location>>,
    pub xp_rewards: Loaded<Vec<XpRewardRecord>>,
}

impl QuestRecord {
    /// Wrap a bare quest with no relations loaded.
    pub fn new(quest: Quest) -> Self {
        Self {
            quest,
            duration: Loaded::NotLoaded,
            patron: Loaded::NotLoaded,
            adventure_pack: Loaded::NotLoaded,
            location: Loaded::NotLoaded,
            xp_rewards: Loaded::NotLoaded,
        }
    }

    /// False when the pack is absent or was not loaded.
    pub fn is_free_to_play(&self) -> bool {
        self.adventure_pack
            .present()
            .is_some_and(AdventurePack::is_free_to_play)
    }
}

impl Default for Quest {
    fn default() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: 0,
            name: String::new(),
            slug: String::new(),
            heroic_level: None,
            epic_level: None,
            legendary_level: None,
            duration_id: None,
            patron_id: None,
            adventure_pack_id: None,
            location_id: None,
            base_favor: 0,
            extreme_challenge: false,
            overview: None,
            objectives: None,
            tips: None,
            wiki_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Derive a URL slug from a quest name.
///
/// Accented Latin letters are folded to ASCII first (`é` becomes `e`, `ß`
/// becomes `ss`). Then ASCII letters are lowercased, whitespace, `-` and `_`
/// act as separators, every other character is dropped, and separator runs
/// collapse into a single `-` with none leading or trailing.
///
/// # Examples
///
/// ```
/// use questlog_core::quest::derive_slug;
///
/// assert_eq!(derive_slug("The Devil's Details"), "the-devils-details");
/// assert_eq!(derive_slug("  Stormcleave Outpost -- Part_2 "), "stormcleave-outpost-part-2");
/// assert_eq!(derive_slug("Café Run"), "cafe-run");
/// ```
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in fold_to_ascii(name).chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
        }
    }

    slug
}

/// Decompose accented letters and strip their combining marks. Letters with
/// no decomposition get a fixed spelling.
fn fold_to_ascii(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.nfkd().filter(|c| !is_combining_mark(*c)) {
        match ch {
            'ß' => out.push_str("ss"),
            'Æ' | 'æ' => out.push_str("ae"),
            'Œ' | 'œ' => out.push_str("oe"),
            'Þ' | 'þ' => out.push_str("th"),
            'Ø' | 'ø' => out.push('o'),
            'Đ' | 'đ' | 'Ð' | 'ð' => out.push('d'),
            'Ł' | 'ł' => out.push('l'),
            _ => out.push(ch),
        }
    }
    out
}

/// Slug for a new quest: the supplied one, or one derived from `name`.
pub fn resolve_slug_on_create(name: &str, supplied: Option<&str>) -> String {
    match supplied {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => derive_slug(name),
    }
}

/// Slug to write on update, or `None` to leave it unchanged.
///
/// An explicitly supplied slug always wins. Otherwise the slug is only
/// regenerated when the name actually changes.
pub fn resolve_slug_on_update(
    current_name: &str,
    new_name: Option<&str>,
    supplied: Option<&str>,
) -> Option<String> {
    if let Some(slug) = supplied.filter(|s| !s.is_empty()) {
        return Some(slug.to_string());
    }
    new_name
        .filter(|name| *name != current_name)
        .map(derive_slug)
}

// ---------------------------------------------------------------------------
// Level rules
// ---------------------------------------------------------------------------

/// Check the cross-field level rules for a quest.
///
/// At least one level must be set; epic must exceed heroic and legendary
/// must exceed epic whenever both members of a pair are present.
pub fn validate_levels(
    heroic: Option<i32>,
    epic: Option<i32>,
    legendary: Option<i32>,
) -> Result<(), CoreError> {
    if heroic.is_none() && epic.is_none() && legendary.is_none() {
        return Err(CoreError::Validation(
            "At least one level type (heroic, epic, or legendary) must be specified".to_string(),
        ));
    }

    if let (Some(h), Some(e)) = (heroic, epic) {
        if e <= h {
            return Err(CoreError::Validation(format!(
                "Epic level ({e}) must be higher than heroic level ({h})"
            )));
        }
    }

    if let (Some(e), Some(l)) = (epic, legendary) {
        if l <= e {
            return Err(CoreError::Validation(format!(
                "Legendary level ({l}) must be higher than epic level ({e})"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::reference::PurchaseType;

    fn quest(heroic: Option<i32>, epic: Option<i32>, legendary: Option<i32>) -> Quest {
        Quest {
            id: 1,
            name: "The Pit".to_string(),
            slug: "the-pit".to_string(),
            heroic_level: heroic,
            epic_level: epic,
            legendary_level: legendary,
            ..Quest::default()
        }
    }

    fn pack(purchase_type: PurchaseType) -> AdventurePack {
        AdventurePack {
            id: 7,
            name: "Free Pack".to_string(),
            purchase_type,
            release_date: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    // -- Derived attributes --

    #[test]
    fn quest_type_follows_highest_tier() {
        assert_eq!(quest(Some(5), None, None).quest_type(), QuestType::Heroic);
        assert_eq!(quest(Some(5), Some(22), None).quest_type(), QuestType::Epic);
        assert_eq!(
            quest(Some(5), Some(22), Some(32)).quest_type(),
            QuestType::Legendary
        );
        assert_eq!(quest(None, None, None).quest_type(), QuestType::Unknown);
        assert_eq!(QuestType::Legendary.to_string(), "Legendary");
    }

    #[test]
    fn primary_level_is_first_set() {
        assert_eq!(quest(Some(5), Some(22), None).primary_level(), Some(5));
        assert_eq!(quest(None, Some(22), Some(32)).primary_level(), Some(22));
        assert_eq!(quest(None, None, Some(32)).primary_level(), Some(32));
        assert_eq!(quest(None, None, None).primary_level(), None);
    }

    #[test]
    fn reward_flags_map_to_type() {
        assert_eq!(QuestType::from_flags(false, false), QuestType::Heroic);
        assert_eq!(QuestType::from_flags(true, false), QuestType::Epic);
        assert_eq!(QuestType::from_flags(true, true), QuestType::Legendary);
    }

    #[test]
    fn free_to_play_requires_loaded_free_pack() {
        let mut record = QuestRecord::new(quest(Some(5), None, None));
        assert!(!record.is_free_to_play());

        record.adventure_pack = Loaded::Loaded(None);
        assert!(!record.is_free_to_play());

        record.adventure_pack = Loaded::Loaded(Some(pack(PurchaseType::Premium)));
        assert!(!record.is_free_to_play());

        record.adventure_pack = Loaded::Loaded(Some(pack(PurchaseType::FreeToPlay)));
        assert!(record.is_free_to_play());
    }

    // -- Slugs --

    #[test]
    fn slug_basic() {
        assert_eq!(derive_slug("Stormcleave Outpost"), "stormcleave-outpost");
    }

    #[test]
    fn slug_drops_punctuation() {
        assert_eq!(derive_slug("Tangleroot Gorge: Part 1!"), "tangleroot-gorge-part-1");
        assert_eq!(derive_slug("Koboldnapped?"), "koboldnapped");
    }

    #[test]
    fn slug_collapses_and_trims_separators() {
        assert_eq!(derive_slug("--a  _ b--"), "a-b");
        assert_eq!(derive_slug("   "), "");
    }

    #[test]
    fn slug_folds_accented_letters() {
        assert_eq!(derive_slug("Caf\u{e9} Run"), "cafe-run");
        assert_eq!(derive_slug("Cafe\u{301} Run"), "cafe-run");
        assert_eq!(derive_slug("Stra\u{df}e der \u{c6}sir"), "strasse-der-aesir");
        assert_eq!(derive_slug("\u{d8}rsted's Forge"), "orsteds-forge");
        assert_eq!(derive_slug("\u{706b} Fire"), "fire");
    }

    #[test]
    fn create_uses_supplied_slug() {
        assert_eq!(resolve_slug_on_create("The Pit", Some("pit")), "pit");
        assert_eq!(resolve_slug_on_create("The Pit", Some("")), "the-pit");
        assert_eq!(resolve_slug_on_create("The Pit", None), "the-pit");
    }

    #[test]
    fn update_regenerates_only_on_name_change() {
        assert_eq!(
            resolve_slug_on_update("The Pit", Some("The Deep Pit"), None),
            Some("the-deep-pit".to_string())
        );
        assert_eq!(resolve_slug_on_update("The Pit", Some("The Pit"), None), None);
        assert_eq!(resolve_slug_on_update("The Pit", None, None), None);
    }

    #[test]
    fn update_supplied_slug_wins() {
        assert_eq!(
            resolve_slug_on_update("The Pit", Some("The Deep Pit"), Some("custom")),
            Some("custom".to_string())
        );
        assert_eq!(
            resolve_slug_on_update("The Pit", None, Some("custom")),
            Some("custom".to_string())
        );
    }

    // -- Levels --

    #[test]
    fn levels_require_at_least_one() {
        assert_matches!(validate_levels(None, None, None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn epic_must_exceed_heroic() {
        assert_matches!(
            validate_levels(Some(10), Some(8), None),
            Err(CoreError::Validation(msg)) if msg.contains("Epic level")
        );
        assert_matches!(validate_levels(Some(10), Some(10), None), Err(_));
    }

    #[test]
    fn legendary_must_exceed_epic() {
        assert_matches!(
            validate_levels(None, Some(30), Some(30)),
            Err(CoreError::Validation(msg)) if msg.contains("Legendary level")
        );
    }

    #[test]
    fn valid_level_sets() {
        assert!(validate_levels(Some(5), None, None).is_ok());
        assert!(validate_levels(Some(5), Some(22), Some(32)).is_ok());
        // Heroic and legendary without epic are not compared.
        assert!(validate_levels(Some(30), None, Some(30)).is_ok());
    }
}
