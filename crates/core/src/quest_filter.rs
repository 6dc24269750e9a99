//! Quest filtering, sorting and pagination.
//!
//! [`QuestFilterParams`] is the loose, string-typed shape callers receive
//! from the outside world. [`QuestFilterParams::into_filter`] turns it into a
//! typed [`QuestFilter`], silently dropping values it cannot interpret.
//! Every set option narrows the result (logical AND); unset options impose
//! no constraint.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::pagination::{paginate, Page, PageRequest};
use crate::quest::QuestRecord;
use crate::reference::{AdventurePack, PurchaseType};
use crate::relation::Loaded;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Reference filters
// ---------------------------------------------------------------------------

/// Match a related record either by its exact name or by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefFilter {
    ByName(String),
    ById(DbId),
}

impl RefFilter {
    /// A numeric value selects by id, anything else by name. Blank input
    /// yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<DbId>() {
            Ok(id) => RefFilter::ById(id),
            Err(_) => RefFilter::ByName(raw.to_string()),
        })
    }

    /// `ById` compares the foreign key. `ByName` needs the relation loaded
    /// and present.
    fn matches<T>(
        &self,
        foreign_key: Option<DbId>,
        related: &Loaded<Option<T>>,
        name_of: impl Fn(&T) -> &str,
    ) -> bool {
        match self {
            RefFilter::ById(id) => foreign_key == Some(*id),
            RefFilter::ByName(name) => related.present().is_some_and(|r| name_of(r) == name),
        }
    }
}

// ---------------------------------------------------------------------------
// Level range
// ---------------------------------------------------------------------------

/// Inclusive heroic level range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: i32,
    pub max: i32,
}

impl LevelRange {
    /// Parse `"min-max"`, e.g. `"5-10"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (min, max) = raw.trim().split_once('-')?;
        Some(Self {
            min: min.trim().parse().ok()?,
            max: max.trim().parse().ok()?,
        })
    }

    pub fn contains(&self, level: i32) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Name,
    HeroicLevel,
    EpicLevel,
    LegendaryLevel,
    BaseFavor,
    CreatedAt,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "name" => Some(SortField::Name),
            "heroic_level" => Some(SortField::HeroicLevel),
            "epic_level" => Some(SortField::EpicLevel),
            "legendary_level" => Some(SortField::LegendaryLevel),
            "base_favor" => Some(SortField::BaseFavor),
            "created_at" => Some(SortField::CreatedAt),
            _ => None,
        }
    }

    /// Ascending comparison. Names compare case-insensitively; absent
    /// levels sort after present ones.
    fn compare(self, a: &QuestRecord, b: &QuestRecord) -> Ordering {
        let (a, b) = (&a.quest, &b.quest);
        match self {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::HeroicLevel => nulls_last(a.heroic_level, b.heroic_level),
            SortField::EpicLevel => nulls_last(a.epic_level, b.epic_level),
            SortField::LegendaryLevel => nulls_last(a.legendary_level, b.legendary_level),
            SortField::BaseFavor => a.base_favor.cmp(&b.base_favor),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

fn nulls_last(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Typed filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestFilter {
    /// Matches heroic, epic or legendary level.
    pub level: Option<i32>,
    pub heroic_level: Option<i32>,
    pub epic_level: Option<i32>,
    pub legendary_level: Option<i32>,
    /// Applies to heroic level only.
    pub level_range: Option<LevelRange>,
    pub patron: Option<RefFilter>,
    pub duration: Option<RefFilter>,
    pub adventure_pack: Option<RefFilter>,
    pub location: Option<RefFilter>,
    /// `true` requires a Free to Play pack; `false` requires a paid pack.
    /// Quests without a pack match neither.
    pub free_to_play: Option<bool>,
    /// Only `true` constrains.
    pub extreme_challenge: Option<bool>,
    pub search: Option<String>,
    pub has_epic: Option<bool>,
    pub has_legendary: Option<bool>,
    pub min_favor: Option<i32>,
    pub max_favor: Option<i32>,
    pub sort_by: SortField,
    pub sort_direction: SortDirection,
    pub page: PageRequest,
}

impl QuestFilter {
    /// Whether `record` satisfies every set option.
    pub fn matches(&self, record: &QuestRecord) -> bool {
        let q = &record.quest;

        if let Some(level) = self.level {
            let any = [q.heroic_level, q.epic_level, q.legendary_level]
                .contains(&Some(level));
            if !any {
                return false;
            }
        }
        if self.heroic_level.is_some() && q.heroic_level != self.heroic_level {
            return false;
        }
        if self.epic_level.is_some() && q.epic_level != self.epic_level {
            return false;
        }
        if self.legendary_level.is_some() && q.legendary_level != self.legendary_level {
            return false;
        }
        if let Some(range) = self.level_range {
            if !q.heroic_level.is_some_and(|l| range.contains(l)) {
                return false;
            }
        }

        if let Some(f) = &self.patron {
            if !f.matches(q.patron_id, &record.patron, |p| p.name.as_str()) {
                return false;
            }
        }
        if let Some(f) = &self.duration {
            if !f.matches(q.duration_id, &record.duration, |d| d.name.as_str()) {
                return false;
            }
        }
        if let Some(f) = &self.adventure_pack {
            if !f.matches(q.adventure_pack_id, &record.adventure_pack, |p| p.name.as_str()) {
                return false;
            }
        }
        if let Some(f) = &self.location {
            if !f.matches(q.location_id, &record.location, |l| l.name.as_str()) {
                return false;
            }
        }

        if let Some(free) = self.free_to_play {
            let pack = record.adventure_pack.present();
            let ok = if free {
                pack.is_some_and(|p| p.purchase_type == PurchaseType::FreeToPlay)
            } else {
                pack.is_some_and(AdventurePack::is_premium)
            };
            if !ok {
                return false;
            }
        }

        if self.extreme_challenge == Some(true) && !q.extreme_challenge {
            return false;
        }

        if let Some(search) = &self.search {
            if !q.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }

        if let Some(has_epic) = self.has_epic {
            if q.has_epic() != has_epic {
                return false;
            }
        }
        if let Some(has_legendary) = self.has_legendary {
            if q.has_legendary() != has_legendary {
                return false;
            }
        }

        if self.min_favor.is_some_and(|min| q.base_favor < min) {
            return false;
        }
        if self.max_favor.is_some_and(|max| q.base_favor > max) {
            return false;
        }

        true
    }

    /// Ordering used for results. Ties always break on ascending id.
    pub fn compare(&self, a: &QuestRecord, b: &QuestRecord) -> Ordering {
        let primary = self.sort_by.compare(a, b);
        let primary = match self.sort_direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.quest.id.cmp(&b.quest.id))
    }

    /// Filter, sort and paginate `quests`.
    pub fn apply<'a>(&self, quests: &'a [QuestRecord]) -> Page<&'a QuestRecord> {
        let mut matching: Vec<&QuestRecord> = quests.iter().filter(|q| self.matches(q)).collect();
        matching.sort_by(|a, b| self.compare(a, b));
        paginate(matching, self.page)
    }
}

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Untyped filter input, e.g. from a query string or CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuestFilterParams {
    pub level: Option<String>,
    pub heroic_level: Option<String>,
    pub epic_level: Option<String>,
    pub legendary_level: Option<String>,
    pub level_range: Option<String>,
    pub patron: Option<String>,
    pub duration: Option<String>,
    pub adventure_pack: Option<String>,
    pub location: Option<String>,
    pub free_to_play: Option<String>,
    pub extreme_challenge: Option<String>,
    pub search: Option<String>,
    pub has_epic: Option<String>,
    pub has_legendary: Option<String>,
    pub min_favor: Option<String>,
    pub max_favor: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl QuestFilterParams {
    pub fn into_filter(self) -> QuestFilter {
        QuestFilter {
            level: parse_int(self.level.as_deref()),
            heroic_level: parse_int(self.heroic_level.as_deref()),
            epic_level: parse_int(self.epic_level.as_deref()),
            legendary_level: parse_int(self.legendary_level.as_deref()),
            level_range: self.level_range.as_deref().and_then(LevelRange::parse),
            patron: self.patron.as_deref().and_then(RefFilter::parse),
            duration: self.duration.as_deref().and_then(RefFilter::parse),
            adventure_pack: self.adventure_pack.as_deref().and_then(RefFilter::parse),
            location: self.location.as_deref().and_then(RefFilter::parse),
            free_to_play: parse_bool(self.free_to_play.as_deref()),
            extreme_challenge: parse_bool(self.extreme_challenge.as_deref()),
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            has_epic: parse_bool(self.has_epic.as_deref()),
            has_legendary: parse_bool(self.has_legendary.as_deref()),
            min_favor: parse_int(self.min_favor.as_deref()),
            max_favor: parse_int(self.max_favor.as_deref()),
            sort_by: self
                .sort_by
                .as_deref()
                .and_then(SortField::parse)
                .unwrap_or_default(),
            sort_direction: self
                .sort_direction
                .as_deref()
                .and_then(SortDirection::parse)
                .unwrap_or_default(),
            page: PageRequest::new(
                parse_int(self.page.as_deref()),
                parse_int(self.per_page.as_deref()),
            ),
        }
    }
}

fn parse_int<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Accepts the usual truthy / falsy spellings; anything else is unset.
fn parse_bool(raw: Option<&str>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
