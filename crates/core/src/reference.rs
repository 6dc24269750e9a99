//! Reference data attached to quests: durations, patrons and adventure packs.
//!
//! These rows are read-only from this workspace's point of view. They are
//! loaded to resolve quest relations and name-based filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

/// A row from the `durations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Duration {
    pub id: DbId,
    pub name: String,
    pub estimated_minutes: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Duration {
    /// `"Short (15 min)"`, or just the name when no estimate is recorded.
    pub fn display_name(&self) -> String {
        match self.estimated_minutes {
            Some(minutes) => format!("{} ({} min)", self.name, minutes),
            None => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Patron
// ---------------------------------------------------------------------------

/// A row from the `patrons` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Patron {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Adventure packs
// ---------------------------------------------------------------------------

/// How an adventure pack is obtained. Maps to the `purchase_type` PG enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "purchase_type"))]
pub enum PurchaseType {
    #[serde(rename = "Free to Play")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Free to Play"))]
    FreeToPlay,
    Premium,
    #[serde(rename = "VIP")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "VIP"))]
    Vip,
    Expansion,
}

impl PurchaseType {
    pub const ALL: [PurchaseType; 4] = [
        PurchaseType::FreeToPlay,
        PurchaseType::Premium,
        PurchaseType::Vip,
        PurchaseType::Expansion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PurchaseType::FreeToPlay => "Free to Play",
            PurchaseType::Premium => "Premium",
            PurchaseType::Vip => "VIP",
            PurchaseType::Expansion => "Expansion",
        }
    }

    /// Anything that has to be bought or subscribed to.
    pub fn is_premium(self) -> bool {
        !matches!(self, PurchaseType::FreeToPlay)
    }
}

impl std::fmt::Display for PurchaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `adventure_packs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AdventurePack {
    pub id: DbId,
    pub name: String,
    pub purchase_type: PurchaseType,
    pub release_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdventurePack {
    pub fn is_free_to_play(&self) -> bool {
        self.purchase_type == PurchaseType::FreeToPlay
    }

    pub fn is_premium(&self) -> bool {
        self.purchase_type.is_premium()
    }

    /// Whole years between the release date and `today`.
    ///
    /// Packs released after `today` report 0.
    pub fn age_in_years(&self, today: NaiveDate) -> Option<u32> {
        self.release_date
            .map(|released| today.years_since(released).unwrap_or(0))
    }
}
