//! Difficulty tiers and the XP multiplier engine.
//!
//! XP is computed in exact integer hundredths so that a multiplier stored as
//! `NUMERIC(3,2)` never picks up binary floating-point drift before rounding.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Scale applied to multipliers and bonus factors (two decimal places).
const HUNDREDTHS: i64 = 100;

/// A row from the `difficulties` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Difficulty {
    pub id: DbId,
    pub name: String,
    /// Always > 0. Stored as `NUMERIC(3,2)`, read as `DOUBLE PRECISION`.
    pub multiplier: f64,
    pub first_time_bonus_percent: Option<i32>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Difficulty {
    /// XP for `base_xp` at this difficulty.
    pub fn calculate_xp(&self, base_xp: i32, include_first_time_bonus: bool) -> i64 {
        calculate_xp(
            base_xp,
            self.multiplier,
            self.first_time_bonus_percent,
            include_first_time_bonus,
        )
    }

    /// `"Elite (1.50x)"`.
    pub fn display_name(&self) -> String {
        format!("{} ({:.2}x)", self.name, self.multiplier)
    }

    pub fn has_first_time_bonus(&self) -> bool {
        self.first_time_bonus_percent.is_some()
    }
}

/// Compute final XP from a base value and a difficulty's multiplier.
///
/// `xp = base_xp * multiplier`, then `* (1 + bonus / 100)` when
/// `include_first_time_bonus` is set and a bonus is configured. The result is
/// rounded to nearest with ties away from zero.
///
/// Callers guarantee `multiplier > 0` and a non-negative `base_xp`.
///
/// # Examples
///
/// ```
/// use questlog_core::difficulty::calculate_xp;
///
/// assert_eq!(calculate_xp(1000, 1.25, None, false), 1250);
/// assert_eq!(calculate_xp(1000, 1.50, Some(45), true), 2175);
/// ```
pub fn calculate_xp(
    base_xp: i32,
    multiplier: f64,
    first_time_bonus_percent: Option<i32>,
    include_first_time_bonus: bool,
) -> i64 {
    let multiplier_hundredths = (multiplier * HUNDREDTHS as f64).round() as i64;
    let mut numerator = i64::from(base_xp) * multiplier_hundredths;
    let mut denominator = HUNDREDTHS;

    if include_first_time_bonus {
        if let Some(bonus) = first_time_bonus_percent {
            numerator *= HUNDREDTHS + i64::from(bonus);
            denominator *= HUNDREDTHS;
        }
    }

    round_half_away_from_zero(numerator, denominator)
}

fn round_half_away_from_zero(numerator: i64, denominator: i64) -> i64 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

/// Look up a difficulty by its unique name.
pub fn find_by_name<'a>(difficulties: &'a [Difficulty], name: &str) -> Option<&'a Difficulty> {
    difficulties.iter().find(|d| d.name == name)
}
