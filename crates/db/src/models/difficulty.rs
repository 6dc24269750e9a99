//! Difficulty tier DTOs.

use serde::Deserialize;
use validator::Validate;

pub use questlog_core::difficulty::Difficulty;

/// DTO for creating a new difficulty tier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDifficulty {
    #[validate(length(min = 1, max = 20))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, max = 9.99))]
    pub multiplier: f64,
    #[validate(range(min = 0, max = 100))]
    pub first_time_bonus_percent: Option<i32>,
    pub sort_order: i32,
}
