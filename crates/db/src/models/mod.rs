//! Domain model structs and DTOs.
//!
//! Entity row types live in `questlog-core` (decoded here through its `sqlx`
//! feature) and are re-exported from each submodule next to:
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod difficulty;
pub mod location;
pub mod quest;
pub mod xp_reward;
