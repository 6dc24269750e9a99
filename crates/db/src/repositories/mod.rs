//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod catalog_repo;
pub mod difficulty_repo;
pub mod location_repo;
pub mod quest_repo;
pub mod quest_xp_reward_repo;
pub mod reference_repo;

pub use catalog_repo::CatalogRepo;
pub use difficulty_repo::DifficultyRepo;
pub use location_repo::LocationRepo;
pub use quest_repo::QuestRepo;
pub use quest_xp_reward_repo::QuestXpRewardRepo;
pub use reference_repo::ReferenceRepo;
