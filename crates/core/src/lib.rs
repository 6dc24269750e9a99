pub mod catalog;
pub mod difficulty;
pub mod error;
pub mod location;
pub mod pagination;
pub mod projection;
pub mod quest;
pub mod quest_filter;
pub mod reference;
pub mod relation;
pub mod stats;
pub mod types;
pub mod xp_reward;
