//! Operator commands for the quest catalog.

pub mod commands;
pub mod config;
pub mod import;
