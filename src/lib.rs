//! Nameless bot library.
//!
//! This library provides the core functionality for a Discord bot that tracks
//! Minecraft player statistics, hands out leaderboard roles, and lets
//! moderators manage player records and the whitelist.

pub mod error;
pub mod config;
pub mod database;
pub mod mojang;
pub mod roles;
pub mod scheduler;
pub mod utils;
pub mod types;
pub mod commands;
pub mod bot;

pub use error::{NamelessBotError, Result};
pub use config::Config;
