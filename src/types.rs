//! Type definitions and aliases for the bot.
//!
//! This module contains shared types used throughout the application.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::database::PlayerRepository;

/// Bot application data shared across all commands.
///
/// This data is accessible in all command handlers through the context.
pub struct Data {
    /// Settings loaded at startup
    pub config: Config,
    /// HTTP client for making API requests
    pub http_client: reqwest::Client,
    /// Held for the duration of an achievement role run; shared with the scheduler
    pub role_run_guard: Arc<Mutex<()>>,
}

impl Data {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            role_run_guard: Arc::new(Mutex::new(())),
        }
    }

    /// Create a new player repository for database operations.
    pub fn player_repository(&self) -> PlayerRepository {
        PlayerRepository::new(self.config.db_path.clone())
    }
}

/// Error type for bot commands (maintains compatibility with poise).
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Command context type alias for easier usage.
pub type Context<'a> = poise::Context<'a, Data, Error>;
