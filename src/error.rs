//! Custom error types for the bot.
//!
//! This module provides a centralized error handling system with specific error types
//! for different parts of the application.

use poise::serenity_prelude as serenity;
use std::fmt;

/// Main error type for bot operations.
#[derive(Debug)]
pub enum NamelessBotError {
    /// Configuration errors (missing env vars, invalid values)
    Config(String),
    /// Database operation errors
    Database(String),
    /// Mojang API errors
    MojangApi(String),
    /// Network/HTTP errors
    Network(String),
    /// Discord API errors
    Discord(String),
    /// Validation errors (invalid usernames, malformed stat updates, etc.)
    Validation(String),
    /// Generic I/O errors
    Io(std::io::Error),
    /// Invalid input errors
    InvalidInput(String),
    /// The stats source could not be read; a role run cannot start without it
    DataUnavailable(String),
}

impl fmt::Display for NamelessBotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::MojangApi(msg) => write!(f, "Mojang API error: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Discord(msg) => write!(f, "Discord error: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::DataUnavailable(msg) => write!(f, "Stats unavailable: {}", msg),
        }
    }
}

impl std::error::Error for NamelessBotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NamelessBotError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NamelessBotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for NamelessBotError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<reqwest::Error> for NamelessBotError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for NamelessBotError {
    fn from(err: serde_json::Error) -> Self {
        Self::MojangApi(format!("JSON parsing error: {}", err))
    }
}

impl From<tokio::task::JoinError> for NamelessBotError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Database(format!("Task join error: {}", err))
    }
}

impl From<serenity::Error> for NamelessBotError {
    fn from(err: serenity::Error) -> Self {
        Self::Discord(err.to_string())
    }
}

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, NamelessBotError>;
