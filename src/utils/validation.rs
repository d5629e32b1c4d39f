//! Validation utilities for user input.
//!
//! This module provides reusable validation and parsing functions for
//! moderator-supplied player data.

use crate::database::StatUpdate;
use crate::error::{NamelessBotError, Result};

/// Validate a Minecraft username.
///
/// Minecraft usernames must:
/// - Be between 1 and 16 characters
/// - Contain only alphanumeric characters and underscores
///
/// # Examples
///
/// ```
/// use nameless_bot::utils::validation::validate_minecraft_username;
///
/// assert!(validate_minecraft_username("Steve").is_ok());
/// assert!(validate_minecraft_username("Player_123").is_ok());
/// assert!(validate_minecraft_username("").is_err());
/// assert!(validate_minecraft_username("Invalid Name").is_err());
/// ```
pub fn validate_minecraft_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(NamelessBotError::Validation(
            "Username cannot be empty".to_string()
        ));
    }

    if username.len() > 16 {
        return Err(NamelessBotError::Validation(
            format!("Username too long: {} characters (max 16)", username.len())
        ));
    }

    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(NamelessBotError::Validation(
            "Username can only contain letters, numbers, and underscores".to_string()
        ));
    }

    Ok(())
}

/// Parse `key=value` stat assignments separated by spaces or commas.
///
/// Accepted keys are `deaths`, `advancements` and `playtime` (seconds).
///
/// # Examples
///
/// ```
/// use nameless_bot::utils::validation::parse_stat_assignments;
///
/// let update = parse_stat_assignments("deaths=5, playtime=3600").unwrap();
/// assert_eq!(update.deaths, Some(5));
/// assert_eq!(update.playtime_seconds, Some(3600));
/// assert_eq!(update.advancements, None);
/// ```
pub fn parse_stat_assignments(input: &str) -> Result<StatUpdate> {
    let mut update = StatUpdate::default();

    for pair in input.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            NamelessBotError::InvalidInput(format!("Invalid format: {}. Use key=value format.", pair))
        })?;
        let key = key.trim();
        let value: u64 = value.trim().parse().map_err(|_| {
            NamelessBotError::InvalidInput(format!(
                "Invalid value for {}: {}. Must be a non-negative number.",
                key,
                value.trim()
            ))
        })?;

        match key.to_ascii_lowercase().as_str() {
            "deaths" => update.deaths = Some(value),
            "advancements" => update.advancements = Some(value),
            "playtime" => update.playtime_seconds = Some(value),
            _ => {
                return Err(NamelessBotError::InvalidInput(format!(
                    "Unknown stat: {}. Use deaths, advancements or playtime.",
                    key
                )))
            }
        }
    }

    if update.is_empty() {
        return Err(NamelessBotError::InvalidInput(
            "Please provide at least one key=value pair to update.".to_string(),
        ));
    }

    Ok(update)
}

/// A parsed bulk-update reply: accepted updates and per-line problems.
#[derive(Debug, Default)]
pub struct BulkUpdate {
    pub updates: Vec<(String, StatUpdate)>,
    pub errors: Vec<String>,
}

/// Parse a bulk update reply of the form `username: deaths=5, playtime=3600`,
/// one player per line. Lines without a colon are ignored.
pub fn parse_bulk_update(text: &str) -> BulkUpdate {
    let mut bulk = BulkUpdate::default();

    for line in text.lines() {
        let line = line.trim().trim_matches('`');
        let Some((username, data)) = line.split_once(':') else {
            continue;
        };
        let username = username.trim();

        if let Err(e) = validate_minecraft_username(username) {
            bulk.errors.push(format!("{}: {}", username, e));
            continue;
        }

        match parse_stat_assignments(data) {
            Ok(update) => bulk.updates.push((username.to_string(), update)),
            Err(e) => bulk.errors.push(format!("{}: {}", username, e)),
        }
    }

    bulk
}

/// Format a number of seconds as `12h 34m`.
///
/// # Examples
///
/// ```
/// use nameless_bot::utils::validation::format_playtime;
///
/// assert_eq!(format_playtime(18_000), "5h 0m");
/// assert_eq!(format_playtime(59), "0h 0m");
/// ```
pub fn format_playtime(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}
