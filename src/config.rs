//! Configuration management for the bot.
//!
//! This module handles loading and validating environment variables and application settings.

use crate::error::{NamelessBotError, Result};
use crate::roles::{ApplyPolicy, EligibilityPolicy, RoleSettings};
use std::env;
use std::time::Duration;

/// Configuration for the application, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Path to SQLite database file
    pub db_path: String,
    /// Members holding this role may run admin commands
    pub mod_role_id: u64,
    /// Role granted by `/whitelist`
    pub whitelist_role_id: u64,
    /// Guild reconciled on a schedule; no schedule when unset
    pub guild_id: Option<u64>,
    /// Period of the scheduled role update (zero disables it)
    pub role_update_interval: Duration,
    /// Thresholds and pacing for achievement roles
    pub role_settings: RoleSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This will attempt to load a .env file if present using dotenv,
    /// then read required environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required environment variable is missing or invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nameless_bot::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load configuration");
    /// println!("Database: {}", config.db_path);
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors - it's optional)
        dotenv::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| NamelessBotError::Config(
                "Missing DISCORD_TOKEN environment variable. Set it in your environment or create a .env file (never commit this file).".to_string()
            ))?;

        let db_path = Self::get_db_path()?;

        let mod_role_id = Self::required_id("MOD_ROLE_ID")?;
        let whitelist_role_id = Self::required_id("WHITELIST_ROLE_ID")?;
        let guild_id = parse_optional_u64("GUILD_ID", env::var("GUILD_ID").ok())?;

        let role_update_interval = Duration::from_secs(Self::u64_or("ROLE_UPDATE_INTERVAL_SECS", 3600)?);

        let defaults = RoleSettings::default();
        let role_settings = RoleSettings {
            thresholds: EligibilityPolicy {
                least_deaths_min_playtime: Self::u64_or(
                    "LEAST_DEATHS_MIN_PLAYTIME_SECS",
                    defaults.thresholds.least_deaths_min_playtime,
                )?,
                least_min_playtime: Self::u64_or(
                    "LEAST_MIN_PLAYTIME_SECS",
                    defaults.thresholds.least_min_playtime,
                )?,
            },
            pacing: ApplyPolicy {
                call_delay: Duration::from_millis(Self::u64_or(
                    "ROLE_API_CALL_DELAY_MS",
                    defaults.pacing.call_delay.as_millis() as u64,
                )?),
                rate_limit_backoff: Duration::from_millis(Self::u64_or(
                    "RATE_LIMIT_BACKOFF_MS",
                    defaults.pacing.rate_limit_backoff.as_millis() as u64,
                )?),
            },
        };

        Ok(Self {
            discord_token,
            db_path,
            mod_role_id,
            whitelist_role_id,
            guild_id,
            role_update_interval,
            role_settings,
        })
    }

    /// Get the database path from environment or use default.
    fn get_db_path() -> Result<String> {
        match env::var("DB_PATH") {
            Ok(path) => Ok(path),
            Err(_) => {
                let mut path = env::current_dir()
                    .map_err(|e| NamelessBotError::Config(
                        format!("Failed to determine current directory: {}", e)
                    ))?;

                path.push("data");
                path.push("nameless.db");

                path.into_os_string()
                    .into_string()
                    .map_err(|os_str| NamelessBotError::Config(
                        format!("Database path contains invalid Unicode: {:?}", os_str)
                    ))
            }
        }
    }

    fn required_id(name: &str) -> Result<u64> {
        parse_optional_u64(name, env::var(name).ok())?.ok_or_else(|| NamelessBotError::Config(
            format!("Missing {} environment variable. Set it to the numeric Discord id.", name)
        ))
    }

    fn u64_or(name: &str, default: u64) -> Result<u64> {
        Ok(parse_optional_u64(name, env::var(name).ok())?.unwrap_or(default))
    }
}

/// Parse an optional numeric variable, treating blank values as unset.
fn parse_optional_u64(name: &str, raw: Option<String>) -> Result<Option<u64>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<u64>().map(Some).map_err(|_| NamelessBotError::Config(
            format!("Invalid {}: '{}'. Expected a non-negative integer.", name, value)
        )),
    }
}
