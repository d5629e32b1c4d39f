//! Database operations and data access layer.
//!
//! This module provides a repository pattern for the player stats table,
//! separating database concerns from business logic.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};
use crate::error::{NamelessBotError, Result};
use crate::roles::StatsSource;
use std::path::Path;

/// One player's tracked statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub minecraft_username: String,
    /// Linked Discord account: user id, mention, or legacy `name#tag`
    pub linked_account: Option<String>,
    pub deaths: u64,
    pub advancements: u64,
    pub playtime_seconds: u64,
}

/// A single statistic value for one player, as returned by the leaderboard queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatEntry {
    pub minecraft_username: String,
    pub linked_account: Option<String>,
    pub value: u64,
}

/// Fields to overwrite for one player. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatUpdate {
    pub deaths: Option<u64>,
    pub advancements: Option<u64>,
    pub playtime_seconds: Option<u64>,
}

impl StatUpdate {
    pub fn is_empty(&self) -> bool {
        self.deaths.is_none() && self.advancements.is_none() && self.playtime_seconds.is_none()
    }
}

/// Result of adding a player during whitelisting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddPlayerOutcome {
    Added,
    AlreadyExists,
}

/// Initialize the database schema.
///
/// Creates the players table if it doesn't already exist.
/// Also creates the parent directory if needed.
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Errors
///
/// Returns an error if the database cannot be created or initialized.
pub async fn init_db(path: &str) -> Result<()> {
    let path = path.to_string();
    tokio::task::spawn_blocking(move || init_db_sync(&path))
        .await
        .map_err(|e| NamelessBotError::Database(format!("Task join error: {}", e)))??;
    Ok(())
}

fn init_db_sync(path: &str) -> Result<()> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS players (
            minecraft_username TEXT NOT NULL PRIMARY KEY COLLATE NOCASE,
            discord_username TEXT,
            deaths INTEGER NOT NULL DEFAULT 0 CHECK (deaths >= 0),
            advancements INTEGER NOT NULL DEFAULT 0 CHECK (advancements >= 0),
            playtime_seconds INTEGER NOT NULL DEFAULT 0 CHECK (playtime_seconds >= 0)
        )",
        [],
    )?;

    Ok(())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerRecord> {
    Ok(PlayerRecord {
        minecraft_username: row.get(0)?,
        linked_account: row.get(1)?,
        deaths: row.get(2)?,
        advancements: row.get(3)?,
        playtime_seconds: row.get(4)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<StatEntry> {
    Ok(StatEntry {
        minecraft_username: row.get(0)?,
        linked_account: row.get(1)?,
        value: row.get(2)?,
    })
}

/// Repository for player database operations.
#[derive(Debug, Clone)]
pub struct PlayerRepository {
    db_path: String,
}

impl PlayerRepository {
    /// Create a new player repository.
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// Run `f` against a fresh connection on the blocking pool.
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = Connection::open(&db_path)
                .map_err(|e| NamelessBotError::Database(format!("Failed to connect to database: {}", e)))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| NamelessBotError::Database(format!("Task join error: {}", e)))?
    }

    async fn stat_column(&self, sql: &'static str) -> Result<Vec<StatEntry>> {
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map([], entry_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    /// Deaths for every player, lowest first.
    pub async fn get_all_deaths(&self) -> Result<Vec<StatEntry>> {
        self.stat_column(
            "SELECT minecraft_username, discord_username, deaths FROM players
             ORDER BY deaths ASC, minecraft_username",
        )
        .await
    }

    /// Advancements for every player, highest first.
    pub async fn get_all_advancements(&self) -> Result<Vec<StatEntry>> {
        self.stat_column(
            "SELECT minecraft_username, discord_username, advancements FROM players
             ORDER BY advancements DESC, minecraft_username",
        )
        .await
    }

    /// Playtime in seconds for every player, highest first.
    pub async fn get_all_playtimes(&self) -> Result<Vec<StatEntry>> {
        self.stat_column(
            "SELECT minecraft_username, discord_username, playtime_seconds FROM players
             ORDER BY playtime_seconds DESC, minecraft_username",
        )
        .await
    }

    /// Get all players from the database, ordered by username.
    pub async fn get_all_players(&self) -> Result<Vec<PlayerRecord>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT minecraft_username, discord_username, deaths, advancements, playtime_seconds
                 FROM players ORDER BY minecraft_username",
            )?;
            let rows = stmt.query_map([], record_from_row)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
        .await
    }

    /// Get a player's record by Minecraft username (case-insensitive).
    ///
    /// # Returns
    ///
    /// Returns `Some(record)` if found, `None` otherwise.
    pub async fn get_player_stats(&self, minecraft_username: &str) -> Result<Option<PlayerRecord>> {
        let username = minecraft_username.to_string();
        self.with_connection(move |conn| {
            Ok(conn
                .query_row(
                    "SELECT minecraft_username, discord_username, deaths, advancements, playtime_seconds
                     FROM players WHERE minecraft_username = ?1",
                    rusqlite::params![username],
                    record_from_row,
                )
                .optional()?)
        })
        .await
    }

    /// Add a player with zeroed stats, linked to a Discord account.
    ///
    /// An existing player keeps its stats and link.
    pub async fn add_player(&self, minecraft_username: &str, linked_account: &str) -> Result<AddPlayerOutcome> {
        let username = minecraft_username.to_string();
        let linked = linked_account.to_string();
        self.with_connection(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO players (minecraft_username, discord_username)
                 VALUES (?1, ?2)
                 ON CONFLICT(minecraft_username) DO NOTHING",
                rusqlite::params![username, linked],
            )?;
            Ok(if inserted == 1 {
                AddPlayerOutcome::Added
            } else {
                AddPlayerOutcome::AlreadyExists
            })
        })
        .await
    }

    /// Apply stat overwrites for several players in one transaction.
    ///
    /// Unknown usernames are skipped. Returns the number of players updated.
    pub async fn bulk_update_history(&self, updates: Vec<(String, StatUpdate)>) -> Result<usize> {
        self.with_connection(move |conn| {
            let tx = conn.transaction()?;
            let mut updated = 0;

            for (username, update) in &updates {
                if update.is_empty() {
                    continue;
                }
                let changed = tx.execute(
                    "UPDATE players SET
                        deaths = COALESCE(?2, deaths),
                        advancements = COALESCE(?3, advancements),
                        playtime_seconds = COALESCE(?4, playtime_seconds)
                     WHERE minecraft_username = ?1",
                    rusqlite::params![username, update.deaths, update.advancements, update.playtime_seconds],
                )?;
                updated += changed;
            }

            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    /// Delete a player from the database.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_player(&self, minecraft_username: &str) -> Result<bool> {
        let username = minecraft_username.to_string();
        self.with_connection(move |conn| {
            let removed = conn.execute(
                "DELETE FROM players WHERE minecraft_username = ?1",
                rusqlite::params![username],
            )?;
            Ok(removed > 0)
        })
        .await
    }
}

#[async_trait]
impl StatsSource for PlayerRepository {
    async fn all_players(&self) -> Result<Vec<PlayerRecord>> {
        self.get_all_players().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper function to create a test database in a temporary directory
    async fn setup_test_db() -> (TempDir, PlayerRepository) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("data").join("test.db");
        let db_path_str = db_path.to_str().expect("Invalid path").to_string();

        init_db(&db_path_str).await.expect("Failed to initialize database");

        let repo = PlayerRepository::new(db_path_str);
        (temp_dir, repo)
    }

    async fn seed(repo: &PlayerRepository, name: &str, deaths: u64, advancements: u64, playtime: u64) {
        repo.add_player(name, &format!("{}_discord", name.to_lowercase())).await.unwrap();
        repo.bulk_update_history(vec![(
            name.to_string(),
            StatUpdate {
                deaths: Some(deaths),
                advancements: Some(advancements),
                playtime_seconds: Some(playtime),
            },
        )])
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_add_player_insert_and_existing() {
        let (_temp_dir, repo) = setup_test_db().await;

        let outcome = repo.add_player("Steve", "123456789").await.unwrap();
        assert_eq!(outcome, AddPlayerOutcome::Added);

        let outcome = repo.add_player("steve", "987654321").await.unwrap();
        assert_eq!(outcome, AddPlayerOutcome::AlreadyExists);

        let record = repo.get_player_stats("Steve").await.unwrap().unwrap();
        assert_eq!(record.linked_account.as_deref(), Some("123456789"));
        assert_eq!(record.deaths, 0);
        assert_eq!(record.advancements, 0);
        assert_eq!(record.playtime_seconds, 0);
    }

    #[tokio::test]
    async fn test_get_player_stats() {
        let (_temp_dir, repo) = setup_test_db().await;
        seed(&repo, "Alex", 3, 17, 7200).await;

        let record = repo.get_player_stats("ALEX").await.unwrap().unwrap();
        assert_eq!(record.minecraft_username, "Alex");
        assert_eq!(record.deaths, 3);
        assert_eq!(record.advancements, 17);
        assert_eq!(record.playtime_seconds, 7200);

        assert!(repo.get_player_stats("NonExistentPlayer").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ordered_stat_queries() {
        let (_temp_dir, repo) = setup_test_db().await;
        seed(&repo, "Alice", 5, 10, 300).await;
        seed(&repo, "Bob", 1, 30, 9000).await;
        seed(&repo, "Charlie", 9, 20, 600).await;

        let deaths: Vec<u64> = repo.get_all_deaths().await.unwrap().iter().map(|e| e.value).collect();
        assert_eq!(deaths, vec![1, 5, 9]);

        let advancements = repo.get_all_advancements().await.unwrap();
        assert_eq!(advancements[0].minecraft_username, "Bob");
        assert_eq!(advancements.iter().map(|e| e.value).collect::<Vec<_>>(), vec![30, 20, 10]);

        let playtimes = repo.get_all_playtimes().await.unwrap();
        assert_eq!(playtimes.iter().map(|e| e.value).collect::<Vec<_>>(), vec![9000, 600, 300]);
        assert_eq!(playtimes[0].linked_account.as_deref(), Some("bob_discord"));
    }

    #[tokio::test]
    async fn test_get_all_players() {
        let (_temp_dir, repo) = setup_test_db().await;

        // Initially empty
        assert!(repo.get_all_players().await.unwrap().is_empty());

        seed(&repo, "Charlie", 0, 0, 0).await;
        seed(&repo, "Alice", 0, 0, 0).await;
        seed(&repo, "Bob", 0, 0, 0).await;

        let players = repo.get_all_players().await.unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.minecraft_username.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);

        let via_trait = repo.all_players().await.unwrap();
        assert_eq!(via_trait, players);
    }

    #[tokio::test]
    async fn test_bulk_update_only_touches_named_fields() {
        let (_temp_dir, repo) = setup_test_db().await;
        seed(&repo, "Alice", 5, 10, 300).await;
        seed(&repo, "Bob", 1, 30, 9000).await;

        let updated = repo
            .bulk_update_history(vec![
                ("alice".to_string(), StatUpdate { deaths: Some(6), ..Default::default() }),
                ("Bob".to_string(), StatUpdate { playtime_seconds: Some(10_000), ..Default::default() }),
                ("Nobody".to_string(), StatUpdate { deaths: Some(1), ..Default::default() }),
                ("Alice".to_string(), StatUpdate::default()),
            ])
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let alice = repo.get_player_stats("Alice").await.unwrap().unwrap();
        assert_eq!((alice.deaths, alice.advancements, alice.playtime_seconds), (6, 10, 300));

        let bob = repo.get_player_stats("Bob").await.unwrap().unwrap();
        assert_eq!((bob.deaths, bob.advancements, bob.playtime_seconds), (1, 30, 10_000));
    }

    #[tokio::test]
    async fn test_delete_player() {
        let (_temp_dir, repo) = setup_test_db().await;
        seed(&repo, "DeleteTestPlayer", 0, 0, 0).await;

        assert!(repo.delete_player("DeleteTestPlayer").await.unwrap());
        assert!(repo.get_player_stats("DeleteTestPlayer").await.unwrap().is_none());

        // Deleting non-existent player should not error
        assert!(!repo.delete_player("DeleteTestPlayer").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreadable_database_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        // Only init_db creates parent directories.
        let missing = temp_dir.path().join("missing").join("stats.db");
        let repo = PlayerRepository::new(missing.to_str().unwrap().to_string());
        assert!(repo.get_all_players().await.is_err());
    }
}
