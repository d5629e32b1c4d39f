//! Discord bot commands.
//!
//! This module contains all available bot commands organized by functionality.

mod checks;

pub mod ping;
pub mod updateroles;
pub mod history;
pub mod whitelist;
pub mod leaderboard;

pub use ping::ping;
pub use updateroles::updateroles;
pub use history::history;
pub use whitelist::whitelist;
pub use leaderboard::leaderboard;
