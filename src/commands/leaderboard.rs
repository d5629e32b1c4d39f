//! Leaderboard command.

use crate::database::StatEntry;
use crate::types::{Context, Error};
use crate::utils::validation::format_playtime;

const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum LeaderboardStat {
    #[name = "Most deaths"]
    Deaths,
    #[name = "Most advancements"]
    Advancements,
    #[name = "Most playtime"]
    Playtime,
}

impl LeaderboardStat {
    fn title(self) -> &'static str {
        match self {
            LeaderboardStat::Deaths => "💀 Most Deaths",
            LeaderboardStat::Advancements => "👑 Most Advancements",
            LeaderboardStat::Playtime => "🕒 Most Playtime",
        }
    }

    fn format_value(self, value: u64) -> String {
        match self {
            LeaderboardStat::Deaths => format!("{} deaths", value),
            LeaderboardStat::Advancements => format!("{} advancements", value),
            LeaderboardStat::Playtime => format_playtime(value),
        }
    }
}

/// Render the top entries. `entries` must already be sorted best first.
fn render_leaderboard(stat: LeaderboardStat, entries: &[StatEntry]) -> String {
    if entries.is_empty() {
        return format!("**{}**\nNo players recorded yet.", stat.title());
    }

    let mut lines = vec![format!("**{}**", stat.title())];
    for (rank, entry) in entries.iter().take(LEADERBOARD_SIZE).enumerate() {
        lines.push(format!(
            "{}. `{}` - {}",
            rank + 1,
            entry.minecraft_username,
            stat.format_value(entry.value)
        ));
    }
    lines.join("\n")
}

/// Show the top players for a statistic.
#[poise::command(slash_command)]
pub async fn leaderboard(
    context: Context<'_>,
    #[description = "Statistic to rank by"]
    stat: LeaderboardStat,
) -> Result<(), Error> {
    let repo = context.data().player_repository();

    let entries = match stat {
        LeaderboardStat::Deaths => {
            // Stored lowest first
            let mut deaths = repo.get_all_deaths().await?;
            deaths.reverse();
            deaths
        }
        LeaderboardStat::Advancements => repo.get_all_advancements().await?,
        LeaderboardStat::Playtime => repo.get_all_playtimes().await?,
    };

    context.say(render_leaderboard(stat, &entries)).await?;
    Ok(())
}
