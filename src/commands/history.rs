//! Player history administration.
//!
//! Moderators can inspect, overwrite and delete stored player stats, either one
//! player at a time or in bulk by replying to a prompt.

use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::checks::is_moderator;
use crate::database::PlayerRecord;
use crate::types::{Context, Error};
use crate::utils::validation::{format_playtime, parse_bulk_update, parse_stat_assignments};

/// How long `/history bulk` waits for the reply.
const BULK_REPLY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Stay under Discord's 2000 character message limit, code fences included.
const MAX_CHUNK_CHARS: usize = 1900;

const BULK_INSTRUCTIONS: &str = "**Bulk Player History Update**\n\
Reply within 5 minutes with one line per player to change:\n\
```\n\
username1: deaths=5, advancements=10, playtime=3600\n\
username2: deaths=2\n\
```\n\
`playtime` is in seconds. Only the values you list are changed.";

fn bulk_line(record: &PlayerRecord) -> String {
    format!(
        "{}: deaths={}, advancements={}, playtime={}",
        record.minecraft_username, record.deaths, record.advancements, record.playtime_seconds
    )
}

/// Split lines into code-block messages no longer than `max` characters each.
fn chunk_lines(lines: &[String], max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        if !current.is_empty() && current.len() + line.len() + 1 > max {
            chunks.push(format!("```\n{}```", current));
            current.clear();
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.is_empty() {
        chunks.push(format!("```\n{}```", current));
    }

    chunks
}

fn describe(record: &PlayerRecord) -> String {
    format!(
        "**Player History: {}**\n\
        **Discord:** {}\n\
        **Deaths:** {}\n\
        **Advancements:** {}\n\
        **Playtime:** {} seconds ({})",
        record.minecraft_username,
        record.linked_account.as_deref().unwrap_or("Not linked"),
        record.deaths,
        record.advancements,
        record.playtime_seconds,
        format_playtime(record.playtime_seconds)
    )
}

/// View and edit stored player history.
#[poise::command(
    slash_command,
    guild_only,
    check = "is_moderator",
    subcommands("get", "set", "delete", "bulk"),
    subcommand_required
)]
pub async fn history(_context: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Show a player's stored stats.
#[poise::command(slash_command, guild_only, check = "is_moderator")]
async fn get(
    context: Context<'_>,
    #[description = "Minecraft username"]
    #[min_length = 1]
    #[max_length = 16]
    username: String,
) -> Result<(), Error> {
    match context.data().player_repository().get_player_stats(&username).await? {
        Some(record) => context.say(describe(&record)).await?,
        None => context.say(format!("Player {} not found in the database.", username)).await?,
    };
    Ok(())
}

/// Overwrite some of a player's stats.
#[poise::command(slash_command, guild_only, check = "is_moderator")]
async fn set(
    context: Context<'_>,
    #[description = "Minecraft username"]
    #[min_length = 1]
    #[max_length = 16]
    username: String,
    #[description = "Values to set, e.g. deaths=5 advancements=10 playtime=3600"]
    values: String,
) -> Result<(), Error> {
    let update = match parse_stat_assignments(&values) {
        Ok(update) => update,
        Err(e) => {
            context.say(format!("❌ {}", e)).await?;
            return Ok(());
        }
    };

    let repo = context.data().player_repository();
    let Some(record) = repo.get_player_stats(&username).await? else {
        context.say(format!("Player {} not found in the database.", username)).await?;
        return Ok(());
    };

    repo.bulk_update_history(vec![(record.minecraft_username.clone(), update)]).await?;
    info!(player = %record.minecraft_username, moderator = %context.author().name, "Player history updated");

    context
        .say(format!("✅ Successfully updated history for {}!", record.minecraft_username))
        .await?;
    Ok(())
}

/// Remove a player from the database.
#[poise::command(slash_command, guild_only, check = "is_moderator")]
async fn delete(
    context: Context<'_>,
    #[description = "Minecraft username"]
    #[min_length = 1]
    #[max_length = 16]
    username: String,
) -> Result<(), Error> {
    if context.data().player_repository().delete_player(&username).await? {
        info!(player = %username, moderator = %context.author().name, "Player deleted");
        context
            .say(format!("✅ Successfully deleted player {} from the database.", username))
            .await?;
    } else {
        context.say(format!("Player {} not found in the database.", username)).await?;
    }
    Ok(())
}

/// Show every player's stats and apply the changes sent in reply.
#[poise::command(slash_command, guild_only, check = "is_moderator")]
async fn bulk(context: Context<'_>) -> Result<(), Error> {
    let repo = context.data().player_repository();
    let players = repo.get_all_players().await?;

    context.say(BULK_INSTRUCTIONS).await?;

    let lines: Vec<String> = players.iter().map(bulk_line).collect();
    if lines.is_empty() {
        context.say("_No players recorded yet._").await?;
    }
    for chunk in chunk_lines(&lines, MAX_CHUNK_CHARS) {
        context.say(chunk).await?;
    }

    let reply = serenity::MessageCollector::new(context.serenity_context())
        .author_id(context.author().id)
        .channel_id(context.channel_id())
        .timeout(BULK_REPLY_TIMEOUT)
        .next()
        .await;

    let Some(reply) = reply else {
        context.say("Timed out waiting for response.").await?;
        return Ok(());
    };

    let parsed = parse_bulk_update(&reply.content);
    let mut problems = parsed.errors;
    let mut updates = Vec::new();

    for (username, update) in parsed.updates {
        match players.iter().find(|p| p.minecraft_username.eq_ignore_ascii_case(&username)) {
            Some(player) => updates.push((player.minecraft_username.clone(), update)),
            None => problems.push(format!("Unknown username: {}", username)),
        }
    }

    for problem in &problems {
        context.say(format!("⚠️ {}", problem)).await?;
    }

    if updates.is_empty() {
        context.say("No valid updates provided.").await?;
        return Ok(());
    }

    let updated = repo.bulk_update_history(updates).await?;
    info!(players = updated, moderator = %context.author().name, "Bulk player history update");
    context
        .say(format!("✅ Successfully updated history for {} players!", updated))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_lines_respects_limit() {
        let lines: Vec<String> = (0..100).map(|i| format!("Player_{:03}: deaths=1, advancements=2, playtime=3", i)).collect();
        let chunks = chunk_lines(&lines, 500);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.starts_with("```\n") && chunk.ends_with("```"));
            assert!(chunk.len() <= 500 + 8);
        }
        let rejoined: usize = chunks.iter().map(|c| c.lines().filter(|l| l.starts_with("Player_")).count()).sum();
        assert_eq!(rejoined, 100);
    }

    #[test]
    fn test_chunk_lines_empty() {
        assert!(chunk_lines(&[], 100).is_empty());
    }

    #[test]
    fn test_bulk_line_round_trips_through_parser() {
        let record = PlayerRecord {
            minecraft_username: "Block_Builder".to_string(),
            linked_account: None,
            deaths: 3,
            advancements: 41,
            playtime_seconds: 7200,
        };
        let parsed = parse_bulk_update(&bulk_line(&record));

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.updates[0].0, "Block_Builder");
        assert_eq!(parsed.updates[0].1.advancements, Some(41));
    }

    #[test]
    fn test_describe_unlinked_player() {
        let record = PlayerRecord {
            minecraft_username: "Steve".to_string(),
            linked_account: None,
            deaths: 0,
            advancements: 0,
            playtime_seconds: 5400,
        };
        let text = describe(&record);
        assert!(text.contains("Not linked"));
        assert!(text.contains("1h 30m"));
    }
}
