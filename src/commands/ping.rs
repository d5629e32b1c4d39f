//! Ping command for bot health check.

use std::time::Duration;

use crate::types::{Context, Error};

fn health_message(latency: Duration, players: Option<usize>) -> String {
    let database = match players {
        Some(count) => format!("✅ {} player(s) tracked", count),
        None => "❌ unreachable".to_string(),
    };
    format!(
        "Pong! 🏓\n**Gateway latency:** {} ms\n**Database:** {}",
        latency.as_millis(),
        database
    )
}

/// Check that the bot and its database are responsive.
#[poise::command(slash_command)]
pub async fn ping(context: Context<'_>) -> Result<(), Error> {
    let players = context.data().player_repository().get_all_players().await.ok().map(|p| p.len());
    context.say(health_message(context.ping().await, players)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_message() {
        let healthy = health_message(Duration::from_millis(42), Some(3));
        assert!(healthy.contains("42 ms"));
        assert!(healthy.contains("3 player(s)"));

        assert!(health_message(Duration::ZERO, None).contains("unreachable"));
    }
}
