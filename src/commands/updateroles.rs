//! Manual achievement role update.

use crate::commands::checks::is_moderator;
use crate::roles::discord::DiscordGuild;
use crate::roles::{reconcile_achievement_roles, ReconcileSummary};
use crate::types::{Context, Error};

fn summary_message(summary: &ReconcileSummary) -> String {
    let mut message = if summary.changes_applied == 0 {
        "✅ Achievement roles are already up to date.".to_string()
    } else {
        format!("✅ Applied {} achievement role change(s).", summary.changes_applied)
    };

    if summary.rate_limit_pauses > 0 {
        message.push_str(&format!(
            "\n⏳ Rate limited {} time(s); those changes will be retried on the next update.",
            summary.rate_limit_pauses
        ));
    }
    if summary.failed > 0 {
        message.push_str(&format!("\n⚠️ {} change(s) failed. Check the logs.", summary.failed));
    }
    if !summary.missing_roles.is_empty() {
        let names: Vec<&str> = summary.missing_roles.iter().map(|c| c.role_name()).collect();
        message.push_str(&format!("\n⚠️ Missing roles: {}", names.join(", ")));
    }

    message
}

/// Recompute and apply the achievement roles for this server.
#[poise::command(slash_command, guild_only, check = "is_moderator")]
pub async fn updateroles(context: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(());
    };

    let Ok(_running) = context.data().role_run_guard.try_lock() else {
        context.say("⏳ An achievement role update is already running.").await?;
        return Ok(());
    };

    // Paced role calls take a while
    context.defer().await?;

    let guild = DiscordGuild::new(context.serenity_context().http.clone(), guild_id);
    let repo = context.data().player_repository();

    match reconcile_achievement_roles(&repo, &guild, &context.data().config.role_settings).await {
        Ok(summary) => {
            context.say(summary_message(&summary)).await?;
        }
        Err(e) => {
            context.say(format!("❌ Role update failed: {}", e)).await?;
        }
    }

    Ok(())
}
