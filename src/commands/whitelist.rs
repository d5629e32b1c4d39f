//! Whitelist command.
//!
//! Links a Discord member to a Minecraft account in the database and grants
//! the whitelist role.

use poise::serenity_prelude as serenity;
use tracing::{info, warn};

use crate::commands::checks::is_moderator;
use crate::database::AddPlayerOutcome;
use crate::mojang;
use crate::roles::discord::classify_mutation_error;
use crate::roles::RoleMutationError;
use crate::types::{Context, Error};
use crate::utils::validation::validate_minecraft_username;

/// Whitelist a player: store them in the database and give them the whitelist role.
#[poise::command(slash_command, guild_only, check = "is_moderator")]
pub async fn whitelist(
    context: Context<'_>,
    #[description = "Discord member to whitelist"]
    member: serenity::Member,
    #[description = "Minecraft username"]
    #[min_length = 1]
    #[max_length = 16]
    minecraft_username: String,
) -> Result<(), Error> {
    if let Err(e) = validate_minecraft_username(&minecraft_username) {
        context.say(format!("❌ {}", e)).await?;
        return Ok(());
    }

    context.defer().await?;

    // Store the canonical capitalisation when Mojang knows the account
    let username = match mojang::fetch_profile(&context.data().http_client, &minecraft_username).await {
        Ok(Some(profile)) => profile.name,
        Ok(None) => {
            context
                .say(format!("❌ Minecraft player `{}` not found! Make sure the username is correct.", minecraft_username))
                .await?;
            return Ok(());
        }
        Err(e) => {
            context.say(format!("❌ Failed to connect to Mojang API: {}", e)).await?;
            return Ok(());
        }
    };

    let mention = format!("<@{}>", member.user.id);
    let mut message_parts = Vec::new();

    match context
        .data()
        .player_repository()
        .add_player(&username, &member.user.id.to_string())
        .await
    {
        Ok(AddPlayerOutcome::Added) => {
            info!(player = %username, member = %member.user.id, "Player whitelisted");
            message_parts.push(format!("Player `{}` (linked to {}) successfully added to the database.", username, mention));
        }
        Ok(AddPlayerOutcome::AlreadyExists) => {
            message_parts.push(format!("Player `{}` (linked to {}) already exists in the database.", username, mention));
        }
        Err(e) => {
            context
                .say(format!("❌ Error interacting with the database for player `{}`: {}", username, e))
                .await?;
            return Ok(());
        }
    }

    let whitelist_role = serenity::RoleId::new(context.data().config.whitelist_role_id);
    if member.roles.contains(&whitelist_role) {
        message_parts.push(format!("{} already has the whitelist role.", mention));
    } else {
        let reason = format!("Whitelisted by {}", context.author().name);
        let result = context
            .http()
            .add_member_role(member.guild_id, member.user.id, whitelist_role, Some(&reason))
            .await
            .map_err(classify_mutation_error);

        match result {
            Ok(()) => message_parts.push(format!("✅ Successfully assigned the whitelist role to {}.", mention)),
            Err(RoleMutationError::PermissionDenied(_)) => {
                warn!(member = %member.user.id, "Missing permission to assign whitelist role");
                message_parts.push(
                    "❌ I don't have permission to assign roles. Player is in the database but role was not assigned."
                        .to_string(),
                );
            }
            Err(e) => {
                warn!(member = %member.user.id, error = %e, "Failed to assign whitelist role");
                message_parts.push(format!(
                    "❌ Error assigning role: {}. Player is in the database but role was not assigned.",
                    e
                ));
            }
        }
    }

    context.say(message_parts.join("\n")).await?;
    Ok(())
}
