//! Permission checks shared by admin commands.

use poise::serenity_prelude as serenity;

use crate::types::{Context, Error};

/// Allow only members holding the configured moderator role.
pub async fn is_moderator(context: Context<'_>) -> Result<bool, Error> {
    let mod_role = serenity::RoleId::new(context.data().config.mod_role_id);

    let allowed = match context.author_member().await {
        Some(member) => member.roles.contains(&mod_role),
        None => false,
    };

    if !allowed {
        context
            .send(
                poise::CreateReply::default()
                    .content("You don't have permission to use this command.")
                    .ephemeral(true),
            )
            .await?;
    }

    Ok(allowed)
}
