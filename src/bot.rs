use crate::commands::{history, leaderboard, ping, updateroles, whitelist};
use crate::config::Config;
use crate::database;
use crate::scheduler::spawn_role_schedule;
use crate::types::{Data, Error};
use poise::serenity_prelude as serenity;
use tracing::{error, info};

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!(error = %error, "Failed to start the bot");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().qualified_name, error = %error, "Command failed");
            if let Err(e) = ctx.say(format!("❌ {}", error)).await {
                error!(error = %e, "Failed to send error reply");
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!(error = %e, "Error while handling error");
            }
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    // Member listing and the bulk history reply need the privileged intents
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    // Initialize DB (creates file and tables if needed)
    database::init_db(&config.db_path).await?;

    let token = config.discord_token.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![ping(), updateroles(), history(), whitelist(), leaderboard()],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |context, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(context, &framework.options().commands).await?;
                info!(user = %ready.user.name, "Bot connected");

                let data = Data::new(config);

                match data.config.guild_id {
                    Some(guild_id) if !data.config.role_update_interval.is_zero() => {
                        spawn_role_schedule(
                            context.http.clone(),
                            serenity::GuildId::new(guild_id),
                            data.player_repository(),
                            data.config.role_settings,
                            data.config.role_update_interval,
                            data.role_run_guard.clone(),
                        );
                    }
                    _ => info!("No GUILD_ID or zero interval, scheduled role updates disabled"),
                }

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents).framework(framework).await?;

    client.start().await?;

    Ok(())
}
