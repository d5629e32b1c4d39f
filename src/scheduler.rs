//! Periodic achievement role updates.
//!
//! Each tick tries to take the shared run guard; if a manual `/updateroles`
//! (or a slow previous tick) still holds it, the tick is skipped.

use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::database::PlayerRepository;
use crate::roles::discord::DiscordGuild;
use crate::roles::{reconcile_achievement_roles, GuildDirectory, ReconcileSummary, RoleSettings, StatsSource};

/// Run one reconciliation unless another run holds `guard`.
///
/// Returns `None` when the tick was skipped or the run failed.
pub async fn scheduled_tick<S, G>(
    stats: &S,
    guild: &G,
    settings: &RoleSettings,
    guard: &Mutex<()>,
) -> Option<ReconcileSummary>
where
    S: StatsSource + ?Sized,
    G: GuildDirectory + ?Sized,
{
    let Ok(_running) = guard.try_lock() else {
        info!("Achievement role update already in progress, skipping scheduled tick");
        return None;
    };

    match reconcile_achievement_roles(stats, guild, settings).await {
        Ok(summary) => Some(summary),
        Err(e) => {
            error!(error = %e, "Scheduled achievement role update failed");
            None
        }
    }
}

/// Spawn the background task reconciling `guild_id` every `period`.
pub fn spawn_role_schedule(
    http: Arc<serenity::Http>,
    guild_id: serenity::GuildId,
    repo: PlayerRepository,
    settings: RoleSettings,
    period: Duration,
    guard: Arc<Mutex<()>>,
) -> JoinHandle<()> {
    info!(guild = %guild_id, period_secs = period.as_secs(), "Scheduling achievement role updates");

    tokio::spawn(async move {
        let guild = DiscordGuild::new(http, guild_id);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            scheduled_tick(&repo, &guild, &settings, &guard).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::PlayerRecord;
    use crate::roles::testing::{FakeGuild, FakeStats};
    use crate::roles::{GuildRole, RoleCategory, RoleId};

    fn guild_with_most_deaths_role() -> FakeGuild {
        let guild = FakeGuild::with_roles(vec![GuildRole {
            id: RoleId(10),
            name: RoleCategory::MostDeaths.role_name().to_string(),
        }]);
        guild.add_member(1, &[]);
        guild
    }

    fn stats() -> FakeStats {
        FakeStats::new(vec![PlayerRecord {
            minecraft_username: "Steve".to_string(),
            linked_account: Some("1".to_string()),
            deaths: 4,
            advancements: 0,
            playtime_seconds: 0,
        }])
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_runs_when_idle() {
        let guild = guild_with_most_deaths_role();
        let guard = Mutex::new(());

        let summary = scheduled_tick(&stats(), &guild, &RoleSettings::default(), &guard).await;

        assert_eq!(summary.map(|s| s.changes_applied), Some(1));
        assert!(guild.member_has_role(1, 10));
        assert!(guard.try_lock().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_skips_while_a_run_is_in_flight() {
        let guild = guild_with_most_deaths_role();
        let guard = Mutex::new(());
        let _manual_run = guard.lock().await;

        let summary = scheduled_tick(&stats(), &guild, &RoleSettings::default(), &guard).await;

        assert!(summary.is_none());
        assert!(guild.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_survives_unavailable_stats() {
        let guild = guild_with_most_deaths_role();
        let guard = Mutex::new(());

        let summary = scheduled_tick(&FakeStats::unavailable(), &guild, &RoleSettings::default(), &guard).await;

        assert!(summary.is_none());
        assert!(guild.calls().is_empty());
    }
}
