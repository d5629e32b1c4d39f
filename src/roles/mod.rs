//! Achievement role reconciliation.
//!
//! A run reads every player's stats, works out who should hold each
//! superlative role, diffs that against the guild's current role holders and
//! applies the difference one paced call at a time.
//!
//! The engine holds no lock of its own. Callers must not start a run while
//! another one is still in flight for the same guild.

mod applier;
mod category;
mod eligibility;
mod guild;
mod plan;
mod resolve;

pub mod discord;

#[cfg(test)]
pub(crate) mod testing;

pub use applier::{apply_plan, ApplicationOutcome, ApplyPolicy, OperationState, Pacer};
pub use category::RoleCategory;
pub use eligibility::{category_winners, compute_eligibility, EligibilityPolicy, EligibilitySet};
pub use guild::{
    lookup_role_by_name, GuildDirectory, GuildMember, GuildRole, MemberId, RoleId, RoleMutationError,
    StatsSource,
};
pub use plan::{CategoryPlan, ReconciliationPlan, RoleChange, RoleOperation};
pub use resolve::{resolve_account, AccountIdentifier};

use tracing::{info, warn};

use crate::error::{NamelessBotError, Result};

/// Policy values for a reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleSettings {
    pub thresholds: EligibilityPolicy,
    pub pacing: ApplyPolicy,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub changes_applied: u32,
    pub rate_limit_pauses: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Categories whose role is not defined in the guild.
    pub missing_roles: Vec<RoleCategory>,
}

/// Read stats and guild state, then build the plan for this run.
pub async fn plan_achievement_roles<S, G>(
    stats: &S,
    guild: &G,
    settings: &RoleSettings,
) -> Result<ReconciliationPlan>
where
    S: StatsSource + ?Sized,
    G: GuildDirectory + ?Sized,
{
    let records = stats
        .all_players()
        .await
        .map_err(|e| NamelessBotError::DataUnavailable(e.to_string()))?;

    let roles = guild.roles().await?;
    let members = guild.members().await?;

    let resolved: Vec<(RoleCategory, Option<GuildRole>)> = RoleCategory::ALL
        .iter()
        .map(|&category| (category, lookup_role_by_name(&roles, category.role_name()).cloned()))
        .collect();

    let present: Vec<RoleCategory> = resolved
        .iter()
        .filter(|(_, role)| role.is_some())
        .map(|(category, _)| *category)
        .collect();

    let eligible = compute_eligibility(&records, &members, &settings.thresholds, &present);
    let plan = ReconciliationPlan::build(&eligible, &resolved, &members);

    if !plan.missing_roles.is_empty() {
        let names: Vec<&str> = plan.missing_roles.iter().map(|c| c.role_name()).collect();
        warn!(missing = %names.join(", "), "Missing achievement roles in guild");
    }

    Ok(plan)
}

/// Bring the guild's achievement roles in line with current stats.
///
/// Only an unreadable stats source (or an unreadable guild) fails the run.
/// Per-member failures are logged and counted.
pub async fn reconcile_achievement_roles<S, G>(
    stats: &S,
    guild: &G,
    settings: &RoleSettings,
) -> Result<ReconcileSummary>
where
    S: StatsSource + ?Sized,
    G: GuildDirectory + ?Sized,
{
    info!("Starting achievement role update");

    let plan = plan_achievement_roles(stats, guild, settings).await?;

    info!(
        operations = plan.operations().len(),
        delay_ms = settings.pacing.call_delay.as_millis() as u64,
        "Applying role changes sequentially"
    );
    let outcome = apply_plan(guild, &plan, settings.pacing).await;

    if outcome.changes_applied > 0 {
        info!(changes = outcome.changes_applied, "Finished role update");
    } else {
        info!("No achievement role changes were needed in this cycle");
    }
    if outcome.rate_limit_pauses > 0 {
        warn!(pauses = outcome.rate_limit_pauses, "Rate limiting was encountered during the update");
    }

    Ok(ReconcileSummary {
        changes_applied: outcome.changes_applied,
        rate_limit_pauses: outcome.rate_limit_pauses,
        skipped: outcome.skipped,
        failed: outcome.failed,
        missing_roles: plan.missing_roles,
    })
}
