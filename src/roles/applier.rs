//! Executing a reconciliation plan against the rate-limited role API.
//!
//! Operations run strictly one at a time. A successful call is followed by a
//! short delay; a rate-limit signal costs a longer pause and the operation is
//! dropped for this run. No failure stops the batch.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::guild::{GuildDirectory, RoleMutationError};
use super::plan::{ReconciliationPlan, RoleChange, RoleOperation};

/// Timing policy for role mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyPolicy {
    /// Pause after every successful call.
    pub call_delay: Duration,
    /// Pause after the API reports a rate limit.
    pub rate_limit_backoff: Duration,
}

impl Default for ApplyPolicy {
    fn default() -> Self {
        Self {
            call_delay: Duration::from_millis(1500),
            rate_limit_backoff: Duration::from_secs(5),
        }
    }
}

/// Spaces out calls to an API with a fixed delay and rate-limit backoff.
#[derive(Debug)]
pub struct Pacer {
    policy: ApplyPolicy,
    rate_limit_pauses: u32,
}

impl Pacer {
    pub fn new(policy: ApplyPolicy) -> Self {
        Self {
            policy,
            rate_limit_pauses: 0,
        }
    }

    /// Await `call`, then sleep according to its result.
    pub async fn call<F>(&mut self, call: F) -> Result<(), RoleMutationError>
    where
        F: Future<Output = Result<(), RoleMutationError>>,
    {
        let result = call.await;

        match &result {
            Ok(()) => tokio::time::sleep(self.policy.call_delay).await,
            Err(RoleMutationError::RateLimited) => {
                self.rate_limit_pauses += 1;
                tokio::time::sleep(self.policy.rate_limit_backoff).await;
            }
            Err(_) => {}
        }

        result
    }

    pub fn rate_limit_pauses(&self) -> u32 {
        self.rate_limit_pauses
    }
}

/// Terminal state of a single planned operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    /// The mutation went through.
    Applied,
    /// Re-check showed nothing to do (or the member left).
    Skipped,
    /// Rate limited; left for the next run.
    Deferred,
    /// Permission or transport failure.
    Failed,
}

/// Counters for one application pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationOutcome {
    pub changes_applied: u32,
    pub rate_limit_pauses: u32,
    pub skipped: u32,
    pub failed: u32,
}

async fn apply_operation<G>(guild: &G, pacer: &mut Pacer, op: &RoleOperation) -> OperationState
where
    G: GuildDirectory + ?Sized,
{
    let current = match guild.member_roles(op.member).await {
        Ok(Some(roles)) => roles,
        Ok(None) => {
            debug!(member = %op.member, name = %op.member_name, role = %op.role.name, "Member left before change, skipping");
            return OperationState::Skipped;
        }
        Err(e) => {
            error!(member = %op.member, name = %op.member_name, role = %op.role.name, error = %e, "Could not re-check member roles");
            return OperationState::Failed;
        }
    };

    let holds = current.contains(&op.role.id);
    let needed = match op.change {
        RoleChange::Grant => !holds,
        RoleChange::Revoke => holds,
    };
    if !needed {
        debug!(member = %op.member, name = %op.member_name, role = %op.role.name, "Role already correct, skipping");
        return OperationState::Skipped;
    }

    let reason = op.change.reason();
    let result = match op.change {
        RoleChange::Grant => pacer.call(guild.grant_role(op.member, op.role.id, reason)).await,
        RoleChange::Revoke => pacer.call(guild.revoke_role(op.member, op.role.id, reason)).await,
    };
    let action = match op.change {
        RoleChange::Grant => "adding",
        RoleChange::Revoke => "removing",
    };

    match result {
        Ok(()) => {
            info!(member = %op.member, name = %op.member_name, role = %op.role.name, change = ?op.change, "Role updated");
            OperationState::Applied
        }
        Err(RoleMutationError::RateLimited) => {
            warn!(member = %op.member, name = %op.member_name, role = %op.role.name, "Rate limited {} role, pausing", action);
            OperationState::Deferred
        }
        Err(RoleMutationError::PermissionDenied(detail)) => {
            error!(
                member = %op.member,
                name = %op.member_name,
                role = %op.role.name,
                category = %op.category,
                %detail,
                "Permission error {} role",
                action
            );
            OperationState::Failed
        }
        Err(RoleMutationError::Transport(detail)) => {
            error!(
                member = %op.member,
                name = %op.member_name,
                role = %op.role.name,
                category = %op.category,
                %detail,
                "Unexpected error {} role",
                action
            );
            OperationState::Failed
        }
    }
}

/// Run every operation of `plan` once, in order.
pub async fn apply_plan<G>(guild: &G, plan: &ReconciliationPlan, policy: ApplyPolicy) -> ApplicationOutcome
where
    G: GuildDirectory + ?Sized,
{
    let mut pacer = Pacer::new(policy);
    let mut outcome = ApplicationOutcome::default();

    for op in plan.operations() {
        match apply_operation(guild, &mut pacer, &op).await {
            OperationState::Applied => outcome.changes_applied += 1,
            OperationState::Skipped => outcome.skipped += 1,
            OperationState::Failed => outcome.failed += 1,
            OperationState::Deferred => {}
        }
    }

    outcome.rate_limit_pauses = pacer.rate_limit_pauses();
    outcome
}
