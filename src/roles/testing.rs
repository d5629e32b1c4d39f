//! In-memory collaborators for exercising the role engine in tests.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use super::guild::{GuildDirectory, GuildMember, GuildRole, MemberId, RoleId, RoleMutationError, StatsSource};
use super::plan::RoleChange;
use crate::database::PlayerRecord;
use crate::error::{NamelessBotError, Result};

/// A recorded grant or revoke attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationCall {
    pub member: MemberId,
    pub role: RoleId,
    pub change: RoleChange,
    pub reason: String,
}

/// Guild whose state lives in memory. Successful mutations update it.
#[derive(Default)]
pub struct FakeGuild {
    roles: Vec<GuildRole>,
    members: Mutex<BTreeMap<MemberId, GuildMember>>,
    calls: Mutex<Vec<MutationCall>>,
    /// 1-based call index -> error returned for that call
    failures: Mutex<HashMap<usize, RoleMutationError>>,
}

impl FakeGuild {
    /// Guild with roles of the given ids, named after nothing in particular.
    pub fn new(role_ids: &[u64]) -> Self {
        Self {
            roles: role_ids
                .iter()
                .map(|id| GuildRole {
                    id: RoleId(*id),
                    name: format!("role-{}", id),
                })
                .collect(),
            ..Default::default()
        }
    }

    /// Guild with the given named roles.
    pub fn with_roles(roles: Vec<GuildRole>) -> Self {
        Self {
            roles,
            ..Default::default()
        }
    }

    /// Add a member whose username and tag are `user<id>`.
    pub fn add_member(&self, id: u64, roles: &[u64]) {
        let member = GuildMember {
            id: MemberId(id),
            username: format!("user{}", id),
            tag: format!("user{}", id),
            display_name: format!("User {}", id),
            roles: roles.iter().map(|r| RoleId(*r)).collect(),
        };
        self.members.lock().unwrap().insert(member.id, member);
    }

    pub fn fail_call(&self, index: usize, error: RoleMutationError) {
        self.failures.lock().unwrap().insert(index, error);
    }

    pub fn calls(&self) -> Vec<MutationCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn member_has_role(&self, member: u64, role: u64) -> bool {
        self.members
            .lock()
            .unwrap()
            .get(&MemberId(member))
            .is_some_and(|m| m.has_role(RoleId(role)))
    }

    fn mutate(
        &self,
        member: MemberId,
        role: RoleId,
        change: RoleChange,
        reason: &str,
    ) -> std::result::Result<(), RoleMutationError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(MutationCall {
                member,
                role,
                change,
                reason: reason.to_string(),
            });
            calls.len()
        };

        if let Some(error) = self.failures.lock().unwrap().remove(&index) {
            return Err(error);
        }

        let mut members = self.members.lock().unwrap();
        let Some(target) = members.get_mut(&member) else {
            return Err(RoleMutationError::Transport("Unknown Member".to_string()));
        };
        match change {
            RoleChange::Grant => target.roles.insert(role),
            RoleChange::Revoke => target.roles.remove(&role),
        };
        Ok(())
    }
}

#[async_trait]
impl GuildDirectory for FakeGuild {
    async fn members(&self) -> Result<Vec<GuildMember>> {
        Ok(self.members.lock().unwrap().values().cloned().collect())
    }

    async fn roles(&self) -> Result<Vec<GuildRole>> {
        Ok(self.roles.clone())
    }

    async fn member_roles(&self, member: MemberId) -> Result<Option<BTreeSet<RoleId>>> {
        Ok(self.members.lock().unwrap().get(&member).map(|m| m.roles.clone()))
    }

    async fn grant_role(
        &self,
        member: MemberId,
        role: RoleId,
        reason: &str,
    ) -> std::result::Result<(), RoleMutationError> {
        self.mutate(member, role, RoleChange::Grant, reason)
    }

    async fn revoke_role(
        &self,
        member: MemberId,
        role: RoleId,
        reason: &str,
    ) -> std::result::Result<(), RoleMutationError> {
        self.mutate(member, role, RoleChange::Revoke, reason)
    }
}

/// Stats source backed by a fixed list, or failing on every read.
pub struct FakeStats {
    pub records: Mutex<Vec<PlayerRecord>>,
    pub unavailable: bool,
}

impl FakeStats {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            unavailable: true,
        }
    }
}

#[async_trait]
impl StatsSource for FakeStats {
    async fn all_players(&self) -> Result<Vec<PlayerRecord>> {
        if self.unavailable {
            return Err(NamelessBotError::Database("unable to open database file".to_string()));
        }
        Ok(self.records.lock().unwrap().clone())
    }
}
