//! Capabilities the role engine needs from the outside world.
//!
//! The engine never talks to Discord or SQLite directly. It is handed a
//! [`StatsSource`] and a [`GuildDirectory`] and works on plain snapshots of
//! what they return.

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;

use crate::database::PlayerRecord;
use crate::error::Result;

/// Discord user id of a guild member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(pub u64);

/// Discord role id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoleId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a guild member taken at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub id: MemberId,
    /// Account username (unique on Discord).
    pub username: String,
    /// `name#1234` for legacy accounts, plain username otherwise.
    pub tag: String,
    /// Nickname or global display name, carried into role-change logs.
    pub display_name: String,
    pub roles: BTreeSet<RoleId>,
}

impl GuildMember {
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }
}

/// A role as listed by the guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRole {
    pub id: RoleId,
    pub name: String,
}

/// Why a role grant or revoke did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleMutationError {
    /// The API asked us to slow down.
    RateLimited,
    /// The bot lacks permission (role above ours, missing Manage Roles).
    PermissionDenied(String),
    /// Anything else: network, unexpected status, serialization.
    Transport(String),
}

impl fmt::Display for RoleMutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::PermissionDenied(detail) => write!(f, "permission denied: {}", detail),
            Self::Transport(detail) => write!(f, "transport error: {}", detail),
        }
    }
}

impl std::error::Error for RoleMutationError {}

/// Read access to per-player statistics.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Every stored player record.
    async fn all_players(&self) -> Result<Vec<PlayerRecord>>;
}

/// Live guild state and the role-mutation API.
#[async_trait]
pub trait GuildDirectory: Send + Sync {
    /// All members of the guild with their current roles.
    async fn members(&self) -> Result<Vec<GuildMember>>;

    /// All roles defined in the guild.
    async fn roles(&self) -> Result<Vec<GuildRole>>;

    /// Current roles of one member, `None` if they are no longer in the guild.
    async fn member_roles(&self, member: MemberId) -> Result<Option<BTreeSet<RoleId>>>;

    async fn grant_role(
        &self,
        member: MemberId,
        role: RoleId,
        reason: &str,
    ) -> std::result::Result<(), RoleMutationError>;

    async fn revoke_role(
        &self,
        member: MemberId,
        role: RoleId,
        reason: &str,
    ) -> std::result::Result<(), RoleMutationError>;
}

/// Look up a role by its display name.
pub fn lookup_role_by_name<'a>(roles: &'a [GuildRole], name: &str) -> Option<&'a GuildRole> {
    roles.iter().find(|role| role.name == name)
}
