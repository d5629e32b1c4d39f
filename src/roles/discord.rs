//! Discord-backed [`GuildDirectory`] over serenity's HTTP client.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;

use super::guild::{GuildDirectory, GuildMember, GuildRole, MemberId, RoleId, RoleMutationError};
use crate::error::Result;

/// Discord's maximum page size for the list-members endpoint.
const MEMBER_PAGE_SIZE: u64 = 1000;

/// A single guild, reached through the bot's HTTP client.
#[derive(Clone)]
pub struct DiscordGuild {
    http: Arc<serenity::Http>,
    guild_id: serenity::GuildId,
}

impl DiscordGuild {
    pub fn new(http: Arc<serenity::Http>, guild_id: serenity::GuildId) -> Self {
        Self { http, guild_id }
    }
}

impl From<&serenity::Member> for GuildMember {
    fn from(member: &serenity::Member) -> Self {
        Self {
            id: MemberId(member.user.id.get()),
            username: member.user.name.clone(),
            tag: member.user.tag(),
            display_name: member.display_name().to_string(),
            roles: member.roles.iter().map(|r| RoleId(r.get())).collect(),
        }
    }
}

/// HTTP status of a failed Discord request, if it got that far.
fn status_code(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)) => {
            Some(response.status_code.as_u16())
        }
        _ => None,
    }
}

/// Sort a failed role call into rate limit, permission, or transport.
pub fn classify_mutation_error(err: serenity::Error) -> RoleMutationError {
    match status_code(&err) {
        Some(429) => RoleMutationError::RateLimited,
        Some(403) => RoleMutationError::PermissionDenied(err.to_string()),
        _ => RoleMutationError::Transport(err.to_string()),
    }
}

#[async_trait]
impl GuildDirectory for DiscordGuild {
    async fn members(&self) -> Result<Vec<GuildMember>> {
        let mut members = Vec::new();
        let mut after: Option<u64> = None;

        loop {
            let page = self
                .http
                .get_guild_members(self.guild_id, Some(MEMBER_PAGE_SIZE), after)
                .await?;
            let full_page = page.len() as u64 == MEMBER_PAGE_SIZE;
            after = page.last().map(|m| m.user.id.get());
            members.extend(page.iter().map(GuildMember::from));

            if !full_page {
                break;
            }
        }

        Ok(members)
    }

    async fn roles(&self) -> Result<Vec<GuildRole>> {
        let roles = self.http.get_guild_roles(self.guild_id).await?;
        Ok(roles
            .into_iter()
            .map(|role| GuildRole {
                id: RoleId(role.id.get()),
                name: role.name,
            })
            .collect())
    }

    async fn member_roles(&self, member: MemberId) -> Result<Option<BTreeSet<RoleId>>> {
        match self.http.get_member(self.guild_id, serenity::UserId::new(member.0)).await {
            Ok(m) => Ok(Some(m.roles.iter().map(|r| RoleId(r.get())).collect())),
            Err(e) if status_code(&e) == Some(404) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn grant_role(
        &self,
        member: MemberId,
        role: RoleId,
        reason: &str,
    ) -> std::result::Result<(), RoleMutationError> {
        self.http
            .add_member_role(
                self.guild_id,
                serenity::UserId::new(member.0),
                serenity::RoleId::new(role.0),
                Some(reason),
            )
            .await
            .map_err(classify_mutation_error)
    }

    async fn revoke_role(
        &self,
        member: MemberId,
        role: RoleId,
        reason: &str,
    ) -> std::result::Result<(), RoleMutationError> {
        self.http
            .remove_member_role(
                self.guild_id,
                serenity::UserId::new(member.0),
                serenity::RoleId::new(role.0),
                Some(reason),
            )
            .await
            .map_err(classify_mutation_error)
    }
}
