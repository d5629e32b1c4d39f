//! Who should hold each achievement role, computed from raw stats.
//!
//! Everything here is pure: the functions take a stats snapshot and a member
//! snapshot and never touch the network.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::category::RoleCategory;
use super::guild::{GuildMember, MemberId};
use super::resolve::resolve_account;
use crate::database::PlayerRecord;

/// Thresholds gating the "least" categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    /// Minimum playtime (seconds) before a player can earn least_deaths.
    pub least_deaths_min_playtime: u64,
    /// Minimum playtime (seconds) for least_advancements and least_playtime.
    pub least_min_playtime: u64,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            least_deaths_min_playtime: 5 * 60 * 60,
            least_min_playtime: 5 * 60,
        }
    }
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

/// All candidates sharing the extremal value. Empty input gives no winners.
fn tied_at_extreme<'a, I>(candidates: I, value: fn(&PlayerRecord) -> u64, extreme: Extreme) -> Vec<&'a PlayerRecord>
where
    I: IntoIterator<Item = &'a PlayerRecord>,
{
    let mut best: Option<u64> = None;
    let mut winners = Vec::new();

    for record in candidates {
        let v = value(record);
        let better = match (best, extreme) {
            (None, _) => true,
            (Some(b), Extreme::Max) => v > b,
            (Some(b), Extreme::Min) => v < b,
        };

        if better {
            best = Some(v);
            winners.clear();
            winners.push(record);
        } else if best == Some(v) {
            winners.push(record);
        }
    }

    winners
}

/// Players meeting the winner condition of `category`, ties included.
pub fn category_winners<'a>(
    category: RoleCategory,
    records: &'a [PlayerRecord],
    policy: &EligibilityPolicy,
) -> Vec<&'a PlayerRecord> {
    match category {
        RoleCategory::MostDeaths => tied_at_extreme(records, |r| r.deaths, Extreme::Max),
        RoleCategory::LeastDeaths => tied_at_extreme(
            // Zero deaths means untested, not safe.
            records
                .iter()
                .filter(|r| r.deaths > 0 && r.playtime_seconds >= policy.least_deaths_min_playtime),
            |r| r.deaths,
            Extreme::Min,
        ),
        RoleCategory::MostAdvancements => tied_at_extreme(records, |r| r.advancements, Extreme::Max),
        RoleCategory::LeastAdvancements => tied_at_extreme(
            records.iter().filter(|r| r.playtime_seconds >= policy.least_min_playtime),
            |r| r.advancements,
            Extreme::Min,
        ),
        RoleCategory::MostPlaytime => tied_at_extreme(records, |r| r.playtime_seconds, Extreme::Max),
        RoleCategory::LeastPlaytime => tied_at_extreme(
            records.iter().filter(|r| r.playtime_seconds >= policy.least_min_playtime),
            |r| r.playtime_seconds,
            Extreme::Min,
        ),
    }
}

/// Members that should hold each category's role this cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilitySet {
    holders: BTreeMap<RoleCategory, BTreeSet<MemberId>>,
}

impl EligibilitySet {
    /// Members eligible for `category` (empty when nobody qualifies).
    pub fn holders(&self, category: RoleCategory) -> BTreeSet<MemberId> {
        self.holders.get(&category).cloned().unwrap_or_default()
    }

    pub fn insert(&mut self, category: RoleCategory, member: MemberId) {
        self.holders.entry(category).or_default().insert(member);
    }
}

/// Compute the eligibility set for the given categories.
///
/// Winners whose linked identifier does not resolve to a current guild member
/// are left out; they do not affect any other player.
pub fn compute_eligibility(
    records: &[PlayerRecord],
    members: &[GuildMember],
    policy: &EligibilityPolicy,
    categories: &[RoleCategory],
) -> EligibilitySet {
    let mut set = EligibilitySet::default();

    for &category in categories {
        for record in category_winners(category, records, policy) {
            let linked = record.linked_account.as_deref().unwrap_or("");
            match resolve_account(linked, members) {
                Some(member) => set.insert(category, member.id),
                None => debug!(
                    player = %record.minecraft_username,
                    identifier = linked,
                    %category,
                    "No guild member for player, skipping"
                ),
            }
        }
    }

    set
}
