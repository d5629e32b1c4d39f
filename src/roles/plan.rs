//! Diffing eligibility against current role membership.

use std::collections::{BTreeMap, BTreeSet};

use super::category::RoleCategory;
use super::eligibility::EligibilitySet;
use super::guild::{GuildMember, GuildRole, MemberId};

/// Whether an operation adds or removes the role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Grant,
    Revoke,
}

impl RoleChange {
    /// Audit-log reason sent along with the mutation.
    pub fn reason(self) -> &'static str {
        match self {
            RoleChange::Grant => "Achieved criteria",
            RoleChange::Revoke => "Lost criteria",
        }
    }
}

/// Changes needed for one category whose role exists in the guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPlan {
    pub category: RoleCategory,
    pub role: GuildRole,
    pub to_add: BTreeSet<MemberId>,
    pub to_remove: BTreeSet<MemberId>,
}

/// One member/role mutation, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOperation {
    pub category: RoleCategory,
    pub role: GuildRole,
    pub member: MemberId,
    /// Member display name at snapshot time, for logs.
    pub member_name: String,
    pub change: RoleChange,
}

/// The full set of changes for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub categories: Vec<CategoryPlan>,
    /// Categories skipped because their role does not exist in the guild.
    pub missing_roles: Vec<RoleCategory>,
    /// Display names of every member touched by the plan.
    pub member_names: BTreeMap<MemberId, String>,
}

impl ReconciliationPlan {
    /// Diff `eligible` against the roles each member currently holds.
    ///
    /// `resolved` pairs each category with its guild role; categories absent
    /// from it are recorded as missing. Nothing is mutated here.
    pub fn build(
        eligible: &EligibilitySet,
        resolved: &[(RoleCategory, Option<GuildRole>)],
        members: &[GuildMember],
    ) -> Self {
        let mut plan = Self::default();

        for (category, role) in resolved {
            let Some(role) = role else {
                plan.missing_roles.push(*category);
                continue;
            };

            let current: BTreeSet<MemberId> = members
                .iter()
                .filter(|member| member.has_role(role.id))
                .map(|member| member.id)
                .collect();
            let expected = eligible.holders(*category);

            plan.categories.push(CategoryPlan {
                category: *category,
                role: role.clone(),
                to_add: expected.difference(&current).copied().collect(),
                to_remove: current.difference(&expected).copied().collect(),
            });
        }

        for member in members {
            let touched = plan
                .categories
                .iter()
                .any(|c| c.to_add.contains(&member.id) || c.to_remove.contains(&member.id));
            if touched {
                plan.member_names.insert(member.id, member.display_name.clone());
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.categories
            .iter()
            .all(|c| c.to_add.is_empty() && c.to_remove.is_empty())
    }

    /// Operations in execution order: category order, grants before revokes.
    pub fn operations(&self) -> Vec<RoleOperation> {
        let mut operations = Vec::new();

        for plan in &self.categories {
            let grants = plan.to_add.iter().map(|m| (*m, RoleChange::Grant));
            let revokes = plan.to_remove.iter().map(|m| (*m, RoleChange::Revoke));

            for (member, change) in grants.chain(revokes) {
                operations.push(RoleOperation {
                    category: plan.category,
                    role: plan.role.clone(),
                    member,
                    member_name: self
                        .member_names
                        .get(&member)
                        .cloned()
                        .unwrap_or_else(|| member.to_string()),
                    change,
                });
            }
        }

        operations
    }
}
