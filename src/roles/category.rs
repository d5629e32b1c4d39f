//! The six superlative achievement roles.

use std::fmt;

/// One leaderboard superlative, each backed by a single guild role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleCategory {
    MostDeaths,
    LeastDeaths,
    MostAdvancements,
    LeastAdvancements,
    MostPlaytime,
    LeastPlaytime,
}

impl RoleCategory {
    /// Every category, in the order runs process them.
    pub const ALL: [RoleCategory; 6] = [
        RoleCategory::MostDeaths,
        RoleCategory::LeastDeaths,
        RoleCategory::MostAdvancements,
        RoleCategory::LeastAdvancements,
        RoleCategory::MostPlaytime,
        RoleCategory::LeastPlaytime,
    ];

    /// Display name of the guild role for this category.
    pub fn role_name(self) -> &'static str {
        match self {
            RoleCategory::MostDeaths => "💀 Skill Issue",
            RoleCategory::LeastDeaths => "👷‍♂️ Safety First",
            RoleCategory::MostAdvancements => "👑 Overachiever",
            RoleCategory::LeastAdvancements => "🌱 Beginner",
            RoleCategory::MostPlaytime => "🕒 No Life",
            RoleCategory::LeastPlaytime => "💤 Sleeping",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            RoleCategory::MostDeaths => "most_deaths",
            RoleCategory::LeastDeaths => "least_deaths",
            RoleCategory::MostAdvancements => "most_advancements",
            RoleCategory::LeastAdvancements => "least_advancements",
            RoleCategory::MostPlaytime => "most_playtime",
            RoleCategory::LeastPlaytime => "least_playtime",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
