//! Mapping stored account identifiers onto guild members.

use super::guild::{GuildMember, MemberId};

/// A linked account identifier as stored in the player table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountIdentifier {
    /// `<@123>` or `<@!123>`
    Mention(u64),
    /// Bare numeric user id
    Id(u64),
    /// Username or legacy `name#1234` tag
    Name(String),
}

impl AccountIdentifier {
    /// Parse a stored identifier. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(inner) = raw.strip_prefix("<@").and_then(|s| s.strip_suffix('>')) {
            let digits = inner.strip_prefix('!').unwrap_or(inner);
            if let Ok(id) = digits.parse::<u64>() {
                return Some(Self::Mention(id));
            }
        }

        if raw.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = raw.parse::<u64>() {
                return Some(Self::Id(id));
            }
        }

        Some(Self::Name(raw.to_string()))
    }

    fn matches(&self, member: &GuildMember) -> bool {
        match self {
            Self::Mention(id) | Self::Id(id) => member.id == MemberId(*id),
            Self::Name(name) => {
                member.tag.eq_ignore_ascii_case(name) || member.username.eq_ignore_ascii_case(name)
            }
        }
    }
}

/// Resolve a stored identifier against a member snapshot.
///
/// Returns `None` when the identifier is blank or nobody in the guild matches it.
pub fn resolve_account<'a>(identifier: &str, members: &'a [GuildMember]) -> Option<&'a GuildMember> {
    let identifier = AccountIdentifier::parse(identifier)?;
    members.iter().find(|member| identifier.matches(member))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn member(id: u64, username: &str, tag: &str) -> GuildMember {
        GuildMember {
            id: MemberId(id),
            username: username.to_string(),
            tag: tag.to_string(),
            display_name: username.to_string(),
            roles: BTreeSet::new(),
        }
    }

    #[test]
    fn test_parse_identifier_forms() {
        assert_eq!(AccountIdentifier::parse("<@42>"), Some(AccountIdentifier::Mention(42)));
        assert_eq!(AccountIdentifier::parse("<@!42>"), Some(AccountIdentifier::Mention(42)));
        assert_eq!(AccountIdentifier::parse("  42 "), Some(AccountIdentifier::Id(42)));
        assert_eq!(
            AccountIdentifier::parse("Yo2JBear#5008"),
            Some(AccountIdentifier::Name("Yo2JBear#5008".to_string()))
        );
        assert_eq!(
            AccountIdentifier::parse("<@abc>"),
            Some(AccountIdentifier::Name("<@abc>".to_string()))
        );
        assert_eq!(AccountIdentifier::parse("   "), None);
    }

    #[test]
    fn test_resolve_account() {
        let members = vec![
            member(1, "luigi_is_better", "luigi_is_better"),
            member(2, "yo2jbear", "Yo2JBear#5008"),
        ];

        assert_eq!(resolve_account("<@1>", &members).map(|m| m.id), Some(MemberId(1)));
        assert_eq!(resolve_account("2", &members).map(|m| m.id), Some(MemberId(2)));
        assert_eq!(resolve_account("Yo2JBear#5008", &members).map(|m| m.id), Some(MemberId(2)));
        assert_eq!(resolve_account("LUIGI_IS_BETTER", &members).map(|m| m.id), Some(MemberId(1)));

        assert!(resolve_account("3", &members).is_none());
        assert!(resolve_account("nobody", &members).is_none());
        assert!(resolve_account("", &members).is_none());
    }
}
