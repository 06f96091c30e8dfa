//! Channel permission resolution.

use crate::domain::entities::{GuildId, GuildMember, PermissionOverwrite, Permissions, Role};

/// Resolves the effective permissions of a member in a guild channel.
pub struct PermissionCalculator;

impl PermissionCalculator {
    /// Applies `@everyone`, member roles, then channel overwrites for `@everyone`,
    /// the member's roles and the member itself. Administrator grants everything.
    #[must_use]
    pub fn compute_permissions(
        guild_id: GuildId,
        overwrites: &[PermissionOverwrite],
        member: &GuildMember,
        guild_roles: &[Role],
    ) -> Permissions {
        let everyone_id = guild_id.as_u64();
        let mut permissions = guild_roles
            .iter()
            .find(|r| r.id == everyone_id)
            .map_or_else(Permissions::empty, |r| r.permissions);

        for role_id in &member.role_ids {
            if let Some(role) = guild_roles.iter().find(|r| r.id == *role_id) {
                permissions |= role.permissions;
            }
        }

        if permissions.contains(Permissions::ADMINISTRATOR) {
            return Permissions::all();
        }

        if let Some(overwrite) = overwrites.iter().find(|o| o.id == everyone_id) {
            permissions &= !overwrite.deny;
            permissions |= overwrite.allow;
        }

        let mut role_allow = Permissions::empty();
        let mut role_deny = Permissions::empty();
        for role_id in &member.role_ids {
            if let Some(overwrite) = overwrites.iter().find(|o| o.id == *role_id) {
                role_allow |= overwrite.allow;
                role_deny |= overwrite.deny;
            }
        }
        permissions &= !role_deny;
        permissions |= role_allow;

        if let Some(overwrite) = overwrites
            .iter()
            .find(|o| o.id == member.user_id.as_u64())
        {
            permissions &= !overwrite.deny;
            permissions |= overwrite.allow;
        }

        permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserId;

    const GUILD: u64 = 100;
    const MOD_ROLE: u64 = 200;
    const BOT: u64 = 300;

    fn roles() -> Vec<Role> {
        vec![
            Role {
                id: GUILD,
                permissions: Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS,
            },
            Role {
                id: MOD_ROLE,
                permissions: Permissions::MANAGE_MESSAGES,
            },
        ]
    }

    fn member(role_ids: Vec<u64>) -> GuildMember {
        GuildMember {
            user_id: UserId::from(BOT),
            role_ids,
        }
    }

    #[test]
    fn test_roles_are_combined() {
        let perms = PermissionCalculator::compute_permissions(
            GuildId::from(GUILD),
            &[],
            &member(vec![MOD_ROLE]),
            &roles(),
        );
        assert!(perms.contains(Permissions::MANAGE_MESSAGES | Permissions::SEND_MESSAGES));
    }

    #[test]
    fn test_role_overwrite_denies() {
        let overwrites = [PermissionOverwrite {
            id: MOD_ROLE,
            allow: Permissions::empty(),
            deny: Permissions::MANAGE_MESSAGES,
        }];
        let perms = PermissionCalculator::compute_permissions(
            GuildId::from(GUILD),
            &overwrites,
            &member(vec![MOD_ROLE]),
            &roles(),
        );
        assert!(!perms.contains(Permissions::MANAGE_MESSAGES));
    }

    #[test]
    fn test_member_overwrite_wins_over_role_overwrite() {
        let overwrites = [
            PermissionOverwrite {
                id: MOD_ROLE,
                allow: Permissions::empty(),
                deny: Permissions::MANAGE_MESSAGES,
            },
            PermissionOverwrite {
                id: BOT,
                allow: Permissions::MANAGE_MESSAGES,
                deny: Permissions::empty(),
            },
        ];
        let perms = PermissionCalculator::compute_permissions(
            GuildId::from(GUILD),
            &overwrites,
            &member(vec![MOD_ROLE]),
            &roles(),
        );
        assert!(perms.contains(Permissions::MANAGE_MESSAGES));
    }

    #[test]
    fn test_administrator_ignores_overwrites() {
        let mut guild_roles = roles();
        guild_roles.push(Role {
            id: 400,
            permissions: Permissions::ADMINISTRATOR,
        });
        let overwrites = [PermissionOverwrite {
            id: GUILD,
            allow: Permissions::empty(),
            deny: Permissions::all(),
        }];
        let perms = PermissionCalculator::compute_permissions(
            GuildId::from(GUILD),
            &overwrites,
            &member(vec![400]),
            &guild_roles,
        );
        assert_eq!(perms, Permissions::all());
    }
}
