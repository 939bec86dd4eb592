//! Authorization Policy
//! Mission: Map (role, action) pairs to allow/deny with one explicit table

use crate::auth::models::Role;

/// The closed set of actions a request can be authorized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Unauthenticated endpoints: service info, health, register, login.
    Public,
    /// Reading or mutating one's own profile.
    SelfProfile,
    /// Invoking the inference endpoint.
    Predict,
    /// User administration: list, create with role, delete.
    AdminManageUsers,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Public,
        Action::SelfProfile,
        Action::Predict,
        Action::AdminManageUsers,
    ];
}

/// Decide whether `role` may perform `action`. `None` is an anonymous caller.
///
/// The table is written out exhaustively rather than as threshold
/// comparisons, so every (role, action) cell is visible and the
/// Admin-exclusivity of user management cannot be shadowed by an ordering
/// shortcut. Capability sets are monotonic (Admin ⊇ User ⊇ Guest) except for
/// `AdminManageUsers`, which belongs to Admin alone.
pub fn is_allowed(role: Option<Role>, action: Action) -> bool {
    match (role, action) {
        // Public surface is open to everyone, authenticated or not.
        (_, Action::Public) => true,

        // Anonymous callers get nothing else.
        (None, _) => false,

        (Some(Role::Guest), Action::SelfProfile) => false,
        (Some(Role::Guest), Action::Predict) => false,
        (Some(Role::Guest), Action::AdminManageUsers) => false,

        (Some(Role::User), Action::SelfProfile) => true,
        (Some(Role::User), Action::Predict) => true,
        (Some(Role::User), Action::AdminManageUsers) => false,

        (Some(Role::Admin), Action::SelfProfile) => true,
        (Some(Role::Admin), Action::Predict) => true,
        (Some(Role::Admin), Action::AdminManageUsers) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The whole (role × action) table, enumerated.
    #[test]
    fn test_exhaustive_permission_table() {
        let expected: &[(Option<Role>, Action, bool)] = &[
            (None, Action::Public, true),
            (None, Action::SelfProfile, false),
            (None, Action::Predict, false),
            (None, Action::AdminManageUsers, false),
            (Some(Role::Guest), Action::Public, true),
            (Some(Role::Guest), Action::SelfProfile, false),
            (Some(Role::Guest), Action::Predict, false),
            (Some(Role::Guest), Action::AdminManageUsers, false),
            (Some(Role::User), Action::Public, true),
            (Some(Role::User), Action::SelfProfile, true),
            (Some(Role::User), Action::Predict, true),
            (Some(Role::User), Action::AdminManageUsers, false),
            (Some(Role::Admin), Action::Public, true),
            (Some(Role::Admin), Action::SelfProfile, true),
            (Some(Role::Admin), Action::Predict, true),
            (Some(Role::Admin), Action::AdminManageUsers, true),
        ];

        assert_eq!(expected.len(), 4 * Action::ALL.len());

        for (role, action, allowed) in expected {
            assert_eq!(
                is_allowed(*role, *action),
                *allowed,
                "mismatch for role {role:?}, action {action:?}"
            );
        }
    }

    /// Anything permitted for a lower role is permitted for a higher one,
    /// except Admin-exclusive user management.
    #[test]
    fn test_capability_sets_are_monotonic() {
        let ordered = [Role::Guest, Role::User, Role::Admin];

        for pair in ordered.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            for action in Action::ALL {
                if is_allowed(Some(lower), action) {
                    assert!(
                        is_allowed(Some(higher), action),
                        "{higher:?} lost {action:?} granted to {lower:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_admin_manage_users_is_admin_exclusive() {
        assert!(is_allowed(Some(Role::Admin), Action::AdminManageUsers));
        assert!(!is_allowed(Some(Role::User), Action::AdminManageUsers));
        assert!(!is_allowed(Some(Role::Guest), Action::AdminManageUsers));
        assert!(!is_allowed(None, Action::AdminManageUsers));
    }
}
