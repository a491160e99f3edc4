//! Roles and the authorization policy for user-management actions.

use crate::RegistryError;

/// Authorization level of a registered user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            other => Err(RegistryError::InvalidRole(other.to_string())),
        }
    }
}

/// A user-management action subject to the role policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminAction {
    Register,
    SetRole,
    Remove,
    List,
}

/// Decides whether an actor holding `role` may perform `action`.
///
/// `Register` is self-service. Everything else requires `Admin`. Callers
/// must look the role up at call time, so a demoted admin loses access on
/// the very next command.
pub fn is_authorized(role: Option<Role>, action: AdminAction) -> bool {
    matches!(action, AdminAction::Register) || matches!(role, Some(Role::Admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_self_service() {
        assert!(is_authorized(None, AdminAction::Register));
        assert!(is_authorized(Some(Role::Member), AdminAction::Register));
        assert!(is_authorized(Some(Role::Admin), AdminAction::Register));
    }

    #[test]
    fn admin_actions_require_admin() {
        for action in [AdminAction::SetRole, AdminAction::Remove, AdminAction::List] {
            assert!(!is_authorized(None, action));
            assert!(!is_authorized(Some(Role::Member), action));
            assert!(is_authorized(Some(Role::Admin), action));
        }
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!(Role::try_from("member").unwrap(), Role::Member);
        assert_eq!(Role::try_from("admin").unwrap(), Role::Admin);
        assert_eq!(
            Role::try_from("owner"),
            Err(RegistryError::InvalidRole("owner".to_string()))
        );
    }
}
