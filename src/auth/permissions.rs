use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A permission kind gating an API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Admin,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
            Permission::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "delete" => Ok(Permission::Delete),
            "admin" => Ok(Permission::Admin),
            other => Err(AppError::Internal(format!("Unknown permission: {}", other))),
        }
    }
}

/// A user role. The permission set of a user is always derived from its
/// role via [`Role::permissions`]; permissions are never edited on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    /// The fixed role → permission mapping.
    pub fn permissions(&self) -> Vec<Permission> {
        match self {
            Role::Admin => vec![
                Permission::Read,
                Permission::Write,
                Permission::Delete,
                Permission::Admin,
            ],
            Role::Manager => vec![Permission::Read, Permission::Write, Permission::Delete],
            Role::User => vec![Permission::Read],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            other => Err(AppError::Internal(format!("Unknown role: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_has_all_permissions() {
        let perms = Role::Admin.permissions();
        for p in [
            Permission::Read,
            Permission::Write,
            Permission::Delete,
            Permission::Admin,
        ] {
            assert!(perms.contains(&p));
        }
    }

    #[test]
    fn manager_cannot_administer() {
        let perms = Role::Manager.permissions();
        assert!(perms.contains(&Permission::Read));
        assert!(perms.contains(&Permission::Write));
        assert!(perms.contains(&Permission::Delete));
        assert!(!perms.contains(&Permission::Admin));
    }

    #[test]
    fn plain_user_is_read_only() {
        assert_eq!(Role::User.permissions(), vec![Permission::Read]);
    }

    #[test]
    fn role_string_roundtrip() {
        for role in [Role::Admin, Role::Manager, Role::User] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn permissions_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&Permission::Write).unwrap(),
            "\"write\""
        );
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
    }
}
