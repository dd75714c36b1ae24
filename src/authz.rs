//! Request-side authorization checks.
//!
//! Handlers call these after the auth middleware has verified the token;
//! permission and client-scope decisions are made against the claims as
//! issued (a snapshot, see [`crate::auth::token::Claims`]).

use uuid::Uuid;

use crate::auth::permissions::Permission;
use crate::auth::token::Claims;
use crate::error::{AppError, Result};

/// Fails with `Forbidden` when the token's permission set lacks `required`.
pub fn require_permission(claims: &Claims, required: Permission) -> Result<()> {
    if claims.has_permission(required) {
        Ok(())
    } else {
        tracing::warn!(
            user = %claims.username,
            permission = required.as_str(),
            "Permission denied"
        );
        Err(AppError::Forbidden)
    }
}

/// Fails with `Forbidden` when the token grants no access to `client_id`.
///
/// Admins pass unconditionally; other roles need the client in the access
/// list snapshotted into their token.
pub fn require_client_access(claims: &Claims, client_id: Uuid) -> Result<()> {
    if claims.can_access_client(client_id) {
        Ok(())
    } else {
        tracing::warn!(
            user = %claims.username,
            client_id = %client_id,
            "Client access denied"
        );
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::Role;
    use chrono::Utc;

    fn claims_for(role: Role, client_access: Vec<Uuid>) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            username: "someone".to_string(),
            role,
            permissions: role.permissions(),
            client_access,
            iat: now,
            exp: now + 3600,
        }
    }

    #[test]
    fn read_only_role_is_forbidden_to_write() {
        let claims = claims_for(Role::User, vec![]);
        assert!(require_permission(&claims, Permission::Read).is_ok());
        for p in [Permission::Write, Permission::Delete, Permission::Admin] {
            assert!(matches!(
                require_permission(&claims, p),
                Err(AppError::Forbidden)
            ));
        }
    }

    #[test]
    fn admin_passes_every_permission_gate() {
        let claims = claims_for(Role::Admin, vec![]);
        for p in [
            Permission::Read,
            Permission::Write,
            Permission::Delete,
            Permission::Admin,
        ] {
            assert!(require_permission(&claims, p).is_ok());
        }
    }

    #[test]
    fn client_scope_follows_the_access_list() {
        let granted = Uuid::new_v4();
        let claims = claims_for(Role::Manager, vec![granted]);
        assert!(require_client_access(&claims, granted).is_ok());
        assert!(require_client_access(&claims, Uuid::new_v4()).is_err());
    }

    #[test]
    fn admin_bypasses_the_access_list() {
        let claims = claims_for(Role::Admin, vec![]);
        assert!(require_client_access(&claims, Uuid::new_v4()).is_ok());
    }
}
