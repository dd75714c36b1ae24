use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::permissions::{Permission, Role};

/// Represents a user account as stored.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's username (unique).
    pub username: String,
    /// The user's email address (unique).
    pub email: String,
    /// The user's Argon2id password hash. Never serialized.
    pub password_hash: String,
    /// The user's role.
    pub role: Role,
    /// Permission set, always recomputed from `role` on write.
    pub permissions: Vec<Permission>,
    /// Client ids this user may operate on (ignored for admins).
    pub client_access: Vec<Uuid>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The API view of a user: everything except the password hash.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub client_access: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        UserRecord {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            permissions: user.permissions,
            client_access: user.client_access,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_never_carries_the_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "jane".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Manager,
            permissions: Role::Manager.permissions(),
            client_access: vec![],
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&UserRecord::from(user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"clientAccess\""));
    }
}
