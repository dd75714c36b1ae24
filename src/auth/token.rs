use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::permissions::{Permission, Role};
use crate::error::{AppError, Result};
use crate::models::user::User;

/// Claims embedded in every session token.
///
/// The contents are a snapshot taken at issuance: changing a user's role or
/// client access afterwards does not touch tokens already in the wild; they
/// stay valid as issued until they expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub permissions: Vec<Permission>,
    /// Client ids a non-admin user may operate on.
    pub client_access: Vec<Uuid>,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Admins may operate on every client; everyone else needs the client
    /// in their access list.
    pub fn can_access_client(&self, client_id: Uuid) -> bool {
        self.role == Role::Admin || self.client_access.contains(&client_id)
    }
}

/// Issues a signed HS256 session token for an authenticated user.
pub fn issue_token(user: &User, secret: &str, lifetime_hours: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role,
        permissions: user.permissions.clone(),
        client_access: user.client_access.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(lifetime_hours)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token encode error: {}", e)))
}

/// Decodes and verifies a session token (signature and expiry).
pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Authentication("Token expired".to_string())
        }
        _ => AppError::Authentication("Invalid token".to_string()),
    })
}
