use deadpool_postgres::Pool;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::auth::{password, permissions::Role, token};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::repositories::user as user_repo;
use crate::validation::users::{validate_email, validate_password, validate_username};

/// Authenticates a user and issues a session token.
///
/// Fails with one uniform message whether the username is unknown or the
/// password mismatches; callers learn nothing about which it was.
pub async fn authenticate(
    pool: &Pool,
    config: &Config,
    username: &str,
    password_input: &str,
) -> Result<String> {
    tracing::debug!("🔐 Authenticating user: {}", username);

    let user = user_repo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    if !password::verify_password(password_input, &user.password_hash)? {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let token = token::issue_token(&user, &config.jwt_secret, config.token_lifetime_hours)?;
    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(token)
}

/// Creates a new user with a role-derived permission set.
///
/// The password is hashed before storage; the permission set always comes
/// from the role, never from the caller.
pub async fn create_user(
    pool: &Pool,
    username: &str,
    email: &str,
    password_input: &str,
    role: Role,
    client_access: &[Uuid],
) -> Result<User> {
    validate_username(username)?;
    validate_email(email)?;
    validate_password(password_input)?;

    if user_repo::find_by_username_or_email(pool, username, email)
        .await?
        .is_some()
    {
        return Err(AppError::Duplicate(
            "Username or email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(password_input)?;

    let created = user_repo::insert(
        pool,
        Uuid::new_v4(),
        username,
        email,
        &password_hash,
        role,
        client_access,
    )
    .await;

    match created {
        // Lost a race with a concurrent insert holding the same identity.
        Err(AppError::Database(ref e)) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
            Err(AppError::Duplicate(
                "Username or email already exists".to_string(),
            ))
        }
        Err(e) => Err(e),
        Ok(user) => {
            tracing::info!("✅ User created: {} ({})", user.username, user.id);
            Ok(user)
        }
    }
}

/// Lists every user account.
pub async fn list_users(pool: &Pool) -> Result<Vec<User>> {
    user_repo::list(pool).await
}

/// Replaces a user's role and client access. Permissions are recomputed
/// from the new role.
pub async fn update_user(
    pool: &Pool,
    user_id: Uuid,
    role: Role,
    client_access: &[Uuid],
) -> Result<User> {
    let updated = user_repo::update_role_and_access(pool, user_id, role, client_access)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(
        "✅ User updated: {} role={}",
        updated.username,
        updated.role.as_str()
    );
    Ok(updated)
}

/// Deletes a user account.
pub async fn delete_user(pool: &Pool, user_id: Uuid) -> Result<()> {
    if user_repo::delete(pool, user_id).await? {
        tracing::info!("✅ User deleted: {}", user_id);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// Seeds the first admin account on an empty user directory.
///
/// A fresh deployment has no way to log in otherwise. Runs once at startup;
/// a populated directory is left untouched.
pub async fn ensure_admin_user(pool: &Pool, config: &Config) -> Result<()> {
    if user_repo::count(pool).await? > 0 {
        return Ok(());
    }

    let Some(admin_password) = config.admin_password.as_deref() else {
        tracing::warn!(
            "⚠️ No users exist and ADMIN_PASSWORD is not set, nobody can log in"
        );
        return Ok(());
    };

    create_user(
        pool,
        &config.admin_username,
        &config.admin_email,
        admin_password,
        Role::Admin,
        &[],
    )
    .await?;

    tracing::info!("✅ Seeded initial admin user: {}", config.admin_username);
    Ok(())
}
