use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    auth::permissions::{Permission, Role},
    error::Result,
    models::user::User,
};

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    let role = Role::parse(row.try_get::<_, &str>("role")?)?;
    let permissions = row
        .try_get::<_, Vec<String>>("permissions")?
        .iter()
        .map(|p| Permission::parse(p))
        .collect::<Result<Vec<_>>>()?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        role,
        permissions,
        client_access: row.try_get("client_access")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn permissions_to_strings(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(|p| p.as_str().to_string()).collect()
}

/// Inserts a new user.
pub async fn insert(
    pool: &Pool,
    id: Uuid,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    client_access: &[Uuid],
) -> Result<User> {
    let client = pool.get().await?;
    let permissions = permissions_to_strings(&role.permissions());
    let access = client_access.to_vec();
    let row = client
        .query_one(
            r#"
            INSERT INTO users (id, username, email, password, role, permissions, client_access)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
            &[
                &id,
                &username,
                &email,
                &password_hash,
                &role.as_str(),
                &permissions,
                &access,
            ],
        )
        .await?;
    row_to_user(&row)
}

/// Finds a user by exact username match.
pub async fn find_by_username(pool: &Pool, username: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT * FROM users WHERE username = $1
            "#,
            &[&username],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Finds a user holding the given username OR email, if any.
///
/// Used for the duplicate-identity check before insert.
pub async fn find_by_username_or_email(
    pool: &Pool,
    username: &str,
    email: &str,
) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT * FROM users WHERE username = $1 OR email = $2
            "#,
            &[&username, &email],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Lists all users.
pub async fn list(pool: &Pool) -> Result<Vec<User>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT * FROM users ORDER BY created_at
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_user).collect()
}

/// Replaces a user's role and client access; the permission set is
/// recomputed from the role, never taken from the caller.
pub async fn update_role_and_access(
    pool: &Pool,
    user_id: Uuid,
    role: Role,
    client_access: &[Uuid],
) -> Result<Option<User>> {
    let client = pool.get().await?;
    let permissions = permissions_to_strings(&role.permissions());
    let access = client_access.to_vec();
    let row = client
        .query_opt(
            r#"
            UPDATE users
            SET role = $1, permissions = $2, client_access = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
            &[&role.as_str(), &permissions, &access, &user_id],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Deletes a user. Returns `false` when no such user existed.
pub async fn delete(pool: &Pool, user_id: Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let deleted = client
        .execute(
            r#"
            DELETE FROM users WHERE id = $1
            "#,
            &[&user_id],
        )
        .await?;
    Ok(deleted > 0)
}

/// Counts users; the startup seeder uses this to detect an empty directory.
pub async fn count(pool: &Pool) -> Result<i64> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            SELECT COUNT(*) AS n FROM users
            "#,
            &[],
        )
        .await?;
    Ok(row.try_get("n")?)
}
