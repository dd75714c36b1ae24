use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{error::Result, models::client::Client};

/// A helper function to map a `tokio_postgres::Row` to a `Client`.
fn row_to_client(row: &Row) -> Result<Client> {
    Ok(Client {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Lists all clients.
pub async fn list(pool: &Pool) -> Result<Vec<Client>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT * FROM clients ORDER BY created_at
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_client).collect()
}

/// Checks whether a client exists.
pub async fn exists(pool: &Pool, client_id: Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT 1 AS one FROM clients WHERE id = $1
            "#,
            &[&client_id],
        )
        .await?;
    Ok(row.is_some())
}

/// Inserts a new client.
pub async fn insert(
    pool: &Pool,
    id: Uuid,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<Client> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO clients (id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
            &[&id, &name, &email, &phone],
        )
        .await?;
    row_to_client(&row)
}

/// Full-field update of a client record.
pub async fn update(
    pool: &Pool,
    client_id: Uuid,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<Client>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE clients
            SET name = $1, email = $2, phone = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
            &[&name, &email, &phone, &client_id],
        )
        .await?;
    row.map(|r| row_to_client(&r)).transpose()
}

/// Deletes a client and every transaction it owns in one database
/// transaction, so a concurrent reader never observes orphaned rows.
/// Returns `false` when no such client existed.
pub async fn delete_cascade(pool: &Pool, client_id: Uuid) -> Result<bool> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    tx.execute(
        r#"
        DELETE FROM transactions WHERE client_id = $1
        "#,
        &[&client_id],
    )
    .await?;

    let deleted = tx
        .execute(
            r#"
            DELETE FROM clients WHERE id = $1
            "#,
            &[&client_id],
        )
        .await?;

    tx.commit().await?;
    Ok(deleted > 0)
}
