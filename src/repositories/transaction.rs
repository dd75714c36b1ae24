use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::{
    error::Result,
    models::transaction::{Transaction, TransactionInput},
};

/// A helper function to map a `tokio_postgres::Row` to a `Transaction`.
fn row_to_transaction(row: &Row) -> Result<Transaction> {
    Ok(Transaction {
        id: row.try_get("id")?,
        client_id: row.try_get("client_id")?,
        date: row.try_get("date")?,
        description: row.try_get("description")?,
        debit: row.try_get("debit")?,
        credit: row.try_get("credit")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Lists a client's transactions in storage (insertion) order.
pub async fn list_by_client(pool: &Pool, client_id: Uuid) -> Result<Vec<Transaction>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT * FROM transactions WHERE client_id = $1 ORDER BY seq
            "#,
            &[&client_id],
        )
        .await?;
    rows.iter().map(row_to_transaction).collect()
}

/// Finds a transaction by its ID.
pub async fn find_by_id(pool: &Pool, id: Uuid) -> Result<Option<Transaction>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT * FROM transactions WHERE id = $1
            "#,
            &[&id],
        )
        .await?;
    row.map(|r| row_to_transaction(&r)).transpose()
}

/// Inserts a single transaction for a client.
pub async fn insert(pool: &Pool, client_id: Uuid, input: &TransactionInput) -> Result<Transaction> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO transactions (id, client_id, date, description, debit, credit)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
            &[
                &Uuid::new_v4(),
                &client_id,
                &input.date,
                &input.description,
                &input.debit,
                &input.credit,
            ],
        )
        .await?;
    row_to_transaction(&row)
}

/// Inserts a batch of transactions in the given order inside one database
/// transaction: either the whole batch lands or none of it does.
pub async fn insert_bulk(
    pool: &Pool,
    rows: &[(Uuid, TransactionInput)],
) -> Result<Vec<Transaction>> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    let stmt = tx
        .prepare(
            r#"
            INSERT INTO transactions (id, client_id, date, description, debit, credit)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .await?;

    let mut created = Vec::with_capacity(rows.len());
    for (client_id, input) in rows {
        let row = tx
            .query_one(
                &stmt,
                &[
                    &Uuid::new_v4(),
                    client_id,
                    &input.date,
                    &input.description,
                    &input.debit,
                    &input.credit,
                ],
            )
            .await?;
        created.push(row_to_transaction(&row)?);
    }

    tx.commit().await?;
    Ok(created)
}

/// Full-field replace of date, description, debit and credit. The owning
/// client id is immutable and left untouched.
pub async fn update(
    pool: &Pool,
    id: Uuid,
    input: &TransactionInput,
) -> Result<Option<Transaction>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE transactions
            SET date = $1, description = $2, debit = $3, credit = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
            &[&input.date, &input.description, &input.debit, &input.credit, &id],
        )
        .await?;
    row.map(|r| row_to_transaction(&r)).transpose()
}

/// Deletes a transaction. Returns `false` when no such transaction existed.
pub async fn delete(pool: &Pool, id: Uuid) -> Result<bool> {
    let client = pool.get().await?;
    let deleted = client
        .execute(
            r#"
            DELETE FROM transactions WHERE id = $1
            "#,
            &[&id],
        )
        .await?;
    Ok(deleted > 0)
}
