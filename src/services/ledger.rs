use deadpool_postgres::Pool;
use rust_decimal::Decimal;
use tokio_postgres::error::SqlState;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::transaction::{Transaction, TransactionInput},
    repositories::{client as client_repo, transaction as transaction_repo},
};

/// An insert can still hit the foreign key when the client is deleted
/// between the existence check and the write; report the client as gone.
fn map_missing_client(error: AppError) -> AppError {
    match error {
        AppError::Database(ref e) if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) => {
            AppError::NotFound
        }
        other => other,
    }
}

/// The signed contribution of one transaction: debit − credit, with an
/// absent side counting as zero.
fn amount(transaction: &Transaction) -> Decimal {
    transaction.debit.unwrap_or_default() - transaction.credit.unwrap_or_default()
}

/// Running balance over a transaction sequence, in the order given.
///
/// `balance[i] = balance[i-1] + debit[i] - credit[i]`, seeded at zero. This
/// is a strict left-to-right fold over STORAGE order: rows inserted out of
/// calendar order fold in insertion order, and exports/listings must show
/// exactly that. Do not sort by date here.
pub fn running_balance(transactions: &[Transaction]) -> Vec<Decimal> {
    let mut balance = Decimal::ZERO;
    transactions
        .iter()
        .map(|t| {
            balance += amount(t);
            balance
        })
        .collect()
}

/// Total balance of a sequence: sum of debit − credit, equal to the last
/// running balance, zero when empty.
pub fn total_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(amount).sum()
}

/// Lists a client's ledger in storage order.
pub async fn list_transactions(pool: &Pool, client_id: Uuid) -> Result<Vec<Transaction>> {
    transaction_repo::list_by_client(pool, client_id).await
}

/// Fetches one transaction, failing with `NotFound` when absent.
pub async fn get_transaction(pool: &Pool, id: Uuid) -> Result<Transaction> {
    transaction_repo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Records a single transaction against an existing client.
pub async fn create_transaction(
    pool: &Pool,
    client_id: Uuid,
    input: TransactionInput,
) -> Result<Transaction> {
    if !client_repo::exists(pool, client_id).await? {
        return Err(AppError::NotFound);
    }

    let transaction = transaction_repo::insert(pool, client_id, &input)
        .await
        .map_err(map_missing_client)?;
    tracing::info!(
        transaction_id = %transaction.id,
        client_id = %client_id,
        "Transaction recorded"
    );
    Ok(transaction)
}

/// Records a batch of transactions in the given order, all or nothing.
///
/// Every row is validated and its client checked before anything is
/// written; the insert itself runs in one database transaction.
pub async fn create_bulk(
    pool: &Pool,
    rows: Vec<(Uuid, TransactionInput)>,
) -> Result<Vec<Transaction>> {
    if rows.is_empty() {
        return Err(AppError::Validation(
            "At least one transaction is required".to_string(),
        ));
    }

    let mut seen: Vec<Uuid> = Vec::new();
    for (client_id, _) in &rows {
        if !seen.contains(client_id) {
            if !client_repo::exists(pool, *client_id).await? {
                return Err(AppError::NotFound);
            }
            seen.push(*client_id);
        }
    }

    let created = transaction_repo::insert_bulk(pool, &rows)
        .await
        .map_err(map_missing_client)?;
    tracing::info!(count = created.len(), "Bulk transactions recorded");
    Ok(created)
}

/// Total balance of a client's ledger: the last running balance, or zero
/// for an empty ledger.
pub async fn client_total_balance(pool: &Pool, client_id: Uuid) -> Result<Decimal> {
    let transactions = list_transactions(pool, client_id).await?;
    Ok(total_balance(&transactions))
}

/// Full-field replace of a transaction. The owning client is immutable.
pub async fn update_transaction(
    pool: &Pool,
    id: Uuid,
    input: TransactionInput,
) -> Result<Transaction> {
    transaction_repo::update(pool, id, &input)
        .await?
        .ok_or(AppError::NotFound)
}

/// Deletes a transaction, failing with `NotFound` when absent.
pub async fn delete_transaction(pool: &Pool, id: Uuid) -> Result<()> {
    if transaction_repo::delete(pool, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}
