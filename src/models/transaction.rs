use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One ledger row. Debit and credit are independent optional magnitudes:
/// either, both, or neither may be present on a single transaction.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The unique identifier for the transaction.
    pub id: Uuid,
    /// The owning client. Immutable after creation.
    pub client_id: Uuid,
    /// The calendar date of the transaction.
    pub date: NaiveDate,
    /// What the transaction was for.
    pub description: String,
    /// Amount added to the balance, if any.
    pub debit: Option<Decimal>,
    /// Amount subtracted from the balance, if any.
    pub credit: Option<Decimal>,
    /// The timestamp when the transaction was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the transaction was last modified.
    pub updated_at: DateTime<Utc>,
}

/// A validated transaction body, ready for insert or full-field update.
#[derive(Clone, Debug)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub description: String,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
}
