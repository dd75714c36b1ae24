use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{permissions::Permission, token::Claims},
    authz,
    error::{AppError, Result},
    models::transaction::TransactionInput,
    services::{export as export_service, ledger as ledger_service},
    state::AppState,
    validation::transactions::{validate_transaction, MoneyInput},
};

/// The request payload for creating or updating a transaction.
///
/// Everything is optional at the boundary so validation can answer with the
/// contractual message instead of a serializer error; `clientId` is only
/// meaningful on create and ignored on update (the owner is immutable).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub debit: Option<MoneyInput>,
    #[serde(default)]
    pub credit: Option<MoneyInput>,
}

impl TransactionPayload {
    fn validate(&self) -> Result<TransactionInput> {
        validate_transaction(
            self.date,
            self.description.as_deref(),
            self.debit.as_ref(),
            self.credit.as_ref(),
        )
    }

    fn client_id(&self) -> Result<Uuid> {
        self.client_id
            .ok_or_else(|| AppError::Validation("clientId is required".to_string()))
    }
}

/// The request payload for bulk insertion.
#[derive(Deserialize)]
pub struct BulkRequest {
    pub transactions: Vec<TransactionPayload>,
}

/// The query parameters selecting a client's ledger.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerQuery {
    pub client_id: Uuid,
}

/// Lists a client's transactions in storage order.
#[axum::debug_handler]
pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LedgerQuery>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Read)?;
    authz::require_client_access(&claims, query.client_id)?;

    let transactions = ledger_service::list_transactions(&state.db, query.client_id).await?;
    Ok(Json(transactions))
}

/// Creates a single transaction.
#[axum::debug_handler]
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Write)?;

    let client_id = payload.client_id()?;
    authz::require_client_access(&claims, client_id)?;
    let input = payload.validate()?;

    let transaction = ledger_service::create_transaction(&state.db, client_id, input).await?;
    Ok(Json(transaction))
}

/// Creates a batch of transactions, all or nothing.
#[axum::debug_handler]
pub async fn create_bulk(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BulkRequest>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Write)?;

    // Validate the whole batch before anything is written; one bad row
    // fails the batch.
    let mut rows = Vec::with_capacity(payload.transactions.len());
    for row in &payload.transactions {
        let client_id = row.client_id()?;
        authz::require_client_access(&claims, client_id)?;
        rows.push((client_id, row.validate()?));
    }

    let created = ledger_service::create_bulk(&state.db, rows).await?;
    Ok(Json(created))
}

/// Full-field update of a transaction. The owning client never changes.
#[axum::debug_handler]
pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<TransactionPayload>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Write)?;
    let input = payload.validate()?;

    let existing = ledger_service::get_transaction(&state.db, transaction_id).await?;
    authz::require_client_access(&claims, existing.client_id)?;

    let updated = ledger_service::update_transaction(&state.db, transaction_id, input).await?;
    Ok(Json(updated))
}

/// Deletes a transaction.
#[axum::debug_handler]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Delete)?;

    let existing = ledger_service::get_transaction(&state.db, transaction_id).await?;
    authz::require_client_access(&claims, existing.client_id)?;

    ledger_service::delete_transaction(&state.db, transaction_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Returns a client's total balance (the last running balance).
#[axum::debug_handler]
pub async fn get_balance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LedgerQuery>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Read)?;
    authz::require_client_access(&claims, query.client_id)?;

    let total = ledger_service::client_total_balance(&state.db, query.client_id).await?;
    Ok(Json(serde_json::json!({
        "clientId": query.client_id,
        "totalBalance": total,
    })))
}

/// Exports a client's ledger as CSV with a running-balance column.
#[axum::debug_handler]
pub async fn export_ledger(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LedgerQuery>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Read)?;
    authz::require_client_access(&claims, query.client_id)?;

    let transactions = ledger_service::list_transactions(&state.db, query.client_id).await?;
    let document = export_service::export_ledger(&transactions)?;

    Ok((
        [
            (http::header::CONTENT_TYPE, "text/csv"),
            (
                http::header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        document,
    ))
}
