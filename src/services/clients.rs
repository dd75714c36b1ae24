use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::client::Client;
use crate::repositories::client as client_repo;
use crate::validation::users::validate_email;

/// Normalizes an optional contact field: trimmed, empty becomes absent.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_contact(email: &Option<String>) -> Result<()> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    Ok(())
}

/// Lists all clients.
pub async fn list_clients(pool: &Pool) -> Result<Vec<Client>> {
    client_repo::list(pool).await
}

/// Creates a client. Only the name is required.
pub async fn create_client(
    pool: &Pool,
    name: String,
    email: Option<String>,
    phone: Option<String>,
) -> Result<Client> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let email = normalize(email);
    let phone = normalize(phone);
    validate_contact(&email)?;

    let client = client_repo::insert(
        pool,
        Uuid::new_v4(),
        &name,
        email.as_deref(),
        phone.as_deref(),
    )
    .await?;
    tracing::info!("✅ Client created: {} ({})", client.name, client.id);
    Ok(client)
}

/// Full-field update of a client record.
pub async fn update_client(
    pool: &Pool,
    client_id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
) -> Result<Client> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    let email = normalize(email);
    let phone = normalize(phone);
    validate_contact(&email)?;

    client_repo::update(pool, client_id, &name, email.as_deref(), phone.as_deref())
        .await?
        .ok_or(AppError::NotFound)
}

/// Deletes a client together with its whole ledger.
pub async fn delete_client(pool: &Pool, client_id: Uuid) -> Result<()> {
    if client_repo::delete_cascade(pool, client_id).await? {
        tracing::info!("✅ Client deleted with its transactions: {}", client_id);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}
