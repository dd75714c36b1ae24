use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{permissions::Permission, token::Claims},
    authz,
    error::Result,
    services::clients as client_service,
    state::AppState,
};

/// The request payload for creating or updating a client.
#[derive(Deserialize)]
pub struct ClientPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Lists all clients.
#[axum::debug_handler]
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Read)?;

    let clients = client_service::list_clients(&state.db).await?;
    Ok(Json(clients))
}

/// Creates a client.
#[axum::debug_handler]
pub async fn create_client(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Write)?;

    let client = client_service::create_client(
        &state.db,
        payload.name.unwrap_or_default(),
        payload.email,
        payload.phone,
    )
    .await?;

    Ok(Json(client))
}

/// Updates a client.
#[axum::debug_handler]
pub async fn update_client(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Write)?;

    let client = client_service::update_client(
        &state.db,
        client_id,
        payload.name.unwrap_or_default(),
        payload.email,
        payload.phone,
    )
    .await?;

    Ok(Json(client))
}

/// Deletes a client and, atomically, every transaction it owns.
#[axum::debug_handler]
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Delete)?;

    client_service::delete_client(&state.db, client_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
