use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::{
        permissions::{Permission, Role},
        token::Claims,
    },
    authz,
    error::Result,
    models::user::UserRecord,
    services::auth as auth_service,
    state::AppState,
};

/// The request payload for creating a user.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub client_access: Vec<Uuid>,
}

/// The request payload for updating a user's role and client access.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub role: Role,
    #[serde(default)]
    pub client_access: Vec<Uuid>,
}

/// Creates a user. Admin only.
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Admin)?;

    let user = auth_service::create_user(
        &state.db,
        &payload.username,
        &payload.email,
        &payload.password,
        payload.role,
        &payload.client_access,
    )
    .await?;

    Ok(Json(UserRecord::from(user)))
}

/// Lists all users, without password hashes. Admin only.
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Admin)?;

    let users = auth_service::list_users(&state.db).await?;
    let records: Vec<UserRecord> = users.into_iter().map(UserRecord::from).collect();
    Ok(Json(records))
}

/// Updates a user's role and client access. Admin only.
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Admin)?;

    let user = auth_service::update_user(
        &state.db,
        user_id,
        payload.role,
        &payload.client_access,
    )
    .await?;

    Ok(Json(UserRecord::from(user)))
}

/// Deletes a user. Admin only.
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Admin)?;

    auth_service::delete_user(&state.db, user_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
