use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::{error::Result, services::auth as auth_service, state::AppState};

/// The request payload for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Handles user login, returning a 24-hour session token.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let token = auth_service::authenticate(
        &state.db,
        &state.config,
        &payload.username,
        &payload.password,
    )
    .await?;

    Ok(Json(LoginResponse { token }))
}
