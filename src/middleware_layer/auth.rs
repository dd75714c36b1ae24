use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::{
    auth::token,
    error::{AppError, Result},
    state::AppState,
};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// A middleware that requires a valid session token to be present.
///
/// On success the verified claims are inserted into the request extensions
/// for handlers to read; any missing, malformed or expired token stops the
/// request here with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = extract_bearer_token(&request).ok_or_else(|| {
        tracing::debug!("❌ No bearer token on request");
        AppError::Authentication("Missing bearer token".to_string())
    })?;

    let claims = token::decode_token(token, &state.config.jwt_secret)?;

    tracing::debug!("✅ Authenticated request for: {}", claims.username);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
