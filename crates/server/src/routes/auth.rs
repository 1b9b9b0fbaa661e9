use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use common::types::Message;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[utoipa::path(
    post, path = "/login", tag = "auth",
    request_body = crate::openapi::LoginDoc,
    responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized"))
)]
pub async fn login(State(state): State<AppState>, Json(input): Json<LoginRequest>) -> Result<Json<TokenResponse>, JsonApiError> {
    if input.username != state.auth.username || input.password != state.auth.password {
        warn!(event = "login_failed", username = %input.username);
        return Err(JsonApiError::unauthorized("Incorrect username or password"));
    }
    info!(event = "login", username = %input.username);
    Ok(Json(TokenResponse { access_token: state.auth.token.clone(), token_type: "bearer".into() }))
}

/// Require `Authorization: Bearer <token>` equal to the configured token.
/// A missing header is 403; a malformed or wrong token is 401.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let Some(header) = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        warn!(path = %path, "missing Authorization header");
        return Err(JsonApiError::forbidden("Not authenticated"));
    };
    match header.strip_prefix("Bearer ") {
        Some(token) if token == state.auth.token => Ok(next.run(req).await),
        Some(_) => {
            warn!(path = %path, "bearer token rejected");
            Err(JsonApiError::unauthorized("Invalid authentication credentials"))
        }
        None => {
            warn!(path = %path, "invalid Authorization format (expect Bearer)");
            Err(JsonApiError::unauthorized("Invalid authentication credentials"))
        }
    }
}

#[utoipa::path(
    get, path = "/protected", tag = "auth",
    responses(
        (status = 200, description = "Authorized"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not authenticated")
    ),
    security(("bearer" = []))
)]
pub async fn protected() -> Json<Message> {
    Json(Message::new("This is a protected route"))
}
