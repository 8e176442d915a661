//! HTTP handlers for the session lifecycle endpoints.

use crate::errors::AuthError;
use crate::models::SessionContext;
use crate::services::session_service::{SessionService, UserDirectory};
use crate::services::token_service::TokenService;
use crate::store::SessionRevocationStore;
use axum::{extract::State, Extension, Json};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub tokens: TokenService,
    pub sessions: SessionService,
    pub revocation: SessionRevocationStore,
    pub directory: Arc<dyn UserDirectory>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub account: String,
    pub password: SecretString,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub id: String,
    pub account: String,
    pub name: String,
    pub password_reset: bool,
    pub department_name: String,
    pub role_name: String,
}

impl SessionResponse {
    fn new(token: String, context: &SessionContext) -> Self {
        Self {
            token,
            id: context.id.clone(),
            account: context.account.clone(),
            name: context.name.clone(),
            password_reset: context.password_reset,
            department_name: context.department_name.clone(),
            role_name: context.role_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: SecretString,
    pub new_password: SecretString,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    if body.account.is_empty() {
        return Err(AuthError::InvalidArgs("account must not be empty".to_string()));
    }
    if body.password.expose_secret().is_empty() {
        return Err(AuthError::InvalidArgs("password must not be empty".to_string()));
    }

    let session = state
        .sessions
        .login(state.directory.as_ref(), &body.account, &body.password)
        .await?;

    Ok(Json(SessionResponse::new(session.token, &session.context)))
}

/// POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
) -> Result<Json<MessageResponse>, AuthError> {
    state.sessions.logout(&context).await?;
    Ok(Json(MessageResponse {
        message: "logged out".to_string(),
    }))
}

/// PUT /api/v1/user/password
///
/// Reachable even while `password_reset` is false; this is the only route
/// the reset gate leaves open.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<SessionContext>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<SessionResponse>, AuthError> {
    let session = state
        .sessions
        .change_password(
            state.directory.as_ref(),
            &context,
            &body.old_password,
            &body.new_password,
        )
        .await?;

    Ok(Json(SessionResponse::new(session.token, &session.context)))
}

/// GET /api/v1/auth/me
pub async fn me(
    Extension(context): Extension<SessionContext>,
) -> Result<Json<SessionContext>, AuthError> {
    Ok(Json(context))
}
