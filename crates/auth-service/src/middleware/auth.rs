//! Request filters exposed to the routing layer.
//!
//! `authenticate` turns a raw `Authorization` header into a populated
//! [`SessionContext`] or a rejection; `authorize` checks route-declared
//! permission requirements plus the password-reset gate against that
//! context. Any token or revocation-store problem is normalized to
//! `AuthError::Unauthorized` here so an attacker cannot distinguish
//! "expired" from "revoked" from "forged".

use crate::errors::AuthError;
use crate::handlers::auth_handler::AppState;
use crate::models::SessionContext;
use crate::permissions::{self, Requirement};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

/// Authentication filter: Bearer token to session context.
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthorized)?;

    let claims = state.tokens.validate(token)?;
    let context = SessionContext::from_payload(&claims.payload)?;

    // Fail closed: a store miss, mismatch or error all reject the token.
    if !state
        .revocation
        .is_valid(&context.id, context.version)
        .await
    {
        debug!(
            target: "auth.middleware",
            identity_id = %context.id,
            presented_version = context.version,
            "session version invalid"
        );
        return Err(AuthError::Unauthorized);
    }

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

/// Per-route authorization state.
#[derive(Clone, Copy)]
pub struct RouteGuard {
    /// Requirements that must all hold (logical AND).
    pub requirements: &'static [Requirement],
    /// Whether the route stays reachable while `password_reset` is false.
    /// Only the password update route sets this.
    pub allow_unreset: bool,
}

impl RouteGuard {
    pub const fn require(requirements: &'static [Requirement]) -> Self {
        Self {
            requirements,
            allow_unreset: false,
        }
    }
}

/// Authorization filter: route requirements and the password-reset gate.
///
/// Runs after [`authenticate`], which placed the session context in the
/// request extensions.
pub async fn authorize(
    State(guard): State<RouteGuard>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthError> {
    let context = req
        .extensions()
        .get::<SessionContext>()
        .ok_or(AuthError::Unauthorized)?;

    if !permissions::check(&context.permissions, guard.requirements) {
        debug!(
            target: "auth.middleware",
            identity_id = %context.id,
            "permission requirements not met"
        );
        return Err(AuthError::ExceedAuthority);
    }

    // Global deny-all gate until the password has been reset.
    if !context.password_reset && !guard.allow_unreset {
        return Err(AuthError::NeedResetPassword);
    }

    Ok(next.run(req).await)
}
