use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Service-wide error type.
///
/// Token and revocation-store failures are deliberately collapsed into the
/// single `Unauthorized` variant at the filter boundary so a caller cannot
/// distinguish "expired" from "revoked" from "forged".
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid args: {0}")]
    InvalidArgs(String),

    #[error("need login")]
    Unauthorized,

    #[error("exceed your authority")]
    ExceedAuthority,

    #[error("need to reset password")]
    NeedResetPassword,

    #[error("cryptographic error: {0}")]
    Crypto(String),

    #[error("revocation store error: {0}")]
    Store(String),

    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::InvalidArgs(detail) => {
                // Caller's fault, safe to detail.
                (StatusCode::BAD_REQUEST, "INVALID_ARGS", detail.clone())
            }
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "need login".to_string(),
            ),
            AuthError::ExceedAuthority => (
                StatusCode::FORBIDDEN,
                "EXCEED_AUTHORITY",
                "exceed your authority".to_string(),
            ),
            AuthError::NeedResetPassword => (
                StatusCode::FORBIDDEN,
                "NEED_RESET_PASSWORD",
                "need to reset password".to_string(),
            ),
            // Infrastructure details never leak to the caller.
            AuthError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CRYPTO_ERROR",
                "an internal cryptographic error occurred".to_string(),
            ),
            AuthError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORE_ERROR",
                "an internal store error occurred".to_string(),
            ),
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "an internal error occurred".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
