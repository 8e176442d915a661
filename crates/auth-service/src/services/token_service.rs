//! Session token issuance and validation.
//!
//! Tokens are EdDSA-signed JWTs carrying `{iat, exp, payload}` where
//! `payload` is the opaque serialized session context. The signed artifact
//! is base64-encoded once more for header transport.

use crate::crypto::{self, Claims, MAX_TOKEN_SIZE_BYTES};
use crate::errors::AuthError;
use crate::keys::KeyManager;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct TokenService {
    keys: Arc<KeyManager>,
    default_ttl_seconds: i64,
}

impl TokenService {
    pub fn new(keys: Arc<KeyManager>, default_ttl_seconds: i64) -> Self {
        Self {
            keys,
            default_ttl_seconds,
        }
    }

    /// Issue a token for `payload` with the configured session lifetime.
    pub fn issue(&self, payload: &str) -> Result<String, AuthError> {
        self.issue_with_ttl(payload, self.default_ttl_seconds)
    }

    /// Issue a token for `payload` expiring `ttl_seconds` from now.
    pub fn issue_with_ttl(&self, payload: &str, ttl_seconds: i64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iat: now,
            exp: now + ttl_seconds,
            payload: payload.to_string(),
        };

        let jwt = crypto::sign_token(&claims, self.keys.encoding_key())?;
        Ok(general_purpose::STANDARD.encode(jwt.as_bytes()))
    }

    /// Validate a transport-encoded token and return its claims.
    ///
    /// Malformed encoding, bad signature, foreign signing algorithm and
    /// expiry all collapse to `AuthError::Unauthorized`: a caller must not
    /// be able to distinguish them.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        // Size check on the outer encoding before decoding anything.
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            return Err(AuthError::Unauthorized);
        }

        let jwt_bytes = general_purpose::STANDARD.decode(token).map_err(|e| {
            tracing::debug!(target: "auth.token", error = %e, "invalid token transport encoding");
            AuthError::Unauthorized
        })?;
        let jwt = String::from_utf8(jwt_bytes).map_err(|_| AuthError::Unauthorized)?;

        crypto::verify_token(&jwt, self.keys.decoding_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    // Shadow the crate-local copies with the externally-linked build so the
    // types match what `auth_test_utils` fixtures return.
    use auth_service::errors::AuthError;
    use auth_service::services::token_service::TokenService;
    use auth_test_utils::fixtures;

    fn service() -> TokenService {
        TokenService::new(Arc::new(fixtures::key_manager()), 60)
    }

    #[test]
    fn issue_validate_round_trip() {
        let tokens = service();
        let payload = r#"{"id":"u1","version":3}"#;

        let token = tokens.issue(payload).unwrap();
        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.payload, payload);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let tokens = service();
        let token = tokens.issue_with_ttl("payload", -60).unwrap();
        assert!(matches!(
            tokens.validate(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn garbage_is_unauthorized() {
        let tokens = service();
        assert!(matches!(
            tokens.validate("not-base64-!!!"),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(tokens.validate(""), Err(AuthError::Unauthorized)));
        // Valid base64, but not a JWT underneath.
        let bogus = general_purpose::STANDARD.encode(b"hello world");
        assert!(matches!(
            tokens.validate(&bogus),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn tampered_token_is_unauthorized() {
        let tokens = service();
        let token = tokens.issue(r#"{"id":"u1","version":3}"#).unwrap();

        // Flipping any single byte of the signed artifact must fail
        // validation, even where the decoded claims would still satisfy
        // expiry checks.
        for tampered in fixtures::tamper_each_byte(&token).into_iter().take(32) {
            assert!(
                matches!(tokens.validate(&tampered), Err(AuthError::Unauthorized)),
                "tampered token unexpectedly validated"
            );
        }
    }

    #[test]
    fn token_from_foreign_keypair_is_unauthorized() {
        let tokens = service();
        let other = TokenService::new(Arc::new(fixtures::key_manager()), 60);

        let token = other.issue("payload").unwrap();
        assert!(matches!(
            tokens.validate(&token),
            Err(AuthError::Unauthorized)
        ));
    }
}
