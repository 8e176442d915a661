//! Login, logout and password-change orchestration.
//!
//! The business user store is an external collaborator reached through the
//! [`UserDirectory`] seam; this module owns only the credential checks and
//! the session lifecycle around them. Every credential-affecting event
//! bumps the identity's revocation counter, invalidating all outstanding
//! tokens for that identity at once.

use crate::crypto;
use crate::errors::AuthError;
use crate::models::{SessionContext, UserRecord};
use crate::services::token_service::TokenService;
use crate::store::SessionRevocationStore;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

/// Constant-time placeholder verified when the account does not exist, so
/// unknown accounts and wrong passwords take the same time.
const DUMMY_BCRYPT_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Minimal user-store contract the auth core needs. Persistence of user
/// records themselves is out of scope.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_account(&self, account: &str) -> Result<Option<UserRecord>, AuthError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, AuthError>;

    /// Store a new bcrypt hash and mark the password as reset.
    async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), AuthError>;
}

/// A freshly established session: the transport token plus the context it
/// embeds.
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub token: String,
    pub context: SessionContext,
}

#[derive(Clone)]
pub struct SessionService {
    tokens: TokenService,
    revocation: SessionRevocationStore,
    bcrypt_cost: u32,
}

impl SessionService {
    pub fn new(
        tokens: TokenService,
        revocation: SessionRevocationStore,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            tokens,
            revocation,
            bcrypt_cost,
        }
    }

    /// Verify credentials and establish a new session.
    ///
    /// Unknown account, disabled account and wrong password are
    /// indistinguishable to the caller. The bump happens before issuance so
    /// the issued token embeds the identity's newest version; every earlier
    /// session for the identity is invalidated by the same bump.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        directory: &dyn UserDirectory,
        account: &str,
        password: &SecretString,
    ) -> Result<EstablishedSession, AuthError> {
        let user = directory.find_by_account(account).await?;

        // Always run bcrypt, against a dummy hash when the account is
        // unknown, to keep timing uniform.
        let hash_to_verify = match &user {
            Some(u) => u.password_hash.as_str(),
            None => DUMMY_BCRYPT_HASH,
        };
        let password_ok = crypto::verify_password(password.expose_secret(), hash_to_verify)?;

        let user = user.ok_or(AuthError::Unauthorized)?;
        if user.disabled || !password_ok {
            return Err(AuthError::Unauthorized);
        }

        let session = self.establish(&user).await?;
        info!(target: "auth.session", identity_id = %user.id, "login succeeded");
        Ok(session)
    }

    /// Invalidate every outstanding session for the identity.
    #[instrument(skip_all)]
    pub async fn logout(&self, context: &SessionContext) -> Result<(), AuthError> {
        self.revocation.bump(&context.id).await?;
        info!(target: "auth.session", identity_id = %context.id, "logout, sessions revoked");
        Ok(())
    }

    /// Change the password and re-establish the session.
    ///
    /// Bumping the counter revokes every other device's session; the caller
    /// continues with the freshly issued token.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        directory: &dyn UserDirectory,
        context: &SessionContext,
        old_password: &SecretString,
        new_password: &SecretString,
    ) -> Result<EstablishedSession, AuthError> {
        if new_password.expose_secret().len() < 8 {
            return Err(AuthError::InvalidArgs(
                "new password must be at least 8 characters".to_string(),
            ));
        }

        let user = directory
            .find_by_id(&context.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !crypto::verify_password(old_password.expose_secret(), &user.password_hash)? {
            return Err(AuthError::InvalidArgs("invalid old password".to_string()));
        }

        let new_hash = crypto::hash_password(new_password.expose_secret(), self.bcrypt_cost)?;
        directory.update_password(&user.id, &new_hash).await?;

        // Re-read so the new session reflects the directory's view,
        // password_reset included.
        let user = directory
            .find_by_id(&context.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let session = self.establish(&user).await?;
        info!(target: "auth.session", identity_id = %user.id, "password changed, sessions revoked");
        Ok(session)
    }

    async fn establish(&self, user: &UserRecord) -> Result<EstablishedSession, AuthError> {
        let version = self.revocation.bump(&user.id).await?;
        let context = user.session_context(version);
        let token = self.tokens.issue(&context.to_payload()?)?;
        Ok(EstablishedSession { token, context })
    }
}
