use crate::errors::AuthError;
use crate::permissions::PermissionMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The decoded identity/permission/profile record carried through a request.
///
/// Created at login or reconstructed from a valid token; never mutated in
/// place. Any change (permission edit, password change) requires a new
/// login, which embeds a fresh revocation version.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    /// Identity id.
    pub id: String,
    /// Session revocation version. The token is acceptable only while this
    /// equals the identity's current counter value.
    pub version: i64,
    /// One action bitmask per capability object.
    #[serde(rename = "auth_map")]
    pub permissions: PermissionMap,

    pub account: String,
    pub name: String,
    /// When false the routing layer denies everything except the password
    /// update route.
    pub password_reset: bool,
    pub department: String,
    pub department_name: String,
    pub role: String,
    pub role_name: String,
    pub badge_number: String,
    pub phone: String,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("account", &"[REDACTED]")
            .field("phone", &"[REDACTED]")
            .field("password_reset", &self.password_reset)
            .finish()
    }
}

impl SessionContext {
    /// Serialize into the opaque token payload.
    pub fn to_payload(&self) -> Result<String, AuthError> {
        serde_json::to_string(self)
            .map_err(|e| AuthError::Crypto(format!("session serialization failed: {}", e)))
    }

    /// Reconstruct from a token payload. Failure means the token payload
    /// does not carry a well-formed session, which is a token problem.
    pub fn from_payload(payload: &str) -> Result<Self, AuthError> {
        serde_json::from_str(payload).map_err(|e| {
            tracing::debug!(target: "auth.session", error = %e, "failed to decode session payload");
            AuthError::Unauthorized
        })
    }
}

/// A user row as provided by the `UserDirectory` collaborator. Persistence
/// of these records is out of scope; this is the shape the auth core needs.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub account: String,
    pub name: String,
    /// bcrypt hash.
    pub password_hash: String,
    pub password_reset: bool,
    pub disabled: bool,
    pub permissions: PermissionMap,
    pub department: String,
    pub department_name: String,
    pub role: String,
    pub role_name: String,
    pub badge_number: String,
    pub phone: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("account", &"[REDACTED]")
            .field("password_hash", &"[REDACTED]")
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl UserRecord {
    /// Snapshot this record into a session at the given revocation version.
    pub fn session_context(&self, version: i64) -> SessionContext {
        SessionContext {
            id: self.id.clone(),
            version,
            permissions: self.permissions.clone(),
            account: self.account.clone(),
            name: self.name.clone(),
            password_reset: self.password_reset,
            department: self.department.clone(),
            department_name: self.department_name.clone(),
            role: self.role.clone(),
            role_name: self.role_name.clone(),
            badge_number: self.badge_number.clone(),
            phone: self.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{mask_of, AuthAction, AuthObject};

    fn sample_context() -> SessionContext {
        SessionContext {
            id: "64b0c1f2a3d4e5f601020304".to_string(),
            version: 3,
            permissions: [(
                AuthObject::User,
                mask_of(&[AuthAction::Get, AuthAction::Update]),
            )]
            .into_iter()
            .collect(),
            account: "alice".to_string(),
            name: "Alice".to_string(),
            password_reset: true,
            department: "dep-1".to_string(),
            department_name: "Investigations".to_string(),
            role: "role-1".to_string(),
            role_name: "Operator".to_string(),
            badge_number: "100234".to_string(),
            phone: "13800000000".to_string(),
        }
    }

    #[test]
    fn payload_round_trip_preserves_everything() {
        let ctx = sample_context();
        let payload = ctx.to_payload().unwrap();
        let back = SessionContext::from_payload(&payload).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn payload_uses_auth_map_wire_name() {
        let payload = sample_context().to_payload().unwrap();
        assert!(payload.contains(r#""auth_map":{"19":5}"#));
    }

    #[test]
    fn malformed_payload_is_unauthorized() {
        assert!(matches!(
            SessionContext::from_payload("{not json"),
            Err(AuthError::Unauthorized)
        ));
        assert!(matches!(
            SessionContext::from_payload(r#"{"id":"u1"}"#),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn debug_redacts_profile_fields() {
        let rendered = format!("{:?}", sample_context());
        assert!(!rendered.contains("alice"));
        assert!(!rendered.contains("13800000000"));
    }
}
