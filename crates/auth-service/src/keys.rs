//! Signing keypair lifecycle.
//!
//! The keypair is loaded exactly once at startup, before the server begins
//! accepting requests, and is immutable afterwards. Any failure here is
//! fatal: the process must not serve requests without a valid keypair.
//! There is no runtime rotation.

use crate::crypto;
use crate::errors::AuthError;
use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::SecretString;
use std::fmt;
use std::path::Path;
use tracing::info;

/// Immutable signing keypair, constructed once in `main` and shared by
/// reference (`Arc`) with the token service and filters. No ambient
/// global state.
pub struct KeyManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_key_pem: String,
}

impl fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl KeyManager {
    /// Load the keypair from disk.
    ///
    /// The private key file holds `base64(salt || nonce || ciphertext+tag)`
    /// wrapping a PEM-encoded PKCS#8 Ed25519 private key; the wrapping key
    /// is derived from `factor` via PBKDF2. The public key file is
    /// plaintext PEM.
    pub fn load(
        private_key_path: &Path,
        public_key_path: &Path,
        factor: &SecretString,
        iterations: u32,
    ) -> Result<Self, AuthError> {
        let wrapped = std::fs::read_to_string(private_key_path).map_err(|e| {
            AuthError::Crypto(format!(
                "failed to read private key file {}: {}",
                private_key_path.display(),
                e
            ))
        })?;

        use base64::{engine::general_purpose, Engine as _};
        let blob = general_purpose::STANDARD
            .decode(wrapped.trim())
            .map_err(|e| AuthError::Crypto(format!("invalid private key encoding: {}", e)))?;

        let private_pem_bytes = crypto::open_secret(&blob, factor, iterations)?;
        let private_pem = String::from_utf8(private_pem_bytes)
            .map_err(|_| AuthError::Crypto("decrypted private key is not UTF-8".to_string()))?;
        let private_der = crypto::pem_to_der(&private_pem)?;

        // Reject unparsable key material up front rather than on first sign.
        ring::signature::Ed25519KeyPair::from_pkcs8(&private_der)
            .map_err(|e| AuthError::Crypto(format!("invalid private key: {}", e)))?;

        let public_key_pem = std::fs::read_to_string(public_key_path).map_err(|e| {
            AuthError::Crypto(format!(
                "failed to read public key file {}: {}",
                public_key_path.display(),
                e
            ))
        })?;
        let public_der = crypto::pem_to_der(&public_key_pem)?;

        info!("signing keypair loaded");

        Ok(Self {
            encoding_key: EncodingKey::from_ed_der(&private_der),
            decoding_key: DecodingKey::from_ed_der(&public_der),
            public_key_pem,
        })
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// Build a KeyManager directly from a generated keypair, bypassing disk.
    /// Intended for fixtures and embedded use.
    pub fn from_keypair(public_key_pem: &str, private_key_der: &[u8]) -> Result<Self, AuthError> {
        let public_der = crypto::pem_to_der(public_key_pem)?;
        Ok(Self {
            encoding_key: EncodingKey::from_ed_der(private_key_der),
            decoding_key: DecodingKey::from_ed_der(&public_der),
            public_key_pem: public_key_pem.to_string(),
        })
    }
}

/// Generate a keypair and write it to disk in the at-rest format expected
/// by [`KeyManager::load`]: wrapped private key plus plaintext public PEM.
///
/// Used by provisioning and by test fixtures.
pub fn provision_keypair(
    private_key_path: &Path,
    public_key_path: &Path,
    factor: &SecretString,
    iterations: u32,
) -> Result<(), AuthError> {
    use base64::{engine::general_purpose, Engine as _};

    let (public_pem, private_der) = crypto::generate_signing_key()?;
    let private_pem = crypto::der_to_pem("PRIVATE KEY", &private_der);

    let blob = crypto::seal_secret(private_pem.as_bytes(), factor, iterations)?;
    let wrapped = general_purpose::STANDARD.encode(&blob);

    std::fs::write(private_key_path, wrapped).map_err(|e| {
        AuthError::Crypto(format!(
            "failed to write private key file {}: {}",
            private_key_path.display(),
            e
        ))
    })?;
    std::fs::write(public_key_path, public_pem).map_err(|e| {
        AuthError::Crypto(format!(
            "failed to write public key file {}: {}",
            public_key_path.display(),
            e
        ))
    })?;

    Ok(())
}
