use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

pub const MIN_BCRYPT_COST: u32 = 10;
pub const MAX_BCRYPT_COST: u32 = 14;
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Default PBKDF2 iteration count for unwrapping the signing key.
pub const DEFAULT_KEY_DERIVATION_ITERATIONS: u32 = 50_000;

/// Default session lifetime: 12 hours.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 43_200;

/// Default bound on a single revocation-store round trip.
pub const DEFAULT_REVOCATION_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub private_key_path: String,
    pub public_key_path: String,
    /// Factor fed into PBKDF2 to derive the key-wrapping key.
    pub key_derivation_factor: SecretString,
    pub key_derivation_iterations: u32,
    pub token_ttl_seconds: i64,
    pub redis_url: String,
    pub revocation_timeout_ms: u64,
    pub bcrypt_cost: u32,
    pub user_directory_path: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

fn parse_var<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match vars.get(name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("{e}"),
        }),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |name: &str| -> Result<String, ConfigError> {
            vars.get(name)
                .cloned()
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8086".to_string());

        let private_key_path = required("PRIVATE_KEY_PATH")?;
        let public_key_path = required("PUBLIC_KEY_PATH")?;
        let key_derivation_factor = SecretString::from(required("KEY_DERIVATION_FACTOR")?);

        let key_derivation_iterations = parse_var(
            vars,
            "KEY_DERIVATION_ITERATIONS",
            DEFAULT_KEY_DERIVATION_ITERATIONS,
        )?;
        if key_derivation_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                name: "KEY_DERIVATION_ITERATIONS".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }

        let token_ttl_seconds = parse_var(vars, "TOKEN_TTL_SECONDS", DEFAULT_TOKEN_TTL_SECONDS)?;
        if token_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "TOKEN_TTL_SECONDS".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let redis_url = vars
            .get("REDIS_URL")
            .cloned()
            .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string());

        let revocation_timeout_ms = parse_var(
            vars,
            "REVOCATION_TIMEOUT_MS",
            DEFAULT_REVOCATION_TIMEOUT_MS,
        )?;

        let bcrypt_cost = parse_var(vars, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST".to_string(),
                reason: format!(
                    "must be {}-{}, got {}",
                    MIN_BCRYPT_COST, MAX_BCRYPT_COST, bcrypt_cost
                ),
            });
        }

        let user_directory_path = vars
            .get("USER_DIRECTORY_PATH")
            .cloned()
            .unwrap_or_else(|| "/etc/account-auth/users.json".to_string());

        Ok(Config {
            bind_address,
            private_key_path,
            public_key_path,
            key_derivation_factor,
            key_derivation_iterations,
            token_ttl_seconds,
            redis_url,
            revocation_timeout_ms,
            bcrypt_cost,
            user_directory_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            ("PRIVATE_KEY_PATH".to_string(), "/keys/signing.enc".to_string()),
            ("PUBLIC_KEY_PATH".to_string(), "/keys/signing.pub".to_string()),
            ("KEY_DERIVATION_FACTOR".to_string(), "factor".to_string()),
        ])
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(&base_vars()).expect("config should load");

        assert_eq!(config.bind_address, "0.0.0.0:8086");
        assert_eq!(
            config.key_derivation_iterations,
            DEFAULT_KEY_DERIVATION_ITERATIONS
        );
        assert_eq!(config.token_ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert_eq!(config.revocation_timeout_ms, DEFAULT_REVOCATION_TIMEOUT_MS);
        assert_eq!(config.bcrypt_cost, DEFAULT_BCRYPT_COST);
    }

    #[test]
    fn test_from_vars_missing_private_key_path() {
        let mut vars = base_vars();
        vars.remove("PRIVATE_KEY_PATH");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "PRIVATE_KEY_PATH"));
    }

    #[test]
    fn test_from_vars_missing_derivation_factor() {
        let mut vars = base_vars();
        vars.remove("KEY_DERIVATION_FACTOR");

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "KEY_DERIVATION_FACTOR")
        );
    }

    #[test]
    fn test_from_vars_overrides() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("KEY_DERIVATION_ITERATIONS".to_string(), "1000".to_string());
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "60".to_string());
        vars.insert("REVOCATION_TIMEOUT_MS".to_string(), "500".to_string());

        let config = Config::from_vars(&vars).expect("config should load");
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.key_derivation_iterations, 1000);
        assert_eq!(config.token_ttl_seconds, 60);
        assert_eq!(config.revocation_timeout_ms, 500);
    }

    #[test]
    fn test_from_vars_zero_iterations_rejected() {
        let mut vars = base_vars();
        vars.insert("KEY_DERIVATION_ITERATIONS".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "KEY_DERIVATION_ITERATIONS"
        ));
    }

    #[test]
    fn test_from_vars_non_positive_ttl_rejected() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "0".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "TOKEN_TTL_SECONDS"
        ));
    }

    #[test]
    fn test_from_vars_bcrypt_cost_out_of_range() {
        let mut vars = base_vars();
        vars.insert("BCRYPT_COST".to_string(), "9".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name, .. }) if name == "BCRYPT_COST"
        ));
    }

    #[test]
    fn test_from_vars_unparsable_number() {
        let mut vars = base_vars();
        vars.insert("TOKEN_TTL_SECONDS".to_string(), "soon".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
