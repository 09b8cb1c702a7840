//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use super::constants::{
    DEFAULT_DATABASE_PORT, DEFAULT_DATABASE_URL, DEFAULT_JWT_ALGORITHM,
    DEFAULT_JWT_EXPIRATION_MINUTES, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MAX_JWT_EXPIRATION_MINUTES, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Insecure signing key used only by debug builds when none is configured
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub jwt_expiration_minutes: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` when present).
    ///
    /// # Errors
    /// Fails if `JWT_SECRET_KEY` is missing in a release build, is shorter than
    /// the minimum length, or if `JWT_ALGORITHM` is not an HMAC algorithm.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET_KEY") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET_KEY not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => {
                return Err(AppError::configuration(
                    "JWT_SECRET_KEY environment variable must be set in production",
                ))
            }
        };

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "JWT_SECRET_KEY must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        let algorithm_name =
            lookup("JWT_ALGORITHM").unwrap_or_else(|| DEFAULT_JWT_ALGORITHM.to_string());
        let jwt_algorithm = parse_hmac_algorithm(&algorithm_name)?;

        let jwt_expiration_minutes = match lookup("JWT_ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(value) => parse_expiration_minutes(&value)?,
            None => DEFAULT_JWT_EXPIRATION_MINUTES,
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(value) => value.parse().map_err(|_| {
                AppError::configuration(format!("SERVER_PORT is not a valid port: {}", value))
            })?,
            None => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            database_url: database_url(&lookup),
            jwt_secret,
            jwt_algorithm,
            jwt_expiration_minutes,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port,
        })
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// `DATABASE_URL` wins; otherwise compose from the `DB_*` parts.
fn database_url<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL") {
        return url;
    }

    match (
        lookup("DB_USER"),
        lookup("DB_PASSWORD"),
        lookup("DB_HOST"),
        lookup("DB_DATABASE"),
    ) {
        (Some(user), Some(password), Some(host), Some(database)) => {
            let port = lookup("DB_PORT").unwrap_or_else(|| DEFAULT_DATABASE_PORT.to_string());
            format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, database)
        }
        _ => DEFAULT_DATABASE_URL.to_string(),
    }
}

fn parse_hmac_algorithm(name: &str) -> AppResult<Algorithm> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|_| AppError::configuration(format!("Unknown JWT_ALGORITHM: {}", name)))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(AppError::configuration(format!(
            "JWT_ALGORITHM {:?} needs a key pair; only HS256, HS384 and HS512 are supported",
            other
        ))),
    }
}

/// Token lifetime in minutes, between one minute and one year.
fn parse_expiration_minutes(value: &str) -> AppResult<i64> {
    let minutes: i64 = value.parse().map_err(|_| {
        AppError::configuration(format!(
            "JWT_ACCESS_TOKEN_EXPIRE_MINUTES is not a number: {}",
            value
        ))
    })?;

    if !(1..=MAX_JWT_EXPIRATION_MINUTES).contains(&minutes) {
        return Err(AppError::configuration(format!(
            "JWT_ACCESS_TOKEN_EXPIRE_MINUTES must be between 1 and {}, got {}",
            MAX_JWT_EXPIRATION_MINUTES, minutes
        )));
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "a-test-secret-that-is-long-enough!!";

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("JWT_SECRET_KEY", SECRET)]).unwrap();
        assert_eq!(config.jwt_algorithm, Algorithm::HS256);
        assert_eq!(config.jwt_expiration_minutes, 30);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_database_url_from_parts() {
        let config = config_from(&[
            ("JWT_SECRET_KEY", SECRET),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "pw"),
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_DATABASE", "identity"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://app:pw@db:6543/identity");
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = config_from(&[
            ("JWT_SECRET_KEY", SECRET),
            ("DATABASE_URL", "postgres://x/y"),
            ("DB_USER", "app"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "postgres://x/y");
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = config_from(&[("JWT_SECRET_KEY", "short")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let result = config_from(&[("JWT_SECRET_KEY", SECRET), ("JWT_ALGORITHM", "RS256")]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_bad_expiry_rejected() {
        let result = config_from(&[
            ("JWT_SECRET_KEY", SECRET),
            ("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", "soon"),
        ]);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_out_of_range_expiry_rejected() {
        for value in ["0", "-5", "525601", "9223372036854775807"] {
            let result = config_from(&[
                ("JWT_SECRET_KEY", SECRET),
                ("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", value),
            ]);
            assert!(
                matches!(result, Err(AppError::Configuration(_))),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_expiry_bounds_accepted() {
        for (value, expected) in [("1", 1), ("525600", MAX_JWT_EXPIRATION_MINUTES)] {
            let config = config_from(&[
                ("JWT_SECRET_KEY", SECRET),
                ("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", value),
            ])
            .unwrap();
            assert_eq!(config.jwt_expiration_minutes, expected);
        }
    }

    #[test]
    fn test_bad_server_port_rejected() {
        for value in ["http", "70000", "-1"] {
            let result = config_from(&[("JWT_SECRET_KEY", SECRET), ("SERVER_PORT", value)]);
            assert!(matches!(result, Err(AppError::Configuration(_))));
        }

        let config = config_from(&[("JWT_SECRET_KEY", SECRET), ("SERVER_PORT", "8080")]).unwrap();
        assert_eq!(config.server_port, 8080);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = config_from(&[("JWT_SECRET_KEY", SECRET)]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("[REDACTED]"));
    }
}
