//! JWT configuration for the token provider.
//!
//! Loaded from environment variables (with `.env` support) or assembled with
//! the builder methods. Validity windows are kept in signed milliseconds so a
//! negative window can produce an already-expired token.

use crate::error::TokenError;
use secrecy::SecretString;
use std::env;

/// Default session token validity: one day.
pub const DEFAULT_TOKEN_VALIDITY_SECONDS: i64 = 86_400;

/// Default remember-me token validity: thirty days.
pub const DEFAULT_TOKEN_VALIDITY_SECONDS_FOR_REMEMBER_ME: i64 = 2_592_000;

/// Secret and validity settings used to build a [`crate::TokenProvider`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded signing secret (preferred)
    pub base64_secret: Option<SecretString>,
    /// Raw UTF-8 signing secret, used when no base64 secret is set
    pub secret: Option<SecretString>,
    /// Session token validity in milliseconds
    pub token_validity_ms: i64,
    /// Remember-me token validity in milliseconds
    pub token_validity_remember_me_ms: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            base64_secret: None,
            secret: None,
            token_validity_ms: DEFAULT_TOKEN_VALIDITY_SECONDS * 1000,
            token_validity_remember_me_ms: DEFAULT_TOKEN_VALIDITY_SECONDS_FOR_REMEMBER_ME * 1000,
        }
    }
}

impl JwtConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `JWT_BASE64_SECRET`, `JWT_SECRET`, `JWT_TOKEN_VALIDITY_SECONDS`
    /// and `JWT_TOKEN_VALIDITY_SECONDS_FOR_REMEMBER_ME`. Empty secrets count
    /// as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a validity value is not an integer.
    pub fn from_env() -> Result<Self, TokenError> {
        dotenvy::dotenv().ok();

        let token_validity_seconds =
            parse_env("JWT_TOKEN_VALIDITY_SECONDS", DEFAULT_TOKEN_VALIDITY_SECONDS)?;
        let remember_me_seconds = parse_env(
            "JWT_TOKEN_VALIDITY_SECONDS_FOR_REMEMBER_ME",
            DEFAULT_TOKEN_VALIDITY_SECONDS_FOR_REMEMBER_ME,
        )?;

        Ok(Self {
            base64_secret: secret_env("JWT_BASE64_SECRET"),
            secret: secret_env("JWT_SECRET"),
            token_validity_ms: seconds_to_millis("JWT_TOKEN_VALIDITY_SECONDS", token_validity_seconds)?,
            token_validity_remember_me_ms: seconds_to_millis(
                "JWT_TOKEN_VALIDITY_SECONDS_FOR_REMEMBER_ME",
                remember_me_seconds,
            )?,
        })
    }

    /// Set the base64-encoded secret.
    #[must_use]
    pub fn with_base64_secret(mut self, secret: impl Into<String>) -> Self {
        self.base64_secret = non_empty(secret.into());
        self
    }

    /// Set the raw secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = non_empty(secret.into());
        self
    }

    /// Set the session token validity in milliseconds.
    #[must_use]
    pub const fn with_token_validity_ms(mut self, validity_ms: i64) -> Self {
        self.token_validity_ms = validity_ms;
        self
    }

    /// Set the remember-me token validity in milliseconds.
    #[must_use]
    pub const fn with_token_validity_remember_me_ms(mut self, validity_ms: i64) -> Self {
        self.token_validity_remember_me_ms = validity_ms;
        self
    }
}

/// Parse environment variable with default value.
pub(crate) fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, TokenError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| TokenError::config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

fn secret_env(name: &str) -> Option<SecretString> {
    env::var(name).ok().and_then(non_empty)
}

fn non_empty(value: String) -> Option<SecretString> {
    if value.is_empty() {
        None
    } else {
        Some(SecretString::from(value))
    }
}

fn seconds_to_millis(name: &str, seconds: i64) -> Result<i64, TokenError> {
    seconds
        .checked_mul(1000)
        .ok_or_else(|| TokenError::config(format!("{name} is out of range")))
}
