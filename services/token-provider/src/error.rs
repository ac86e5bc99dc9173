//! Error types for the token provider.

use crate::jwt::InvalidTokenCause;
use thiserror::Error;

/// Errors raised while configuring the provider or handling tokens.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TokenError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The presented token could not be turned into an authentication.
    #[error("Authentication failed: {cause}")]
    Authentication {
        /// Why the token was rejected
        cause: InvalidTokenCause,
    },

    /// The token could not be encoded.
    #[error("JWT encoding error: {0}")]
    Encoding(String),

    /// The `Authorization` header is present but is not a bearer header.
    #[error("Invalid token in Authorization header")]
    InvalidAuthorizationHeader,

    /// Metric registration failed.
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl TokenError {
    /// Create a configuration error with the given message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error for the given cause.
    #[must_use]
    pub const fn authentication(cause: InvalidTokenCause) -> Self {
        Self::Authentication { cause }
    }

    /// The rejection cause, if this is an authentication error.
    #[must_use]
    pub const fn cause(&self) -> Option<InvalidTokenCause> {
        match self {
            Self::Authentication { cause } => Some(*cause),
            _ => None,
        }
    }

    /// Stable error code for logs and HTTP error bodies.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Authentication { .. } => "AUTH_TOKEN_INVALID",
            Self::Encoding(_) => "TOKEN_ENCODING_ERROR",
            Self::InvalidAuthorizationHeader => "AUTH_HEADER_INVALID",
            Self::Metrics(_) => "METRICS_ERROR",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<std::convert::Infallible> for TokenError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
