//! Token verification returning a tagged outcome.
//!
//! Every failure is classified into exactly one [`InvalidTokenCause`] so the
//! caller can switch on it locally instead of unwinding through error types.

use crate::jwt::claims::TokenClaims;
use crate::jwt::key::SigningKey;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use std::fmt;
use tracing::trace;

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidTokenCause {
    /// Signature is valid but the expiry is in the past
    Expired,
    /// Compact structure cannot be parsed
    Malformed,
    /// Recognized as a token but lacks required structure (unsigned, not a claims set)
    Unsupported,
    /// Signature does not match the configured key
    InvalidSignature,
    /// Empty input or a parser argument fault
    IllegalArgument,
}

impl InvalidTokenCause {
    /// Causes that own a series in the invalid-token metric.
    pub const COUNTED: [Self; 4] = [
        Self::InvalidSignature,
        Self::Expired,
        Self::Unsupported,
        Self::Malformed,
    ];

    /// Value of the `cause` label, or `None` for causes that are not counted.
    #[must_use]
    pub const fn metric_tag(self) -> Option<&'static str> {
        match self {
            Self::IllegalArgument => None,
            other => Some(other.as_str()),
        }
    }

    /// Stable name of the cause.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Malformed => "malformed",
            Self::Unsupported => "unsupported",
            Self::InvalidSignature => "invalid-signature",
            Self::IllegalArgument => "illegal-argument",
        }
    }
}

impl fmt::Display for InvalidTokenCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of verifying one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Signature and expiry checked out
    Valid(TokenClaims),
    /// Rejected for the given cause
    Invalid(InvalidTokenCause),
}

impl ValidationOutcome {
    /// Whether the token was accepted.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Rejection cause, if any.
    #[must_use]
    pub const fn cause(&self) -> Option<InvalidTokenCause> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid(cause) => Some(*cause),
        }
    }

    /// Convert into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the rejection cause for invalid tokens.
    pub fn into_result(self) -> Result<TokenClaims, InvalidTokenCause> {
        match self {
            Self::Valid(claims) => Ok(claims),
            Self::Invalid(cause) => Err(cause),
        }
    }
}

/// Verifies compact HMAC tokens against one key.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier for the given key.
    ///
    /// Any HMAC variant named by the token header is accepted. Expiry is
    /// checked here in milliseconds rather than by the decoder, which only
    /// compares whole seconds.
    #[must_use]
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            key: key.decoding_key().clone(),
            validation,
        }
    }

    /// Parse and verify a token.
    #[must_use]
    pub fn verify(&self, token: &str) -> ValidationOutcome {
        if let Err(cause) = check_structure(token) {
            return ValidationOutcome::Invalid(cause);
        }

        match decode::<TokenClaims>(token, &self.key, &self.validation) {
            Ok(data) if is_expired(&data.claims, Utc::now().timestamp_millis()) => {
                trace!(exp = data.claims.exp, "Token rejected as expired");
                ValidationOutcome::Invalid(InvalidTokenCause::Expired)
            }
            Ok(data) => ValidationOutcome::Valid(data.claims),
            Err(err) => {
                let cause = classify(err.kind());
                trace!(cause = %cause, error = %err, "Token rejected by parser");
                ValidationOutcome::Invalid(cause)
            }
        }
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

/// Checks done before the signature: blank input, unsigned tokens and an
/// unreadable header. Once the header is known to decode, any later JSON
/// failure belongs to the payload.
fn check_structure(token: &str) -> Result<(), InvalidTokenCause> {
    if token.trim().is_empty() {
        return Err(InvalidTokenCause::IllegalArgument);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if let [header, payload, signature] = segments.as_slice() {
        if signature.is_empty() && !header.is_empty() && !payload.is_empty() {
            return Err(InvalidTokenCause::Unsupported);
        }
    }

    decode_header(token)
        .map(|_| ())
        .map_err(|_| InvalidTokenCause::Malformed)
}

/// A token is expired once the current millisecond is past `exp`.
fn is_expired(claims: &TokenClaims, now_ms: i64) -> bool {
    now_ms > claims.exp.saturating_mul(1000)
}

fn classify(kind: &ErrorKind) -> InvalidTokenCause {
    match kind {
        ErrorKind::ExpiredSignature => InvalidTokenCause::Expired,
        ErrorKind::InvalidSignature => InvalidTokenCause::InvalidSignature,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) => InvalidTokenCause::Malformed,
        ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidAlgorithm => InvalidTokenCause::Unsupported,
        _ => InvalidTokenCause::IllegalArgument,
    }
}
