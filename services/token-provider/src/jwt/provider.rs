//! Token issuance, authentication and validation.

use crate::config::JwtConfig;
use crate::error::TokenError;
use crate::jwt::claims::TokenClaims;
use crate::jwt::key::SigningKey;
use crate::jwt::validation::{InvalidTokenCause, TokenVerifier, ValidationOutcome};
use crate::metrics::SecurityMeters;
use crate::security::{Authentication, GrantedAuthority};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, Header};
use tracing::{error, trace};

/// Issues and validates HS512 session tokens with one immutable key.
///
/// Safe to share across threads; wrap it in an `Arc` to hand it to the
/// middleware layers.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    key: SigningKey,
    verifier: TokenVerifier,
    token_validity_ms: i64,
    token_validity_remember_me_ms: i64,
    meters: SecurityMeters,
}

impl TokenProvider {
    /// Create a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured secret cannot be turned into a key.
    pub fn new(config: &JwtConfig, meters: SecurityMeters) -> Result<Self, TokenError> {
        let key = SigningKey::from_config(config)?;
        Ok(Self::with_key(key, config, meters))
    }

    /// Create a provider around an already derived key.
    ///
    /// Only the validity windows are read from `config`.
    #[must_use]
    pub fn with_key(key: SigningKey, config: &JwtConfig, meters: SecurityMeters) -> Self {
        let verifier = TokenVerifier::new(&key);
        Self {
            key,
            verifier,
            token_validity_ms: config.token_validity_ms,
            token_validity_remember_me_ms: config.token_validity_remember_me_ms,
            meters,
        }
    }

    /// Issue a signed token for `authentication`.
    ///
    /// The token expires after the remember-me window when `remember_me` is
    /// set, otherwise after the session window.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn create_token(
        &self,
        authentication: &Authentication,
        remember_me: bool,
    ) -> Result<String, TokenError> {
        let validity_ms = if remember_me {
            self.token_validity_remember_me_ms
        } else {
            self.token_validity_ms
        };

        let authorities = authentication.authority_names();
        let claims = TokenClaims::new(
            authentication.name(),
            authorities.as_slice(),
            Utc::now().timestamp_millis(),
            validity_ms,
        );

        let token = encode(&Header::new(Algorithm::HS512), &claims, self.key.encoding_key())?;
        trace!(subject = %claims.sub, exp = claims.exp, "Issued JWT token");
        Ok(token)
    }

    /// Parse a token into an authentication, failing on the first problem.
    ///
    /// The returned authentication carries the raw token as credentials.
    /// Nothing is counted here; use [`Self::validate_token`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Authentication`] with the rejection cause.
    pub fn authenticate(&self, token: &str) -> Result<Authentication, TokenError> {
        let claims = self
            .verifier
            .verify(token)
            .into_result()
            .map_err(TokenError::authentication)?;

        let authorities = claims
            .authority_names()
            .map(GrantedAuthority::new)
            .collect();

        Ok(Authentication::new(claims.sub, token, authorities))
    }

    /// Check a token and record the rejection cause.
    ///
    /// Never fails: every problem becomes `false`. Expired, malformed,
    /// unsupported and bad-signature tokens are counted; blank input is only
    /// logged.
    #[must_use]
    pub fn validate_token(&self, token: &str) -> bool {
        match self.verifier.verify(token) {
            ValidationOutcome::Valid(_) => true,
            ValidationOutcome::Invalid(InvalidTokenCause::IllegalArgument) => {
                error!("Token validation error: empty or illegal token");
                false
            }
            ValidationOutcome::Invalid(cause) => {
                self.meters.track(cause);
                trace!(cause = %cause, "Invalid JWT token.");
                false
            }
        }
    }

    /// Verify a token without touching the metrics.
    #[must_use]
    pub fn verify(&self, token: &str) -> ValidationOutcome {
        self.verifier.verify(token)
    }

    /// Session token validity in milliseconds.
    #[must_use]
    pub const fn token_validity_ms(&self) -> i64 {
        self.token_validity_ms
    }

    /// Remember-me token validity in milliseconds.
    #[must_use]
    pub const fn token_validity_remember_me_ms(&self) -> i64 {
        self.token_validity_remember_me_ms
    }

    /// Metrics this provider records into.
    #[must_use]
    pub const fn meters(&self) -> &SecurityMeters {
        &self.meters
    }
}
