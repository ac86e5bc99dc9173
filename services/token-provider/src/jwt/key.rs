//! HMAC signing key derived from the configured secret.

use crate::config::JwtConfig;
use crate::error::TokenError;
use base64::Engine;
use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use tracing::{debug, warn};

/// Smallest accepted HMAC key, in bytes (256 bits).
pub const MIN_KEY_LENGTH: usize = 32;

/// Symmetric key used both to sign and to verify tokens.
///
/// Built once from [`JwtConfig`] and immutable afterwards.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    len: usize,
}

impl SigningKey {
    /// Derive the key from configuration.
    ///
    /// The base64 secret wins when both secrets are set. The raw secret is
    /// used as its UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if no secret is configured, the base64 secret does
    /// not decode, or the key is shorter than [`MIN_KEY_LENGTH`] bytes.
    pub fn from_config(config: &JwtConfig) -> Result<Self, TokenError> {
        let bytes = if let Some(base64_secret) = &config.base64_secret {
            debug!("Using a Base64-encoded JWT secret key");
            base64::engine::general_purpose::STANDARD
                .decode(base64_secret.expose_secret().trim())
                .map_err(|e| TokenError::config(format!("Invalid JWT base64 secret: {e}")))?
        } else if let Some(secret) = &config.secret {
            warn!(
                "Warning: the JWT key used is not Base64-encoded. \
                 We recommend using the JWT_BASE64_SECRET key for optimum security."
            );
            secret.expose_secret().as_bytes().to_vec()
        } else {
            return Err(TokenError::config("No JWT secret configured"));
        };

        Self::from_bytes(&bytes)
    }

    /// Build the key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is shorter than [`MIN_KEY_LENGTH`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.len() < MIN_KEY_LENGTH {
            return Err(TokenError::config(format!(
                "JWT key must be at least {MIN_KEY_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            len: bytes.len(),
        })
    }

    /// Key used to sign new tokens.
    #[must_use]
    pub const fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Key used to verify presented tokens.
    #[must_use]
    pub const fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    /// Key length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false: construction rejects short keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 65 bytes once decoded
    const BASE64_SECRET: &str =
        "bXktc2VjcmV0LWtleS13aGljaC1zaG91bGQtYmUtY2hhbmdlZC1pbi1wcm9kdWN0aW9uLWFuZC1iZS1iYXNlNjQ=";

    #[test]
    fn test_key_from_raw_secret() {
        let secret = "NwskoUmKHZtzGRKJKVjsJF7BtQMMxNWi";
        let config = JwtConfig::default().with_secret(secret);

        let key = SigningKey::from_config(&config).unwrap();
        assert_eq!(key.len(), secret.len());
    }

    #[test]
    fn test_key_from_base64_secret() {
        let config = JwtConfig::default().with_base64_secret(BASE64_SECRET);

        let key = SigningKey::from_config(&config).unwrap();
        let expected = base64::engine::general_purpose::STANDARD
            .decode(BASE64_SECRET)
            .unwrap();
        assert_eq!(key.len(), expected.len());
    }

    #[test]
    fn test_base64_secret_preferred() {
        let config = JwtConfig::default()
            .with_secret("NwskoUmKHZtzGRKJKVjsJF7BtQMMxNWi-longer-raw-secret")
            .with_base64_secret(BASE64_SECRET);

        let key = SigningKey::from_config(&config).unwrap();
        assert_eq!(key.len(), 65);
    }

    #[test]
    fn test_missing_secret_rejected() {
        let result = SigningKey::from_config(&JwtConfig::default());
        assert!(matches!(result, Err(TokenError::Config(_))));
    }

    #[test]
    fn test_short_key_rejected() {
        let config = JwtConfig::default().with_secret("too-short");
        assert!(SigningKey::from_config(&config).is_err());
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let config = JwtConfig::default().with_base64_secret("not base64 !!");
        assert!(SigningKey::from_config(&config).is_err());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = SigningKey::from_bytes(&[7u8; 64]).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("len: 64"));
        assert!(!key.is_empty());
    }
}
