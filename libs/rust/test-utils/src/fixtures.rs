//! Test fixtures with sample data.
//!
//! Secrets, identities and tokens crafted outside the provider so tests can
//! feed it every kind of broken input.

use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

/// One minute in milliseconds.
pub const ONE_MINUTE_MS: i64 = 60_000;

/// Base64 secret shared by most tests (65 bytes once decoded).
pub const BASE64_SECRET: &str =
    "bXktc2VjcmV0LWtleS13aGljaC1zaG91bGQtYmUtY2hhbmdlZC1pbi1wcm9kdWN0aW9uLWFuZC1iZS1iYXNlNjQ=";

/// Base64 secret the provider under test never sees (65 bytes once decoded).
pub const OTHER_BASE64_SECRET: &str =
    "YW5vdGhlci1zZWNyZXQta2V5LXRoYXQtdGhlLXZlcmlmaWVyLWhhcy1uZXZlci1zZWVuLWJlZm9yZS02NGJ5dGU=";

/// Raw (not base64) secret of exactly 32 bytes.
pub const RAW_SECRET: &str = "NwskoUmKHZtzGRKJKVjsJF7BtQMMxNWi";

/// Decode a base64 fixture secret.
///
/// # Panics
///
/// Panics if `secret` is not valid base64.
#[must_use]
pub fn decode_secret(secret: &str) -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(secret)
        .expect("fixture secret must be valid base64")
}

/// A login with its authority names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleIdentity {
    /// Login name
    pub login: String,
    /// Authority names
    pub authorities: Vec<String>,
}

impl SampleIdentity {
    /// The anonymous principal.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new("anonymous", &["ROLE_ANONYMOUS"])
    }

    /// An administrator holding both roles.
    #[must_use]
    pub fn admin() -> Self {
        Self::new("admin", &["ROLE_ADMIN", "ROLE_USER"])
    }

    /// A regular user.
    #[must_use]
    pub fn user() -> Self {
        Self::new("user", &["ROLE_USER"])
    }

    fn new(login: &str, authorities: &[&str]) -> Self {
        Self {
            login: login.to_string(),
            authorities: authorities.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Serialize)]
struct SubjectClaims<'a> {
    sub: &'a str,
    exp: i64,
}

/// HS512 token for `subject` signed with an arbitrary key.
///
/// # Panics
///
/// Panics if encoding fails.
#[must_use]
pub fn token_signed_with(secret: &[u8], subject: &str, validity_ms: i64) -> String {
    let claims = SubjectClaims {
        sub: subject,
        exp: (Utc::now().timestamp_millis() + validity_ms).div_euclid(1000),
    };
    encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .expect("fixture token must encode")
}

/// Correctly signed token whose payload is the plain text `payload`.
///
/// # Panics
///
/// Panics if signing fails.
#[must_use]
pub fn payload_only_token(secret: &[u8], algorithm: Algorithm) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = serde_json::to_vec(&Header::new(algorithm)).expect("header must serialize");
    let message = format!("{}.{}", engine.encode(header), engine.encode(b"payload"));
    let signature = jsonwebtoken::crypto::sign(
        message.as_bytes(),
        &EncodingKey::from_secret(secret),
        algorithm,
    )
    .expect("fixture token must sign");
    format!("{message}.{signature}")
}

/// `token` with its signature stripped, keeping the trailing dot.
#[must_use]
pub fn unsigned(token: &str) -> String {
    match token.rsplit_once('.') {
        Some((message, _)) => format!("{message}."),
        None => format!("{token}."),
    }
}

/// `token` with its signature segment dropped entirely.
#[must_use]
pub fn without_signature_segment(token: &str) -> String {
    token
        .rsplit_once('.')
        .map_or_else(|| token.to_string(), |(message, _)| message.to_string())
}

/// `token` with a stray character in front of the header.
#[must_use]
pub fn with_prefix_char(token: &str) -> String {
    format!("X{token}")
}

/// `token` missing its first character.
#[must_use]
pub fn without_first_char(token: &str) -> String {
    token.chars().skip(1).collect()
}

/// `token` with the last character of its signature removed.
#[must_use]
pub fn with_signature_char_removed(token: &str) -> String {
    let mut tampered = token.to_string();
    tampered.pop();
    tampered
}
