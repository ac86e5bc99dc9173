//! Session token claims, signing key, verification and issuance.

pub mod claims;
pub mod key;
pub mod provider;
pub mod validation;

pub use claims::{TokenClaims, AUTHORITIES_KEY};
pub use key::SigningKey;
pub use provider::TokenProvider;
pub use validation::{InvalidTokenCause, TokenVerifier, ValidationOutcome};
