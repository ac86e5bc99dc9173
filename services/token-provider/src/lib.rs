//! Token Provider library.
//!
//! Issues HS512-signed session tokens for authenticated identities, parses
//! them back into an [`Authentication`], and classifies every validation
//! failure by cause for the invalid-token metrics. Tower layers resolve the
//! `Authorization: Bearer` header for services sitting behind the gateway.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod jwt;
pub mod login;
pub mod metrics;
pub mod middleware;
pub mod observability;
pub mod security;

// Re-exports for convenience
pub use config::JwtConfig;
pub use error::TokenError;
pub use jwt::{InvalidTokenCause, SigningKey, TokenProvider, ValidationOutcome};
pub use metrics::SecurityMeters;
pub use security::{Authentication, GrantedAuthority};
