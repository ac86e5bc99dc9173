//! Tower middleware for bearer tokens.
//!
//! [`JwtFilterLayer`] attaches the [`crate::Authentication`] of a valid token
//! to the request extensions. [`JwtRelayLayer`] sits in a gateway and forwards
//! a normalized bearer header to downstream services.

pub mod filter;
pub mod relay;

pub use filter::{JwtFilterLayer, JwtFilterService};
pub use relay::{JwtRelayLayer, JwtRelayService};

use http::header::AUTHORIZATION;
use http::HeaderMap;

/// Scheme prefix of a bearer `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Token carried in the `Authorization: Bearer` header, if any.
///
/// Returns `None` when the header is missing, not valid text, uses another
/// scheme, or carries a blank token.
#[must_use]
pub fn resolve_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.trim().is_empty())
}
