//! Authenticated principal and authority checks.
//!
//! Services receive the [`Authentication`] through request extensions (see
//! [`crate::middleware`]), so the helpers take it as an `Option` instead of
//! reading an ambient security context.

use std::fmt;

/// Administrator authority.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Regular user authority.
pub const ROLE_USER: &str = "ROLE_USER";
/// Authority carried by anonymous principals.
pub const ROLE_ANONYMOUS: &str = "ROLE_ANONYMOUS";

/// A single granted authority name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrantedAuthority(String);

impl GrantedAuthority {
    /// Create an authority.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Authority name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GrantedAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GrantedAuthority {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An authenticated principal with its credentials and authorities.
///
/// When built from a token, the credentials are the raw token.
#[derive(Clone, PartialEq, Eq)]
pub struct Authentication {
    principal: String,
    credentials: String,
    authorities: Vec<GrantedAuthority>,
}

impl Authentication {
    /// Create an authentication.
    #[must_use]
    pub fn new(
        principal: impl Into<String>,
        credentials: impl Into<String>,
        authorities: Vec<GrantedAuthority>,
    ) -> Self {
        Self {
            principal: principal.into(),
            credentials: credentials.into(),
            authorities,
        }
    }

    /// Principal name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.principal
    }

    /// Credentials (the raw token for token-based authentications).
    #[must_use]
    pub fn credentials(&self) -> &str {
        &self.credentials
    }

    /// Granted authorities, in grant order.
    #[must_use]
    pub fn authorities(&self) -> &[GrantedAuthority] {
        &self.authorities
    }

    /// Granted authority names, in grant order.
    #[must_use]
    pub fn authority_names(&self) -> Vec<&str> {
        self.authorities.iter().map(GrantedAuthority::as_str).collect()
    }

    fn has_any(&self, authorities: &[&str]) -> bool {
        self.authorities
            .iter()
            .any(|granted| authorities.contains(&granted.as_str()))
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("principal", &self.principal)
            .field("credentials", &"[REDACTED]")
            .field("authorities", &self.authorities)
            .finish()
    }
}

/// Login of the current user.
#[must_use]
pub fn current_user_login(authentication: Option<&Authentication>) -> Option<&str> {
    authentication.map(Authentication::name)
}

/// Token of the current user, if one was presented.
#[must_use]
pub fn current_user_jwt(authentication: Option<&Authentication>) -> Option<&str> {
    authentication
        .map(Authentication::credentials)
        .filter(|credentials| !credentials.is_empty())
}

/// Whether the user is authenticated and not anonymous.
#[must_use]
pub fn is_authenticated(authentication: Option<&Authentication>) -> bool {
    authentication.is_some_and(|auth| !auth.has_any(&[ROLE_ANONYMOUS]))
}

/// Whether the user holds any of `authorities`.
#[must_use]
pub fn has_any_authority(authentication: Option<&Authentication>, authorities: &[&str]) -> bool {
    authentication.is_some_and(|auth| auth.has_any(authorities))
}

/// Whether the user holds none of `authorities`.
#[must_use]
pub fn has_none_of_authorities(authentication: Option<&Authentication>, authorities: &[&str]) -> bool {
    !has_any_authority(authentication, authorities)
}

/// Whether the user holds `authority`.
#[must_use]
pub fn has_authority(authentication: Option<&Authentication>, authority: &str) -> bool {
    has_any_authority(authentication, &[authority])
}
