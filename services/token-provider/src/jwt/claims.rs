//! Claims carried by a session token.

use serde::{Deserialize, Serialize};

/// Claim carrying the comma-joined authority names.
pub const AUTHORITIES_KEY: &str = "auth";

const AUTHORITY_SEPARATOR: char = ',';

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Account identifier
    #[serde(default)]
    pub sub: String,
    /// Comma-joined authority names
    #[serde(rename = "auth", default)]
    pub authorities: String,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

impl TokenClaims {
    /// Build claims for `subject` that expire `validity_ms` after `now_ms`.
    pub fn new<A: AsRef<str>>(subject: &str, authorities: &[A], now_ms: i64, validity_ms: i64) -> Self {
        let authorities = authorities
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");

        TokenClaims {
            sub: subject.to_string(),
            authorities,
            exp: now_ms.saturating_add(validity_ms).div_euclid(1000),
        }
    }

    /// Authority names, skipping blank entries.
    pub fn authority_names(&self) -> impl Iterator<Item = &str> {
        self.authorities
            .split(AUTHORITY_SEPARATOR)
            .filter(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorities_joined_with_comma() {
        let claims = TokenClaims::new("admin", &["ROLE_ADMIN", "ROLE_USER"], 0, 60_000);
        assert_eq!(claims.authorities, "ROLE_ADMIN,ROLE_USER");
        assert_eq!(claims.exp, 60);
    }

    #[test]
    fn test_blank_authorities_skipped() {
        let claims = TokenClaims {
            sub: "user".to_string(),
            authorities: "ROLE_USER,, ,ROLE_ADMIN,".to_string(),
            exp: 0,
        };
        let names: Vec<&str> = claims.authority_names().collect();
        assert_eq!(names, vec!["ROLE_USER", "ROLE_ADMIN"]);
    }

    #[test]
    fn test_negative_validity_is_expired() {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let claims = TokenClaims::new::<&str>("user", &[], now_ms, -60_000);
        assert!(claims.exp < chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_serialized_claim_names() {
        let claims = TokenClaims::new("user", &["ROLE_USER"], 1_000, 1_000);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "user");
        assert_eq!(json[AUTHORITIES_KEY], "ROLE_USER");
        assert_eq!(json["exp"], 2);
    }
}
