//! Login response carrying a freshly issued token.

use http::HeaderValue;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::jwt::TokenProvider;
use crate::middleware::BEARER_PREFIX;
use crate::security::Authentication;

/// Body returned after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtToken {
    /// The issued token
    #[serde(rename = "id_token")]
    pub id_token: String,
}

/// Token body plus the matching `Authorization` header value.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// JSON body
    pub body: JwtToken,
    /// `Bearer <token>` value for the `Authorization` response header
    pub authorization: HeaderValue,
}

impl LoginResponse {
    /// Issue a token for an already authenticated user.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be encoded.
    pub fn issue(
        provider: &TokenProvider,
        authentication: &Authentication,
        remember_me: bool,
    ) -> Result<Self, TokenError> {
        let token = provider.create_token(authentication, remember_me)?;
        let authorization = HeaderValue::try_from(format!("{BEARER_PREFIX}{token}"))
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(Self {
            body: JwtToken { id_token: token },
            authorization,
        })
    }
}
