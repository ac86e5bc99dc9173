//! Token Relay Tower Layer
//!
//! Gateway-side layer that forwards valid bearer tokens to downstream
//! services with a normalized `Authorization` header.

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Request};
use tower::{Layer, Service};

use crate::error::TokenError;
use crate::jwt::TokenProvider;
use crate::middleware::BEARER_PREFIX;

/// Layer relaying bearer tokens through the gateway.
#[derive(Debug, Clone)]
pub struct JwtRelayLayer {
    provider: Arc<TokenProvider>,
}

impl JwtRelayLayer {
    /// Creates a new relay layer around a shared provider
    pub fn new(provider: Arc<TokenProvider>) -> Self {
        Self { provider }
    }
}

impl<S> Layer<S> for JwtRelayLayer {
    type Service = JwtRelayService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JwtRelayService {
            inner,
            provider: self.provider.clone(),
        }
    }
}

/// Service produced by [`JwtRelayLayer`].
#[derive(Debug)]
pub struct JwtRelayService<S> {
    inner: S,
    provider: Arc<TokenProvider>,
}

impl<S: Clone> Clone for JwtRelayService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            provider: self.provider.clone(),
        }
    }
}

/// Token of a bearer `Authorization` header.
///
/// A missing header yields `Ok(None)`; any other scheme, a blank header or a
/// header that is not valid text is rejected.
fn extract_token<B>(req: &Request<B>) -> Result<Option<String>, TokenError> {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .filter(|header| !header.trim().is_empty())
        .and_then(|header| header.strip_prefix(BEARER_PREFIX))
        .map(|token| Some(token.to_string()))
        .ok_or(TokenError::InvalidAuthorizationHeader)
}

impl<S, B> Service<Request<B>> for JwtRelayService<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Response: Send + 'static,
    S::Error: Into<TokenError> + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = TokenError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let provider = self.provider.clone();
        // Take the instance that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let token = extract_token(&req)?;

            if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
                if provider.validate_token(&token) {
                    let value = HeaderValue::try_from(format!("{BEARER_PREFIX}{token}"))
                        .map_err(|_| TokenError::InvalidAuthorizationHeader)?;
                    req.headers_mut().insert(AUTHORIZATION, value);
                }
            }

            inner.call(req).await.map_err(Into::into)
        })
    }
}
