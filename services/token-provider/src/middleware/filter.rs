//! Authentication Tower Layer
//!
//! Resolves the bearer token of each request and, when it validates,
//! stores the parsed [`Authentication`] in the request extensions.

use std::sync::Arc;
use std::task::{Context, Poll};

use http::Request;
use tower::{Layer, Service};
use tracing::warn;

use crate::jwt::TokenProvider;
use crate::middleware::resolve_token;
use crate::security::Authentication;

/// Layer attaching the token's [`Authentication`] to requests.
#[derive(Debug, Clone)]
pub struct JwtFilterLayer {
    provider: Arc<TokenProvider>,
}

impl JwtFilterLayer {
    /// Creates a new filter layer around a shared provider
    pub fn new(provider: Arc<TokenProvider>) -> Self {
        Self { provider }
    }
}

impl<S> Layer<S> for JwtFilterLayer {
    type Service = JwtFilterService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JwtFilterService {
            inner,
            provider: self.provider.clone(),
        }
    }
}

/// Service produced by [`JwtFilterLayer`].
///
/// Requests without a valid token are forwarded without an
/// [`Authentication`], which downstream handlers treat as anonymous.
#[derive(Debug)]
pub struct JwtFilterService<S> {
    inner: S,
    provider: Arc<TokenProvider>,
}

impl<S: Clone> Clone for JwtFilterService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            provider: self.provider.clone(),
        }
    }
}

impl<S> JwtFilterService<S> {
    fn authentication<B>(&self, req: &Request<B>) -> Option<Authentication> {
        let token = resolve_token(req.headers())?;
        if !self.provider.validate_token(token) {
            return None;
        }

        match self.provider.authenticate(token) {
            Ok(authentication) => Some(authentication),
            Err(err) => {
                warn!(error = %err, "Validated token could not be parsed");
                None
            }
        }
    }
}

impl<S, B> Service<Request<B>> for JwtFilterService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if let Some(authentication) = self.authentication(&req) {
            req.extensions_mut().insert(authentication);
        }
        self.inner.call(req)
    }
}
