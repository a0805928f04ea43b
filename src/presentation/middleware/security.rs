//! Security Headers Middleware
//!
//! Hardening headers for a JSON-only API. HSTS is sent only when the server
//! runs in production, where TLS terminates in front of it.

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, Response},
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// One year
const HSTS_MAX_AGE_SECS: u64 = 31_536_000;

/// Security headers configuration
#[derive(Clone, Debug)]
pub struct SecurityHeadersConfig {
    /// `Strict-Transport-Security` value, when enabled
    pub hsts: Option<HeaderValue>,
    pub content_security_policy: HeaderValue,
    pub referrer_policy: HeaderValue,
}

impl SecurityHeadersConfig {
    pub fn for_environment(production: bool) -> Self {
        let hsts = production
            .then(|| HeaderValue::from_str(&format!("max-age={}; includeSubDomains", HSTS_MAX_AGE_SECS)).ok())
            .flatten();

        Self {
            hsts,
            content_security_policy: HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
            referrer_policy: HeaderValue::from_static("no-referrer"),
        }
    }
}

#[derive(Clone)]
pub struct SecurityHeadersLayer {
    config: SecurityHeadersConfig,
}

impl SecurityHeadersLayer {
    pub fn with_config(config: SecurityHeadersConfig) -> Self {
        Self { config }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersMiddleware {
            inner,
            config: self.config.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SecurityHeadersMiddleware<S> {
    inner: S,
    config: SecurityHeadersConfig,
}

impl<S> Service<Request<Body>> for SecurityHeadersMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let config = self.config.clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;
            let headers = response.headers_mut();

            headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
            headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
            headers.insert(header::CONTENT_SECURITY_POLICY, config.content_security_policy);
            headers.insert(header::REFERRER_POLICY, config.referrer_policy);

            if let Some(hsts) = config.hsts {
                headers.insert(header::STRICT_TRANSPORT_SECURITY, hsts);
            }

            Ok(response)
        })
    }
}

/// Security headers for the given environment.
pub fn create_security_headers_layer(production: bool) -> SecurityHeadersLayer {
    SecurityHeadersLayer::with_config(SecurityHeadersConfig::for_environment(production))
}
