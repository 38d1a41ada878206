//! Cross-origin policy
//!
//! Browser requests are checked against the allow-list before any handler
//! runs. Requests without an `Origin` header come from non-browser clients
//! and always pass. Origins are compared exactly after normalization, so an
//! allowed `https://example.com` does not admit `https://example.com.evil.net`.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    config::{CorsConfig, normalize_origin},
    error::AppError,
};

#[derive(Debug, Clone)]
pub struct OriginPolicy {
    origins: Arc<Vec<String>>,
}

impl OriginPolicy {
    pub fn new(origins: Vec<String>) -> Self {
        Self {
            origins: Arc::new(origins),
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(config.origins())
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn allows(&self, origin: &str) -> bool {
        normalize_origin(origin).is_some_and(|origin| self.origins.contains(&origin))
    }

    /// Response headers and preflight handling for allowed origins.
    pub fn layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    }
}

pub async fn origin_guard(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let Some(origin) = request.headers().get(header::ORIGIN) else {
        return next.run(request).await;
    };

    let allowed = origin.to_str().is_ok_and(|origin| policy.allows(origin));
    if !allowed {
        tracing::warn!(
            origin = ?origin,
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request from disallowed origin"
        );
        return AppError::OriginNotAllowed.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> OriginPolicy {
        OriginPolicy::from_config(&CorsConfig {
            allowed_origins: "https://example.com, https://shop.example.com:8443".to_string(),
        })
    }

    #[test]
    fn test_allows_exact_origins() {
        let policy = policy();

        assert!(policy.allows("https://example.com"));
        assert!(policy.allows("https://shop.example.com:8443"));
        assert!(policy.allows("http://localhost:5173"));
    }

    #[test]
    fn test_rejects_prefix_matches() {
        let policy = policy();

        assert!(!policy.allows("https://example.com.evil.net"));
        assert!(!policy.allows("https://example.company"));
        assert!(!policy.allows("http://example.com"));
        assert!(!policy.allows("https://shop.example.com"));
    }

    #[test]
    fn test_rejects_opaque_origins() {
        let policy = policy();

        assert!(!policy.allows("null"));
        assert!(!policy.allows(""));
    }
}
