use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use crate::state::AppState;

/// Per-request information needed to build absolute resource URLs.
///
/// The base comes from `server.public_url` when configured, otherwise from
/// the `X-Forwarded-Proto` and `Host` headers of the incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    base_url: String,
}

impl RequestContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an absolute path (starting with `/`) onto the base.
    pub fn absolute_uri(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn from_headers(headers: &HeaderMap, parts_scheme: Option<&str>, authority: Option<&str>) -> Self {
        let scheme = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or(parts_scheme)
            .unwrap_or("http");
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or(authority)
            .unwrap_or("localhost");
        Self::new(format!("{scheme}://{host}"))
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(public_url) = state.config.server.public_url.as_deref() {
            return Ok(Self::new(public_url));
        }
        Ok(Self::from_headers(
            &parts.headers,
            parts.uri.scheme_str(),
            parts.uri.authority().map(|a| a.as_str()),
        ))
    }
}
