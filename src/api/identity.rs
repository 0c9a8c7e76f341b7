//! Per-request acting user, taken from the `X-User-Id` header.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;

use super::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Who is making the request, if the client said so.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    user_id: Option<String>,
}

impl Identity {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Self { user_id }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Label for log lines.
    #[must_use]
    pub fn actor(&self) -> &str {
        self.user_id().unwrap_or("anonymous")
    }

    pub fn require(&self) -> Result<&str, ApiError> {
        self.user_id()
            .ok_or_else(|| ApiError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self::from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_from_headers() {
        let mut headers = HeaderMap::new();
        assert!(Identity::from_headers(&headers).user_id().is_none());
        assert!(Identity::from_headers(&headers).require().is_err());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        assert!(Identity::from_headers(&headers).user_id().is_none());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("user-1"));
        let identity = Identity::from_headers(&headers);
        assert_eq!(identity.require().unwrap(), "user-1");
        assert_eq!(identity.actor(), "user-1");
    }
}
