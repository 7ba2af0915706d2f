//! Bearer-token middleware
//!
//! Every authenticated route passes through here. The token comes from an
//! `Authorization: Bearer ...` header or, as a fallback, `X-API-Token`.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::AppState;

/// Pull the presented token out of the request headers
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if let Some((scheme, token)) = value.split_once(' ') {
            if scheme.eq_ignore_ascii_case("bearer") {
                return Some(token.trim().to_string());
            }
        }
    }
    headers
        .get("x-api-token")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// Reject requests that do not carry the configured token
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = extract_token(request.headers());
    if presented.as_deref() != Some(state.config.api_token.as_str()) {
        tracing::warn!(path = %request.uri().path(), "Unauthorized request");
        return ApiError::Unauthorized.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_bearer_token() {
        let map = headers(&[("authorization", "Bearer secret-1")]);
        assert_eq!(extract_token(&map).as_deref(), Some("secret-1"));
    }

    #[test]
    fn test_bearer_case_and_whitespace() {
        let map = headers(&[("authorization", "bearer  padded ")]);
        assert_eq!(extract_token(&map).as_deref(), Some("padded"));

        // The scheme matches in any case
        let map = headers(&[("authorization", "BEARER secret-3")]);
        assert_eq!(extract_token(&map).as_deref(), Some("secret-3"));
        let map = headers(&[("authorization", "BeArEr secret-4")]);
        assert_eq!(extract_token(&map).as_deref(), Some("secret-4"));
    }

    #[test]
    fn test_fallback_header() {
        let map = headers(&[("x-api-token", "secret-2")]);
        assert_eq!(extract_token(&map).as_deref(), Some("secret-2"));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
        // A non-bearer Authorization header does not count
        let map = headers(&[("authorization", "Basic dXNlcjpwdw==")]);
        assert_eq!(extract_token(&map), None);
    }
}
