//! HTTP basic-auth guard for every route.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use crate::config::ServerConfig;
use crate::AppState;

pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if authorized(request.headers(), &state.config) {
        next.run(request).await
    } else {
        unauthorized()
    }
}

fn authorized(headers: &HeaderMap, config: &ServerConfig) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic)
        .map(|(username, password)| config.credentials_match(&username, &password))
        .unwrap_or(false)
}

/// Decodes a `Basic <base64(user:pass)>` authorization header.
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64_STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Restricted\"")],
        "unauthorized",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn header_for(username: &str, password: &str) -> HeaderValue {
        let encoded = BASE64_STANDARD.encode(format!("{}:{}", username, password));
        HeaderValue::from_str(&format!("Basic {}", encoded)).unwrap()
    }

    #[test]
    fn test_parse_basic_roundtrip() {
        let value = header_for("user", "pass");
        let parsed = parse_basic(value.to_str().unwrap()).unwrap();
        assert_eq!(parsed, ("user".to_string(), "pass".to_string()));
    }

    #[test]
    fn test_parse_basic_keeps_colons_in_password() {
        let value = header_for("user", "pa:ss:word");
        let parsed = parse_basic(value.to_str().unwrap()).unwrap();
        assert_eq!(parsed.1, "pa:ss:word");
    }

    #[test]
    fn test_parse_basic_rejects_other_schemes() {
        assert!(parse_basic("Bearer abcdef").is_none());
    }

    #[test]
    fn test_parse_basic_rejects_bad_base64() {
        assert!(parse_basic("Basic not-base64!!!").is_none());
    }

    #[test]
    fn test_parse_basic_rejects_missing_colon() {
        let encoded = BASE64_STANDARD.encode("no-colon-here");
        assert!(parse_basic(&format!("Basic {}", encoded)).is_none());
    }

    #[test]
    fn test_authorized_with_correct_credentials() {
        let config = ServerConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, header_for("admin", "changeme"));
        assert!(authorized(&headers, &config));
    }

    #[test]
    fn test_authorized_rejects_wrong_password() {
        let config = ServerConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, header_for("admin", "nope"));
        assert!(!authorized(&headers, &config));
    }

    #[test]
    fn test_authorized_rejects_missing_header() {
        let config = ServerConfig::default();
        assert!(!authorized(&HeaderMap::new(), &config));
    }

    #[test]
    fn test_unauthorized_response_invites_retry() {
        let response = unauthorized();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert!(challenge.to_str().unwrap().starts_with("Basic"));
    }
}
