/// Request authentication for Axum
///
/// Extracts the session token from a request and validates it into an
/// [`AuthContext`]. The API's auth layer calls [`authenticate`] and adds the
/// context to the request extensions; requests without a valid token are
/// rejected before any handler runs.
///
/// # Credentials
///
/// The token is read from, in order:
/// - `Authorization: Bearer <token>`
/// - `X-Budgetal-Session: <token>` (sent by the web and mobile clients)
///
/// # Example
///
/// ```
/// use axum::http::{HeaderMap, HeaderValue};
/// use budgetal_shared::auth::jwt::{create_token, Claims};
/// use budgetal_shared::auth::middleware::{authenticate, SESSION_HEADER};
/// use uuid::Uuid;
///
/// let secret = "secret-key-at-least-32-bytes-long";
/// let user_id = Uuid::new_v4();
/// let token = create_token(&Claims::new(user_id), secret).unwrap();
///
/// let mut headers = HeaderMap::new();
/// headers.insert(SESSION_HEADER, HeaderValue::from_str(&token).unwrap());
///
/// let context = authenticate(&headers, secret).unwrap();
/// assert_eq!(context.user_id, user_id);
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Header the Budgetal clients send their session token in
pub const SESSION_HEADER: &str = "X-Budgetal-Session";

/// Authentication context added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context for a user
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session token on the request
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header present but not a Bearer token
    #[error("Invalid authorization format: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}

/// Pulls the session token out of the request headers
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] if neither header is present
/// - [`AuthError::InvalidFormat`] if `Authorization` is not a Bearer token
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidFormat("Authorization header is not valid ASCII".to_string()))?;
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredentials)
}

/// Validates the request's session token and returns its context
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = extract_token(headers)?;
    let claims = validate_token(token, secret)?;
    Ok(AuthContext::new(claims.sub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn token_for(user_id: Uuid) -> String {
        create_token(&Claims::new(user_id), SECRET).unwrap()
    }

    #[test]
    fn test_bearer_token() {
        let user_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token_for(user_id))).unwrap(),
        );

        let context = authenticate(&headers, SECRET).unwrap();
        assert_eq!(context.user_id, user_id);
    }

    #[test]
    fn test_session_header() {
        let user_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_str(&token_for(user_id)).unwrap());

        let context = authenticate(&headers, SECRET).unwrap();
        assert_eq!(context, AuthContext::new(user_id));
    }

    #[test]
    fn test_missing_credentials() {
        let result = authenticate(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));

        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static(""));
        assert!(matches!(authenticate(&headers, SECRET), Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_non_bearer_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        let result = authenticate(&headers, SECRET);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_invalid_token() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static("garbage"));

        let result = authenticate(&headers, SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
