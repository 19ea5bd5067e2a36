//! Request authenticators.
//!
//! The client never knows how credentials are obtained; it asks its
//! `Authenticator` to decorate each outgoing request right before it is sent.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::ApiError;
use crate::http::HttpRequest;

pub const AUTHTYPE_NOAUTH: &str = "noauth";
pub const AUTHTYPE_BASIC: &str = "basic";
pub const AUTHTYPE_BEARER_TOKEN: &str = "bearerToken";

/// Attaches credentials to outgoing requests.
pub trait Authenticator: fmt::Debug + Send + Sync {
    /// Short identifier, matching the values accepted in `ADMINREST_AUTH_TYPE`.
    fn auth_type(&self) -> &'static str;

    /// Checked once when the client is constructed.
    fn validate(&self) -> Result<(), ApiError>;

    fn authenticate(&self, request: &mut HttpRequest) -> Result<(), ApiError>;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoAuthAuthenticator;

impl Authenticator for NoAuthAuthenticator {
    fn auth_type(&self) -> &'static str {
        AUTHTYPE_NOAUTH
    }

    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    fn authenticate(&self, _request: &mut HttpRequest) -> Result<(), ApiError> {
        Ok(())
    }
}

/// HTTP basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuthenticator {
    pub username: String,
    pub password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Authenticator for BasicAuthenticator {
    fn auth_type(&self) -> &'static str {
        AUTHTYPE_BASIC
    }

    fn validate(&self) -> Result<(), ApiError> {
        check_credential("username", &self.username)?;
        check_credential("password", &self.password)
    }

    fn authenticate(&self, request: &mut HttpRequest) -> Result<(), ApiError> {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        request.set_header("Authorization", &format!("Basic {token}"));
        Ok(())
    }
}

/// Sends a caller-supplied bearer token. Obtaining or refreshing the token is
/// the caller's business.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerTokenAuthenticator {
    pub bearer_token: String,
}

impl BearerTokenAuthenticator {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
        }
    }
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator")
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

impl Authenticator for BearerTokenAuthenticator {
    fn auth_type(&self) -> &'static str {
        AUTHTYPE_BEARER_TOKEN
    }

    fn validate(&self) -> Result<(), ApiError> {
        check_credential("bearer token", &self.bearer_token)
    }

    fn authenticate(&self, request: &mut HttpRequest) -> Result<(), ApiError> {
        request.set_header("Authorization", &format!("Bearer {}", self.bearer_token));
        Ok(())
    }
}

/// Credentials must be present and must not still carry template braces or
/// quotes copied from a credentials file.
fn check_credential(what: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Config(format!("the {what} shouldn't be empty")));
    }
    if has_bad_first_or_last_char(value) {
        return Err(ApiError::Config(format!(
            "the {what} shouldn't start or end with curly brackets or quotes"
        )));
    }
    Ok(())
}

pub(crate) fn has_bad_first_or_last_char(value: &str) -> bool {
    let bad = |c: char| matches!(c, '{' | '}' | '"');
    value.starts_with(bad) || value.ends_with(bad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: "https://adminrest.example/admin/cluster".to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn basic_sets_authorization() {
        let auth = BasicAuthenticator::new("user", "pass");
        auth.validate().unwrap();
        let mut req = request();
        auth.authenticate(&mut req).unwrap();
        assert_eq!(req.header("authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn basic_rejects_empty_credentials() {
        let err = BasicAuthenticator::new("", "").validate().unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn basic_rejects_templated_credentials() {
        assert!(BasicAuthenticator::new("{user}", "pass").validate().is_err());
        assert!(BasicAuthenticator::new("user", "\"pass\"").validate().is_err());
    }

    #[test]
    fn bearer_sets_authorization() {
        let auth = BearerTokenAuthenticator::new("abc.def");
        let mut req = request();
        auth.authenticate(&mut req).unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer abc.def"));
    }

    #[test]
    fn noauth_leaves_request_alone() {
        let mut req = request();
        NoAuthAuthenticator.authenticate(&mut req).unwrap();
        assert!(req.headers.is_empty());
    }

    #[test]
    fn debug_redacts_secrets() {
        let shown = format!("{:?}", BasicAuthenticator::new("user", "hunter2"));
        assert!(!shown.contains("hunter2"));
        let shown = format!("{:?}", BearerTokenAuthenticator::new("s3cr3t"));
        assert!(!shown.contains("s3cr3t"));
    }
}
