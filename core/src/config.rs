//! Client configuration: constructor options, regional endpoints and the
//! `ADMINREST_*` external configuration.
//!
//! # Design
//! External configuration is read through a lookup closure rather than
//! straight from the process environment, so the same parsing runs against
//! `std::env::var` in production and against a plain map in tests.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::auth::{
    has_bad_first_or_last_char, Authenticator, BasicAuthenticator, BearerTokenAuthenticator,
    NoAuthAuthenticator, AUTHTYPE_BASIC, AUTHTYPE_BEARER_TOKEN, AUTHTYPE_NOAUTH,
};
use crate::error::ApiError;
use crate::retry::RetryPolicy;

pub const DEFAULT_SERVICE_NAME: &str = "adminrest";
pub const DEFAULT_SERVICE_URL: &str = "https://adminrest.cloud.ibm.com";

/// Named regions and their fixed endpoints.
pub const REGIONAL_ENDPOINTS: &[(&str, &str)] = &[("global", DEFAULT_SERVICE_URL)];

/// Resolve a region name to its endpoint.
pub fn service_url_for_region(region: &str) -> Result<String, ApiError> {
    REGIONAL_ENDPOINTS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, url)| url.to_string())
        .ok_or_else(|| ApiError::Config(format!("service URL for region '{region}' not found")))
}

/// Reject URLs that do not parse or still carry template braces/quotes.
pub fn validate_service_url(url: &str) -> Result<(), ApiError> {
    if has_bad_first_or_last_char(url) {
        return Err(ApiError::Config(format!(
            "the service URL '{url}' shouldn't start or end with curly brackets or quotes"
        )));
    }
    Url::parse(url).map_err(|e| ApiError::Config(format!("invalid service URL '{url}': {e}")))?;
    Ok(())
}

/// Options accepted by `AdminRestClient::new`.
#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    /// Base URL; `DEFAULT_SERVICE_URL` when unset or empty.
    pub url: Option<String>,
    /// Defaults to `NoAuthAuthenticator`.
    pub authenticator: Option<Arc<dyn Authenticator>>,
    /// Name used to derive the external configuration prefix.
    pub service_name: Option<String>,
}

impl ServiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Some(Arc::new(authenticator));
        self
    }

    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    pub(crate) fn service_name_or_default(&self) -> &str {
        self.service_name.as_deref().unwrap_or(DEFAULT_SERVICE_NAME)
    }
}

/// Settings read from `{SERVICE}_*` variables, e.g. `ADMINREST_URL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalConfig {
    pub url: Option<String>,
    pub auth_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bearer_token: Option<String>,
    pub enable_gzip: Option<bool>,
    pub enable_retries: Option<bool>,
    pub max_retries: Option<u32>,
    pub retry_interval: Option<Duration>,
}

impl ExternalConfig {
    /// Variable prefix for a service name: `adminrest` becomes `ADMINREST_`.
    pub fn prefix(service_name: &str) -> String {
        format!("{}_", service_name.to_uppercase().replace('-', "_"))
    }

    pub fn from_env(service_name: &str) -> Result<Self, ApiError> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = Self::prefix(service_name);
        let get = |name: &str| {
            lookup(&format!("{prefix}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            url: get("URL"),
            auth_type: get("AUTH_TYPE"),
            username: get("USERNAME"),
            password: get("PASSWORD"),
            bearer_token: get("BEARER_TOKEN"),
            enable_gzip: get("ENABLE_GZIP")
                .map(|v| parse_bool(&prefix, "ENABLE_GZIP", &v))
                .transpose()?,
            enable_retries: get("ENABLE_RETRIES")
                .map(|v| parse_bool(&prefix, "ENABLE_RETRIES", &v))
                .transpose()?,
            max_retries: get("MAX_RETRIES")
                .map(|v| parse_number(&prefix, "MAX_RETRIES", &v))
                .transpose()?,
            retry_interval: get("RETRY_INTERVAL")
                .map(|v| parse_number(&prefix, "RETRY_INTERVAL", &v).map(Duration::from_secs))
                .transpose()?,
        })
    }

    /// Build the configured authenticator. Without an explicit auth type the
    /// credentials present decide: bearer token, then username, then none.
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>, ApiError> {
        let auth_type = match self.auth_type.as_deref() {
            Some(t) => t.to_string(),
            None if self.bearer_token.is_some() => AUTHTYPE_BEARER_TOKEN.to_string(),
            None if self.username.is_some() => AUTHTYPE_BASIC.to_string(),
            None => AUTHTYPE_NOAUTH.to_string(),
        };

        let authenticator: Arc<dyn Authenticator> = if auth_type.eq_ignore_ascii_case(AUTHTYPE_NOAUTH) {
            Arc::new(NoAuthAuthenticator)
        } else if auth_type.eq_ignore_ascii_case(AUTHTYPE_BASIC) {
            Arc::new(BasicAuthenticator::new(
                self.username.clone().unwrap_or_default(),
                self.password.clone().unwrap_or_default(),
            ))
        } else if auth_type.eq_ignore_ascii_case(AUTHTYPE_BEARER_TOKEN) {
            Arc::new(BearerTokenAuthenticator::new(
                self.bearer_token.clone().unwrap_or_default(),
            ))
        } else {
            return Err(ApiError::Config(format!(
                "unrecognized authentication type: {auth_type}"
            )));
        };
        authenticator.validate()?;
        Ok(authenticator)
    }

    /// The retry policy requested by `ENABLE_RETRIES`, if any.
    pub fn retry_policy(&self) -> Option<RetryPolicy> {
        match self.enable_retries {
            Some(true) => Some(RetryPolicy::enabled(
                self.max_retries.unwrap_or(0),
                self.retry_interval.unwrap_or(Duration::ZERO),
            )),
            _ => None,
        }
    }
}

fn parse_bool(prefix: &str, name: &str, value: &str) -> Result<bool, ApiError> {
    value
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| ApiError::Config(format!("{prefix}{name} must be true or false, got '{value}'")))
}

fn parse_number<T: std::str::FromStr>(prefix: &str, name: &str, value: &str) -> Result<T, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::Config(format!("{prefix}{name} must be a non-negative integer, got '{value}'")))
}
