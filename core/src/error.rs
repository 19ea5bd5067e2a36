//! Error types for the admin REST client.
//!
//! # Design
//! Errors fall into five groups: configuration problems caught when a client
//! is built, validation problems caught before any I/O, transport failures,
//! non-2xx API responses, and undecodable success bodies. The last two keep
//! the full response envelope so callers can look at what the server sent.

use crate::http::HttpResponse;

/// Message used when a call is attempted with an empty service URL.
pub const SERVICE_URL_MISSING: &str = "service URL is missing";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The client could not be constructed: bad URL, bad credentials or bad
    /// external configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// A required option was missing or empty.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("service URL is missing")]
    ServiceUrlMissing,

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The request payload could not be gzip-compressed.
    #[error("request compression failed: {0}")]
    Compression(#[source] std::io::Error),

    /// Connection failure, I/O error or client timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was larger than the transport accepts.
    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: u64 },

    /// The caller's deadline elapsed, either mid-request or between retries.
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        response: Box<HttpResponse>,
    },

    /// A 2xx body could not be decoded into the expected type.
    #[error("deserialization failed: {source}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        response: Box<HttpResponse>,
    },
}

impl ApiError {
    /// The response envelope, when the error came from a received response.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::Http { response, .. } | ApiError::Deserialization { response, .. } => {
                Some(response)
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// Build an `Http` error from a non-2xx response, pulling a message out
    /// of the JSON error payload when there is one.
    pub(crate) fn from_response(response: HttpResponse) -> Self {
        let message = error_message(&response.body)
            .unwrap_or_else(|| format!("unexpected status code {}", response.status));
        ApiError::Http {
            status: response.status,
            message,
            response: Box::new(response),
        }
    }
}

/// Best-effort extraction of a human readable message from an error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/errors/0/message"),
        value.get("message"),
        value.get("error"),
        value.get("errorMessage"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string));
    message
}
