//! Executes `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the single I/O seam of the crate: the client builds
//! requests and interprets responses, a transport only moves bytes. The
//! default `UreqTransport` is blocking and returns 4xx/5xx responses as data
//! rather than errors so the client decides what a status means.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Sends one request and waits for the response.
pub trait Transport: fmt::Debug + Send + Sync {
    /// `timeout` bounds the whole exchange. Running out of time must surface
    /// as `ApiError::DeadlineExceeded`.
    fn execute(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, ApiError>;
}

/// Largest response body read by default. Larger bodies fail with
/// `ApiError::ResponseTooLarge` and are not retried.
pub const DEFAULT_MAX_RESPONSE_BODY: u64 = 64 * 1024 * 1024;

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    max_body: u64,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            agent,
            max_body: DEFAULT_MAX_RESPONSE_BODY,
        }
    }

    /// Cap on response body size, in bytes.
    pub fn with_max_response_body(mut self, max_body: u64) -> Self {
        self.max_body = max_body;
        self
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: &HttpRequest,
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let sent = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => prepare(self.agent.get(url), request, timeout).call(),
            (HttpMethod::Delete, None) => prepare(self.agent.delete(url), request, timeout).call(),
            (HttpMethod::Delete, Some(body)) => {
                prepare(self.agent.delete(url).force_send_body(), request, timeout).send(body)
            }
            (HttpMethod::Post, Some(body)) => {
                prepare(self.agent.post(url), request, timeout).send(body)
            }
            (HttpMethod::Post, None) => prepare(self.agent.post(url), request, timeout).send_empty(),
            (HttpMethod::Patch, Some(body)) => {
                prepare(self.agent.patch(url), request, timeout).send(body)
            }
            (HttpMethod::Patch, None) => {
                prepare(self.agent.patch(url), request, timeout).send_empty()
            }
        };

        let mut response = sent.map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_body)
            .read_to_string()
            .map_err(map_ureq_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn prepare<B>(
    mut builder: RequestBuilder<B>,
    request: &HttpRequest,
    timeout: Option<Duration>,
) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if timeout.is_some() {
        builder = builder.config().timeout_global(timeout).build();
    }
    builder
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::DeadlineExceeded,
        ureq::Error::BodyExceedsLimit(limit) => ApiError::ResponseTooLarge { limit },
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => {
            ApiError::DeadlineExceeded
        }
        other => ApiError::Transport(other.to_string()),
    }
}

/// Gzip a request body.
pub fn gzip(body: &[u8]) -> Result<Vec<u8>, ApiError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).map_err(ApiError::Compression)?;
    encoder.finish().map_err(ApiError::Compression)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    #[test]
    fn gzip_roundtrips() {
        let compressed = gzip(br#"{"includes":["orders.*"]}"#).unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
        let mut decoded = String::new();
        GzDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, r#"{"includes":["orders.*"]}"#);
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        // Port 9 (discard) is closed on test hosts.
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/alive".to_string(),
            headers: Vec::new(),
            body: None,
        };
        let err = UreqTransport::new()
            .execute(&request, Some(Duration::from_secs(5)))
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    }
}
