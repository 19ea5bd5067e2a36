//! Blocking client for the admin REST API of a managed messaging cluster.
//!
//! # Overview
//! Manages topics, topic records, quotas, brokers, cluster metadata,
//! consumer groups and mirroring configuration. Each operation is one HTTP
//! round trip: typed options in, typed result plus the raw response envelope
//! out.
//!
//! # Design
//! - `AdminRestClient` holds configuration only (URL, authenticator, retry
//!   policy, default headers) and can be shared across threads.
//! - Each operation is split into `build_*` (validates options, produces an
//!   `HttpRequest`) and a call that sends it through a `Transport` and parses
//!   the `HttpResponse`, so the I/O boundary stays explicit.
//! - Errors keep the response envelope whenever a response was received.
//!
//! ```no_run
//! use adminrest_core::{AdminRestClient, BasicAuthenticator, ListTopicsOptions, ServiceOptions};
//!
//! let client = AdminRestClient::new(
//!     ServiceOptions::new()
//!         .url("https://adminrest.example.com")
//!         .authenticator(BasicAuthenticator::new("token", "api-key")),
//! )?;
//! let topics = client.list_topics(&ListTopicsOptions::new().topic_filter("orders*"))?;
//! for topic in topics.result.unwrap_or_default() {
//!     println!("{:?}", topic.name);
//! }
//! # Ok::<(), adminrest_core::ApiError>(())
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod retry;
pub mod transport;
pub mod types;

pub use auth::{Authenticator, BasicAuthenticator, BearerTokenAuthenticator, NoAuthAuthenticator};
pub use client::{AdminRestClient, ApiResponse};
pub use config::{
    service_url_for_region, ExternalConfig, ServiceOptions, DEFAULT_SERVICE_URL,
    REGIONAL_ENDPOINTS,
};
pub use error::{ApiError, SERVICE_URL_MISSING};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::*;
pub use retry::{CallContext, RetryPolicy};
pub use transport::{Transport, UreqTransport, DEFAULT_MAX_RESPONSE_BODY};
pub use types::*;
