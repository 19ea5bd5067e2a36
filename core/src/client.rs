//! The admin REST service client.
//!
//! # Design
//! Every operation is split the same way: `build_*` validates the options and
//! produces an `HttpRequest` without touching the network, then a shared
//! helper authenticates it, sends it through the `Transport` (retrying when
//! enabled), and `parse_response` turns the envelope into a typed result.
//! The client is immutable while calls are in flight; reconfiguration needs
//! `&mut self`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Authenticator, NoAuthAuthenticator};
use crate::config::{validate_service_url, ExternalConfig, ServiceOptions, DEFAULT_SERVICE_URL};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::*;
use crate::retry::{is_retryable_status, CallContext, RetryPolicy};
use crate::transport::{gzip, Transport, UreqTransport};
use crate::types::*;

const USER_AGENT: &str = concat!("adminrest-rust-sdk/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const NO_BODY: Option<&'static ()> = None;

/// A typed result together with the response envelope it came from.
///
/// `result` is `None` when the server answered 2xx with an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub result: Option<T>,
    pub response: HttpResponse,
}

/// Client for the admin REST API of a messaging cluster.
#[derive(Debug, Clone)]
pub struct AdminRestClient {
    base_url: String,
    authenticator: Arc<dyn Authenticator>,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    default_headers: BTreeMap<String, String>,
    gzip: bool,
    timeout: Option<Duration>,
}

/// Generates the plain and context-taking entry points of an operation from
/// its `build_*` method.
macro_rules! operation {
    ($(#[$meta:meta])* $name:ident, $with_ctx:ident, $build:ident, $opts:ty => no_content) => {
        $(#[$meta])*
        pub fn $name(&self, options: &$opts) -> Result<HttpResponse, ApiError> {
            self.$with_ctx(&CallContext::background(), options)
        }

        pub fn $with_ctx(&self, ctx: &CallContext, options: &$opts) -> Result<HttpResponse, ApiError> {
            let request = self.$build(options)?;
            self.invoke_no_content(ctx, request)
        }
    };
    ($(#[$meta:meta])* $name:ident, $with_ctx:ident, $build:ident, $opts:ty => $result:ty) => {
        $(#[$meta])*
        pub fn $name(&self, options: &$opts) -> Result<ApiResponse<$result>, ApiError> {
            self.$with_ctx(&CallContext::background(), options)
        }

        pub fn $with_ctx(
            &self,
            ctx: &CallContext,
            options: &$opts,
        ) -> Result<ApiResponse<$result>, ApiError> {
            let request = self.$build(options)?;
            self.invoke(ctx, request)
        }
    };
}

impl AdminRestClient {
    /// Build a client from explicit options. Fails on a malformed URL or
    /// invalid credentials.
    pub fn new(options: ServiceOptions) -> Result<Self, ApiError> {
        let base_url = options
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        validate_service_url(&base_url)?;

        let authenticator = options
            .authenticator
            .unwrap_or_else(|| Arc::new(NoAuthAuthenticator));
        authenticator.validate()?;

        Ok(Self {
            base_url: trim_base_url(&base_url),
            authenticator,
            transport: Arc::new(UreqTransport::new()),
            retry: RetryPolicy::disabled(),
            default_headers: BTreeMap::new(),
            gzip: false,
            timeout: Some(DEFAULT_TIMEOUT),
        })
    }

    /// Build a client from `ADMINREST_*` environment variables. A URL or
    /// authenticator given in `options` takes precedence.
    pub fn from_external_config(options: ServiceOptions) -> Result<Self, ApiError> {
        Self::from_config_lookup(options, |key| std::env::var(key).ok())
    }

    /// Same as `from_external_config`, reading variables through `lookup`.
    pub fn from_config_lookup<F>(options: ServiceOptions, lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ExternalConfig::from_lookup(options.service_name_or_default(), lookup)?;
        let authenticator = match options.authenticator.clone() {
            Some(authenticator) => authenticator,
            None => config.authenticator()?,
        };
        let url = options.url.clone().filter(|u| !u.is_empty()).or(config.url.clone());

        let mut client = Self::new(ServiceOptions {
            url,
            authenticator: Some(authenticator),
            service_name: options.service_name,
        })?;
        if let Some(policy) = config.retry_policy() {
            client.retry = policy;
        }
        client.gzip = config.enable_gzip.unwrap_or(false);
        Ok(client)
    }

    /// Replace the transport, e.g. with an instrumented or fake one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Per-attempt timeout applied when no shorter deadline is in effect.
    /// `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn service_url(&self) -> &str {
        &self.base_url
    }

    /// An empty URL is accepted here; calls then fail with
    /// `ApiError::ServiceUrlMissing`.
    pub fn set_service_url(&mut self, url: &str) -> Result<(), ApiError> {
        if !url.is_empty() {
            validate_service_url(url)?;
        }
        self.base_url = trim_base_url(url);
        Ok(())
    }

    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.authenticator
    }

    /// Zero values select the defaults (4 retries, 30 second cap).
    pub fn enable_retries(&mut self, max_retries: u32, max_retry_interval: Duration) {
        self.retry = RetryPolicy::enabled(max_retries, max_retry_interval);
    }

    pub fn disable_retries(&mut self) {
        self.retry = RetryPolicy::disabled();
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Headers sent with every request, below per-call headers.
    pub fn set_default_headers(&mut self, headers: BTreeMap<String, String>) {
        self.default_headers = headers;
    }

    pub fn set_enable_gzip_compression(&mut self, enabled: bool) {
        self.gzip = enabled;
    }

    pub fn gzip_compression_enabled(&self) -> bool {
        self.gzip
    }

    // -----------------------------------------------------------------------
    // Topics
    // -----------------------------------------------------------------------

    pub fn build_create_topic(&self, options: &CreateTopicOptions) -> Result<HttpRequest, ApiError> {
        let body = TopicCreateRequest {
            name: options.name.clone(),
            partitions: options.partitions,
            partition_count: options.partition_count,
            configs: options.configs.clone(),
        };
        self.build_request(options, HttpMethod::Post, &["admin", "topics"], &[], Some(&body))
    }

    pub fn build_list_topics(&self, options: &ListTopicsOptions) -> Result<HttpRequest, ApiError> {
        let query = [
            ("topic_filter", options.topic_filter.clone()),
            ("per_page", options.per_page.map(|v| v.to_string())),
            ("page", options.page.map(|v| v.to_string())),
        ];
        self.build_request(options, HttpMethod::Get, &["admin", "topics"], &query, NO_BODY)
    }

    pub fn build_get_topic(&self, options: &GetTopicOptions) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "topics", options.topic_name.as_str()];
        self.build_request(options, HttpMethod::Get, &path, &[], NO_BODY)
    }

    pub fn build_update_topic(&self, options: &UpdateTopicOptions) -> Result<HttpRequest, ApiError> {
        let body = TopicUpdateRequest {
            new_total_partition_count: options.new_total_partition_count,
            configs: options.configs.clone(),
        };
        let path = ["admin", "topics", options.topic_name.as_str()];
        self.build_request(options, HttpMethod::Patch, &path, &[], Some(&body))
    }

    pub fn build_delete_topic(&self, options: &DeleteTopicOptions) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "topics", options.topic_name.as_str()];
        self.build_request(options, HttpMethod::Delete, &path, &[], NO_BODY)
    }

    pub fn build_delete_topic_records(
        &self,
        options: &DeleteTopicRecordsOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = RecordDeleteRequest {
            records_to_delete: options.records_to_delete.clone(),
        };
        let path = ["admin", "topics", options.topic_name.as_str(), "records"];
        self.build_request(options, HttpMethod::Delete, &path, &[], Some(&body))
    }

    operation!(
        /// Create a topic. The server answers 202 and creates it asynchronously.
        create_topic, create_topic_with_context, build_create_topic, CreateTopicOptions => no_content
    );
    operation!(
        list_topics, list_topics_with_context, build_list_topics, ListTopicsOptions => Vec<TopicDetail>
    );
    operation!(
        get_topic, get_topic_with_context, build_get_topic, GetTopicOptions => TopicDetail
    );
    operation!(
        /// Grow the partition count and/or change config overrides.
        update_topic, update_topic_with_context, build_update_topic, UpdateTopicOptions => no_content
    );
    operation!(
        delete_topic, delete_topic_with_context, build_delete_topic, DeleteTopicOptions => no_content
    );
    operation!(
        /// Delete records below the given offset in each listed partition.
        delete_topic_records, delete_topic_records_with_context, build_delete_topic_records,
        DeleteTopicRecordsOptions => no_content
    );

    // -----------------------------------------------------------------------
    // Quotas
    // -----------------------------------------------------------------------

    pub fn build_create_quota(&self, options: &CreateQuotaOptions) -> Result<HttpRequest, ApiError> {
        let body = QuotaRequest {
            producer_byte_rate: options.producer_byte_rate,
            consumer_byte_rate: options.consumer_byte_rate,
        };
        let path = ["admin", "quotas", options.entity_name.as_str()];
        self.build_request(options, HttpMethod::Post, &path, &[], Some(&body))
    }

    pub fn build_update_quota(&self, options: &UpdateQuotaOptions) -> Result<HttpRequest, ApiError> {
        let body = QuotaRequest {
            producer_byte_rate: options.producer_byte_rate,
            consumer_byte_rate: options.consumer_byte_rate,
        };
        let path = ["admin", "quotas", options.entity_name.as_str()];
        self.build_request(options, HttpMethod::Patch, &path, &[], Some(&body))
    }

    pub fn build_delete_quota(&self, options: &DeleteQuotaOptions) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "quotas", options.entity_name.as_str()];
        self.build_request(options, HttpMethod::Delete, &path, &[], NO_BODY)
    }

    pub fn build_get_quota(&self, options: &GetQuotaOptions) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "quotas", options.entity_name.as_str()];
        self.build_request(options, HttpMethod::Get, &path, &[], NO_BODY)
    }

    pub fn build_list_quotas(&self, options: &ListQuotasOptions) -> Result<HttpRequest, ApiError> {
        self.build_request(options, HttpMethod::Get, &["admin", "quotas"], &[], NO_BODY)
    }

    operation!(
        create_quota, create_quota_with_context, build_create_quota, CreateQuotaOptions => no_content
    );
    operation!(
        update_quota, update_quota_with_context, build_update_quota, UpdateQuotaOptions => no_content
    );
    operation!(
        delete_quota, delete_quota_with_context, build_delete_quota, DeleteQuotaOptions => no_content
    );
    operation!(
        get_quota, get_quota_with_context, build_get_quota, GetQuotaOptions => QuotaDetail
    );
    operation!(
        list_quotas, list_quotas_with_context, build_list_quotas, ListQuotasOptions => QuotaList
    );

    // -----------------------------------------------------------------------
    // Brokers and cluster
    // -----------------------------------------------------------------------

    pub fn build_list_brokers(&self, options: &ListBrokersOptions) -> Result<HttpRequest, ApiError> {
        self.build_request(options, HttpMethod::Get, &["admin", "brokers"], &[], NO_BODY)
    }

    pub fn build_get_broker(&self, options: &GetBrokerOptions) -> Result<HttpRequest, ApiError> {
        let id = options.broker_id.to_string();
        self.build_request(options, HttpMethod::Get, &["admin", "brokers", &id], &[], NO_BODY)
    }

    pub fn build_get_broker_config(
        &self,
        options: &GetBrokerConfigOptions,
    ) -> Result<HttpRequest, ApiError> {
        let id = options.broker_id.to_string();
        let query = [
            ("config_filter", options.config_filter.clone()),
            ("verbose", options.verbose.map(|v| v.to_string())),
        ];
        let path = ["admin", "brokers", id.as_str(), "configs"];
        self.build_request(options, HttpMethod::Get, &path, &query, NO_BODY)
    }

    pub fn build_get_cluster(&self, options: &GetClusterOptions) -> Result<HttpRequest, ApiError> {
        self.build_request(options, HttpMethod::Get, &["admin", "cluster"], &[], NO_BODY)
    }

    operation!(
        list_brokers, list_brokers_with_context, build_list_brokers, ListBrokersOptions => Vec<BrokerSummary>
    );
    operation!(
        get_broker, get_broker_with_context, build_get_broker, GetBrokerOptions => BrokerDetail
    );
    operation!(
        get_broker_config, get_broker_config_with_context, build_get_broker_config,
        GetBrokerConfigOptions => BrokerDetail
    );
    operation!(
        get_cluster, get_cluster_with_context, build_get_cluster, GetClusterOptions => Cluster
    );

    // -----------------------------------------------------------------------
    // Consumer groups
    // -----------------------------------------------------------------------

    pub fn build_list_consumer_groups(
        &self,
        options: &ListConsumerGroupsOptions,
    ) -> Result<HttpRequest, ApiError> {
        let query = [
            ("group_filter", options.group_filter.clone()),
            ("per_page", options.per_page.map(|v| v.to_string())),
            ("page", options.page.map(|v| v.to_string())),
        ];
        self.build_request(options, HttpMethod::Get, &["admin", "consumergroups"], &query, NO_BODY)
    }

    pub fn build_get_consumer_group(
        &self,
        options: &GetConsumerGroupOptions,
    ) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "consumergroups", options.group_id.as_str()];
        self.build_request(options, HttpMethod::Get, &path, &[], NO_BODY)
    }

    pub fn build_delete_consumer_group(
        &self,
        options: &DeleteConsumerGroupOptions,
    ) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "consumergroups", options.group_id.as_str()];
        self.build_request(options, HttpMethod::Delete, &path, &[], NO_BODY)
    }

    pub fn build_update_consumer_group(
        &self,
        options: &UpdateConsumerGroupOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = GroupResetRequest {
            topic: options.topic.clone(),
            mode: options.mode.clone(),
            value: options.value.clone(),
            execute: options.execute,
        };
        let path = ["admin", "consumergroups", options.group_id.as_str()];
        self.build_request(options, HttpMethod::Patch, &path, &[], Some(&body))
    }

    operation!(
        /// Group ids matching `group_filter`.
        list_consumer_groups, list_consumer_groups_with_context, build_list_consumer_groups,
        ListConsumerGroupsOptions => Vec<String>
    );
    operation!(
        get_consumer_group, get_consumer_group_with_context, build_get_consumer_group,
        GetConsumerGroupOptions => GroupDetail
    );
    operation!(
        delete_consumer_group, delete_consumer_group_with_context, build_delete_consumer_group,
        DeleteConsumerGroupOptions => no_content
    );
    operation!(
        /// Reset committed offsets. Returns the new offset per partition;
        /// nothing is committed unless `execute` is `true`.
        update_consumer_group, update_consumer_group_with_context, build_update_consumer_group,
        UpdateConsumerGroupOptions => Vec<GroupResetResultsItem>
    );

    // -----------------------------------------------------------------------
    // Mirroring and health
    // -----------------------------------------------------------------------

    pub fn build_get_mirroring_topic_selection(
        &self,
        options: &GetMirroringTopicSelectionOptions,
    ) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "mirroring", "topic-selection"];
        self.build_request(options, HttpMethod::Get, &path, &[], NO_BODY)
    }

    pub fn build_replace_mirroring_topic_selection(
        &self,
        options: &ReplaceMirroringTopicSelectionOptions,
    ) -> Result<HttpRequest, ApiError> {
        let body = MirroringTopicSelection {
            includes: options.includes.clone(),
        };
        let path = ["admin", "mirroring", "topic-selection"];
        self.build_request(options, HttpMethod::Post, &path, &[], Some(&body))
    }

    pub fn build_get_mirroring_active_topics(
        &self,
        options: &GetMirroringActiveTopicsOptions,
    ) -> Result<HttpRequest, ApiError> {
        let path = ["admin", "mirroring", "active-topics"];
        self.build_request(options, HttpMethod::Get, &path, &[], NO_BODY)
    }

    pub fn build_alive(&self, options: &AliveOptions) -> Result<HttpRequest, ApiError> {
        self.build_request(options, HttpMethod::Get, &["alive"], &[], NO_BODY)
    }

    operation!(
        get_mirroring_topic_selection, get_mirroring_topic_selection_with_context,
        build_get_mirroring_topic_selection, GetMirroringTopicSelectionOptions => MirroringTopicSelection
    );
    operation!(
        /// Replace the include patterns that select mirrored topics.
        replace_mirroring_topic_selection, replace_mirroring_topic_selection_with_context,
        build_replace_mirroring_topic_selection,
        ReplaceMirroringTopicSelectionOptions => MirroringTopicSelection
    );
    operation!(
        get_mirroring_active_topics, get_mirroring_active_topics_with_context,
        build_get_mirroring_active_topics, GetMirroringActiveTopicsOptions => MirroringActiveTopics
    );
    operation!(
        /// Liveness probe.
        alive, alive_with_context, build_alive, AliveOptions => no_content
    );

    // -----------------------------------------------------------------------
    // Shared request/response handling
    // -----------------------------------------------------------------------

    fn build_request<O, B>(
        &self,
        options: &O,
        method: HttpMethod,
        segments: &[&str],
        query: &[(&str, Option<String>)],
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError>
    where
        O: Validate,
        B: Serialize + ?Sized,
    {
        options.validate()?;
        // `Url` drops dot segments, which would retarget the request.
        if let Some(dots) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ApiError::Validation(format!(
                "path parameter '{dots}' is not allowed"
            )));
        }
        if self.base_url.is_empty() {
            return Err(ApiError::ServiceUrlMissing);
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Config(format!("invalid service URL '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if query.iter().any(|(_, v)| v.is_some()) {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                if let Some(value) = value {
                    pairs.append_pair(name, value);
                }
            }
        }

        let mut request = HttpRequest {
            method,
            url: url.into(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            body: None,
        };
        if let Some(body) = body {
            let json = serde_json::to_vec(body).map_err(ApiError::Serialization)?;
            request.set_header("Content-Type", "application/json");
            if self.gzip {
                request.body = Some(gzip(&json)?);
                request.set_header("Content-Encoding", "gzip");
            } else {
                request.body = Some(json);
            }
        }
        request.set_header("User-Agent", USER_AGENT);
        for (name, value) in self.default_headers.iter().chain(options.custom_headers()) {
            request.set_header(name, value);
        }
        Ok(request)
    }

    fn invoke<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        request: HttpRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        let response = self.send(ctx, request)?;
        Self::parse_response(response)
    }

    fn invoke_no_content(
        &self,
        ctx: &CallContext,
        request: HttpRequest,
    ) -> Result<HttpResponse, ApiError> {
        let response = self.send(ctx, request)?;
        if !response.is_success() {
            return Err(ApiError::from_response(response));
        }
        Ok(response)
    }

    /// Interpret a response envelope: non-2xx becomes `ApiError::Http`, an
    /// empty 2xx body yields no result, anything else must decode as `T`.
    pub fn parse_response<T: DeserializeOwned>(
        response: HttpResponse,
    ) -> Result<ApiResponse<T>, ApiError> {
        if !response.is_success() {
            return Err(ApiError::from_response(response));
        }
        if response.body.trim().is_empty() {
            return Ok(ApiResponse {
                result: None,
                response,
            });
        }
        match serde_json::from_str(&response.body) {
            Ok(result) => Ok(ApiResponse {
                result: Some(result),
                response,
            }),
            Err(source) => Err(ApiError::Deserialization {
                source,
                response: Box::new(response),
            }),
        }
    }

    /// Authenticate and send, retrying per the retry policy within the
    /// context's deadline. Any received response is returned as-is.
    fn send(&self, ctx: &CallContext, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.authenticator.authenticate(&mut request)?;

        let max_attempts = self.retry.max_attempts();
        let mut attempt = 0;
        loop {
            let remaining = ctx.remaining();
            if remaining.is_some_and(|r| r.is_zero()) {
                warn!(method = %request.method, url = %request.url, attempt, "deadline exceeded before send");
                return Err(ApiError::DeadlineExceeded);
            }
            let (timeout, deadline_bound) = match (remaining, self.timeout) {
                (Some(r), Some(t)) if t < r => (Some(t), false),
                (Some(r), _) => (Some(r), true),
                (None, t) => (t, false),
            };

            debug!(method = %request.method, url = %request.url, attempt, "sending request");
            let outcome = match self.transport.execute(&request, timeout) {
                Err(ApiError::DeadlineExceeded) if !deadline_bound => Err(ApiError::Transport(
                    format!("request timed out after {timeout:?}"),
                )),
                other => other,
            };

            let retryable = match &outcome {
                Ok(response) => {
                    debug!(status = response.status, attempt, "received response");
                    is_retryable_status(response.status)
                }
                Err(ApiError::Transport(_)) => true,
                Err(_) => false,
            };
            attempt += 1;
            if !retryable || attempt >= max_attempts {
                return outcome;
            }

            let wait = self.retry.backoff(attempt - 1, outcome.as_ref().ok());
            if ctx.remaining().is_some_and(|r| r <= wait) {
                warn!(method = %request.method, url = %request.url, attempt, "deadline exceeded while waiting to retry");
                return Err(ApiError::DeadlineExceeded);
            }
            match &outcome {
                Ok(response) => warn!(status = response.status, attempt, ?wait, "retrying request"),
                Err(err) => warn!(error = %err, attempt, ?wait, "retrying request"),
            }
            thread::sleep(wait);
        }
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
