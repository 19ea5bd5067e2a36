//! In-memory implementation of the admin REST API, for tests and local runs.
//!
//! The state starts with three brokers, one topic (`payments`) and one idle
//! consumer group (`billing-service`) so read-only endpoints have something
//! to return.

pub mod fixtures;

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

const REPLICATION_FACTOR: i64 = 3;
const DEFAULT_RETENTION_MS: i64 = 86_400_000;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub name: String,
    pub partitions: i64,
    pub replication_factor: i64,
    pub retention_ms: i64,
    pub cleanup_policy: String,
    pub configs: BTreeMap<String, String>,
    pub replica_assignments: Vec<ReplicaAssignment>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicaAssignment {
    pub id: i64,
    pub brokers: Replicas,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Replicas {
    pub replicas: Vec<i64>,
}

#[derive(Deserialize)]
pub struct CreateTopic {
    pub name: String,
    pub partitions: Option<i64>,
    pub partition_count: Option<i64>,
    #[serde(default)]
    pub configs: Vec<ConfigEntry>,
}

#[derive(Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub value: Option<String>,
    #[serde(default)]
    pub reset_to_default: bool,
}

#[derive(Deserialize)]
pub struct UpdateTopic {
    pub new_total_partition_count: Option<i64>,
    #[serde(default)]
    pub configs: Vec<ConfigEntry>,
}

#[derive(Deserialize)]
pub struct DeleteRecords {
    pub records_to_delete: Vec<RecordsToDelete>,
}

#[derive(Deserialize)]
pub struct RecordsToDelete {
    pub partition: i64,
    pub before_offset: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quota {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_byte_rate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_byte_rate: Option<i64>,
}

#[derive(Serialize)]
struct EntityQuota {
    entity_name: String,
    #[serde(flatten)]
    quota: Quota,
}

#[derive(Serialize)]
struct QuotaList {
    data: Vec<EntityQuota>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Broker {
    pub id: i64,
    pub host: String,
    pub port: i64,
    pub rack: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrokerConfig {
    pub name: String,
    pub value: String,
    pub is_sensitive: bool,
    #[serde(skip)]
    pub is_default: bool,
}

#[derive(Serialize)]
struct BrokerDetail {
    #[serde(flatten)]
    broker: Broker,
    configs: Vec<BrokerConfig>,
}

#[derive(Serialize)]
struct ClusterInfo {
    id: String,
    controller: Broker,
    brokers: Vec<Broker>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub group_id: String,
    pub state: String,
    pub members: Vec<serde_json::Value>,
    pub offsets: Vec<PartitionOffset>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartitionOffset {
    pub topic: String,
    pub partition: i64,
    pub current_offset: i64,
    pub end_offset: i64,
}

#[derive(Deserialize)]
pub struct GroupReset {
    pub topic: Option<String>,
    pub mode: Option<String>,
    pub value: Option<String>,
    #[serde(default)]
    pub execute: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResetResult {
    pub topic: String,
    pub partition: i64,
    pub offset: i64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicSelection {
    pub includes: Vec<String>,
}

#[derive(Serialize)]
struct ActiveTopics {
    active_topics: Vec<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    topic_filter: Option<String>,
    group_filter: Option<String>,
    per_page: Option<usize>,
    page: Option<usize>,
}

#[derive(Deserialize)]
pub struct ConfigParams {
    config_filter: Option<String>,
    #[serde(default)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error response in the `{"errors":[{code,message}], "trace"}` shape.
#[derive(Debug)]
pub struct AdminError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AdminError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(what: &str, name: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", format!("{what} '{name}' does not exist"))
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "unprocessable", message)
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "errors": [{"code": self.code, "message": self.message, "more_info": ""}],
            "trace": Uuid::new_v4(),
        });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AdminState {
    pub topics: BTreeMap<String, Topic>,
    pub quotas: BTreeMap<String, Quota>,
    pub brokers: Vec<Broker>,
    pub broker_configs: Vec<BrokerConfig>,
    pub groups: BTreeMap<String, Group>,
    pub mirroring: TopicSelection,
}

impl Default for AdminState {
    fn default() -> Self {
        let brokers = (0..3)
            .map(|id| Broker {
                id,
                host: format!("kafka-{id}.mock.local"),
                port: 9093,
                rack: format!("zone-{id}"),
            })
            .collect();
        let broker_configs = vec![
            broker_config("log.retention.hours", "168", false, true),
            broker_config("log.segment.bytes", "536870912", false, false),
            broker_config("num.partitions", "1", false, true),
            broker_config("ssl.keystore.password", "", true, false),
        ];

        let mut state = Self {
            topics: BTreeMap::new(),
            quotas: BTreeMap::new(),
            brokers,
            broker_configs,
            groups: BTreeMap::new(),
            mirroring: TopicSelection::default(),
        };
        let payments = new_topic("payments", 3, &[]);
        state.topics.insert(payments.name.clone(), payments);
        state.groups.insert(
            "billing-service".to_string(),
            Group {
                group_id: "billing-service".to_string(),
                state: "Empty".to_string(),
                members: Vec::new(),
                offsets: (0..3)
                    .map(|partition| PartitionOffset {
                        topic: "payments".to_string(),
                        partition,
                        current_offset: 40 + partition,
                        end_offset: 100 + partition,
                    })
                    .collect(),
            },
        );
        state
    }
}

fn broker_config(name: &str, value: &str, is_sensitive: bool, is_default: bool) -> BrokerConfig {
    BrokerConfig {
        name: name.to_string(),
        value: value.to_string(),
        is_sensitive,
        is_default,
    }
}

fn default_topic_configs() -> BTreeMap<String, String> {
    [
        ("cleanup.policy", "delete"),
        ("min.insync.replicas", "2"),
        ("retention.bytes", "1073741824"),
        ("retention.ms", "86400000"),
        ("segment.bytes", "536870912"),
        ("segment.index.bytes", "10485760"),
        ("segment.ms", "604800000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn new_topic(name: &str, partitions: i64, overrides: &[ConfigEntry]) -> Topic {
    let mut topic = Topic {
        name: name.to_string(),
        partitions: 0,
        replication_factor: REPLICATION_FACTOR,
        retention_ms: DEFAULT_RETENTION_MS,
        cleanup_policy: String::new(),
        configs: default_topic_configs(),
        replica_assignments: Vec::new(),
    };
    apply_configs(&mut topic, overrides);
    grow_partitions(&mut topic, partitions);
    topic
}

fn apply_configs(topic: &mut Topic, entries: &[ConfigEntry]) {
    let defaults = default_topic_configs();
    for entry in entries {
        if entry.reset_to_default {
            match defaults.get(&entry.name) {
                Some(default) => topic.configs.insert(entry.name.clone(), default.clone()),
                None => topic.configs.remove(&entry.name),
            };
        } else if let Some(value) = &entry.value {
            topic.configs.insert(entry.name.clone(), value.clone());
        }
    }
    topic.cleanup_policy = topic.configs.get("cleanup.policy").cloned().unwrap_or_default();
    topic.retention_ms = topic
        .configs
        .get("retention.ms")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_RETENTION_MS);
}

fn grow_partitions(topic: &mut Topic, partitions: i64) {
    for id in topic.partitions..partitions {
        let replicas = (0..REPLICATION_FACTOR).map(|i| (id + i) % REPLICATION_FACTOR).collect();
        topic.replica_assignments.push(ReplicaAssignment {
            id,
            brokers: Replicas { replicas },
        });
    }
    topic.partitions = topic.partitions.max(partitions);
}

/// `*` matches any run of characters; everything else matches literally.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == name,
        Some((prefix, rest)) => {
            let Some(tail) = name.strip_prefix(prefix) else {
                return false;
            };
            if rest.is_empty() {
                return true;
            }
            tail.char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(tail.len()))
                .any(|i| wildcard_match(rest, &tail[i..]))
        }
    }
}

/// 1-based pagination; `per_page` of zero or unset returns everything.
fn paginate<T>(items: Vec<T>, per_page: Option<usize>, page: Option<usize>) -> Vec<T> {
    match per_page.filter(|&n| n > 0) {
        None => items,
        Some(per_page) => {
            let page = page.unwrap_or(1).max(1);
            items
                .into_iter()
                .skip((page - 1).saturating_mul(per_page))
                .take(per_page)
                .collect()
        }
    }
}

pub type Db = Arc<RwLock<AdminState>>;

pub fn app() -> Router {
    app_with_state(AdminState::default())
}

pub fn app_with_state(state: AdminState) -> Router {
    let db: Db = Arc::new(RwLock::new(state));
    Router::new()
        .route("/admin/topics", get(list_topics).post(create_topic))
        .route(
            "/admin/topics/{name}",
            get(get_topic).patch(update_topic).delete(delete_topic),
        )
        .route(
            "/admin/topics/{name}/records",
            axum::routing::delete(delete_records),
        )
        .route("/admin/quotas", get(list_quotas))
        .route(
            "/admin/quotas/{entity}",
            get(get_quota)
                .post(create_quota)
                .patch(update_quota)
                .delete(delete_quota),
        )
        .route("/admin/brokers", get(list_brokers))
        .route("/admin/brokers/{id}", get(get_broker))
        .route("/admin/brokers/{id}/configs", get(get_broker_configs))
        .route("/admin/cluster", get(get_cluster))
        .route("/admin/consumergroups", get(list_groups))
        .route(
            "/admin/consumergroups/{id}",
            get(get_group).patch(reset_group).delete(delete_group),
        )
        .route(
            "/admin/mirroring/topic-selection",
            get(get_topic_selection).post(replace_topic_selection),
        )
        .route("/admin/mirroring/active-topics", get(active_topics))
        .route("/alive", get(|| async { StatusCode::OK }))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

/// Serve any router, e.g. one from `fixtures`.
pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

async fn list_topics(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Topic>> {
    let state = db.read().await;
    let topics = state
        .topics
        .values()
        .filter(|t| {
            params
                .topic_filter
                .as_deref()
                .is_none_or(|f| wildcard_match(f, &t.name))
        })
        .cloned()
        .collect();
    Json(paginate(topics, params.per_page, params.page))
}

async fn create_topic(
    State(db): State<Db>,
    Json(input): Json<CreateTopic>,
) -> Result<StatusCode, AdminError> {
    if input.name.is_empty() {
        return Err(AdminError::bad_request("topic name must not be empty"));
    }
    let partitions = input.partitions.or(input.partition_count).unwrap_or(1);
    if partitions < 1 {
        return Err(AdminError::bad_request("partitions must be at least 1"));
    }
    let mut state = db.write().await;
    if state.topics.contains_key(&input.name) {
        return Err(AdminError::unprocessable(format!(
            "topic '{}' already exists",
            input.name
        )));
    }
    let topic = new_topic(&input.name, partitions, &input.configs);
    info!(topic = %topic.name, partitions, "created topic");
    state.topics.insert(topic.name.clone(), topic);
    Ok(StatusCode::ACCEPTED)
}

async fn get_topic(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<Json<Topic>, AdminError> {
    let state = db.read().await;
    state
        .topics
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AdminError::not_found("topic", &name))
}

async fn update_topic(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<UpdateTopic>,
) -> Result<StatusCode, AdminError> {
    let mut state = db.write().await;
    let topic = state
        .topics
        .get_mut(&name)
        .ok_or_else(|| AdminError::not_found("topic", &name))?;
    if let Some(count) = input.new_total_partition_count {
        if count <= topic.partitions {
            return Err(AdminError::unprocessable(format!(
                "partition count can only grow (currently {})",
                topic.partitions
            )));
        }
        grow_partitions(topic, count);
    }
    apply_configs(topic, &input.configs);
    info!(topic = %name, "updated topic");
    Ok(StatusCode::ACCEPTED)
}

async fn delete_topic(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<StatusCode, AdminError> {
    let mut state = db.write().await;
    state
        .topics
        .remove(&name)
        .map(|_| {
            info!(topic = %name, "deleted topic");
            StatusCode::ACCEPTED
        })
        .ok_or_else(|| AdminError::not_found("topic", &name))
}

async fn delete_records(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<DeleteRecords>,
) -> Result<StatusCode, AdminError> {
    let state = db.read().await;
    let topic = state
        .topics
        .get(&name)
        .ok_or_else(|| AdminError::not_found("topic", &name))?;
    if input.records_to_delete.is_empty() {
        return Err(AdminError::bad_request("records_to_delete must not be empty"));
    }
    for item in &input.records_to_delete {
        if item.partition < 0 || item.partition >= topic.partitions {
            return Err(AdminError::unprocessable(format!(
                "partition {} does not exist in topic '{name}'",
                item.partition
            )));
        }
        if item.before_offset < 0 {
            return Err(AdminError::unprocessable("before_offset must not be negative"));
        }
    }
    Ok(StatusCode::ACCEPTED)
}

// ---------------------------------------------------------------------------
// Quotas
// ---------------------------------------------------------------------------

async fn list_quotas(State(db): State<Db>) -> Json<QuotaList> {
    let state = db.read().await;
    let data = state
        .quotas
        .iter()
        .map(|(entity, quota)| EntityQuota {
            entity_name: entity.clone(),
            quota: quota.clone(),
        })
        .collect();
    Json(QuotaList { data })
}

async fn create_quota(
    State(db): State<Db>,
    Path(entity): Path<String>,
    Json(input): Json<Quota>,
) -> Result<StatusCode, AdminError> {
    if input.producer_byte_rate.is_none() && input.consumer_byte_rate.is_none() {
        return Err(AdminError::bad_request(
            "at least one of producer_byte_rate or consumer_byte_rate is required",
        ));
    }
    let mut state = db.write().await;
    if state.quotas.contains_key(&entity) {
        return Err(AdminError::conflict(format!("quota for '{entity}' already exists")));
    }
    info!(entity = %entity, "created quota");
    state.quotas.insert(entity, input);
    Ok(StatusCode::CREATED)
}

async fn update_quota(
    State(db): State<Db>,
    Path(entity): Path<String>,
    Json(input): Json<Quota>,
) -> Result<StatusCode, AdminError> {
    let mut state = db.write().await;
    let quota = state
        .quotas
        .get_mut(&entity)
        .ok_or_else(|| AdminError::not_found("quota", &entity))?;
    if input.producer_byte_rate.is_some() {
        quota.producer_byte_rate = input.producer_byte_rate;
    }
    if input.consumer_byte_rate.is_some() {
        quota.consumer_byte_rate = input.consumer_byte_rate;
    }
    Ok(StatusCode::ACCEPTED)
}

async fn delete_quota(
    State(db): State<Db>,
    Path(entity): Path<String>,
) -> Result<StatusCode, AdminError> {
    let mut state = db.write().await;
    state
        .quotas
        .remove(&entity)
        .map(|_| StatusCode::ACCEPTED)
        .ok_or_else(|| AdminError::not_found("quota", &entity))
}

async fn get_quota(
    State(db): State<Db>,
    Path(entity): Path<String>,
) -> Result<Json<Quota>, AdminError> {
    let state = db.read().await;
    state
        .quotas
        .get(&entity)
        .cloned()
        .map(Json)
        .ok_or_else(|| AdminError::not_found("quota", &entity))
}

// ---------------------------------------------------------------------------
// Brokers and cluster
// ---------------------------------------------------------------------------

async fn list_brokers(State(db): State<Db>) -> Json<Vec<Broker>> {
    Json(db.read().await.brokers.clone())
}

fn find_broker(state: &AdminState, id: i64) -> Result<Broker, AdminError> {
    state
        .brokers
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .ok_or_else(|| AdminError::not_found("broker", id))
}

async fn get_broker(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<BrokerDetail>, AdminError> {
    let state = db.read().await;
    let broker = find_broker(&state, id)?;
    let configs = state
        .broker_configs
        .iter()
        .filter(|c| !c.is_default)
        .cloned()
        .collect();
    Ok(Json(BrokerDetail { broker, configs }))
}

async fn get_broker_configs(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<ConfigParams>,
) -> Result<Json<BrokerDetail>, AdminError> {
    let state = db.read().await;
    let broker = find_broker(&state, id)?;
    let configs = state
        .broker_configs
        .iter()
        .filter(|c| params.verbose || !c.is_default)
        .filter(|c| {
            params
                .config_filter
                .as_deref()
                .is_none_or(|f| wildcard_match(f, &c.name))
        })
        .cloned()
        .collect();
    Ok(Json(BrokerDetail { broker, configs }))
}

async fn get_cluster(State(db): State<Db>) -> Result<Json<ClusterInfo>, AdminError> {
    let state = db.read().await;
    let controller = state
        .brokers
        .first()
        .cloned()
        .ok_or_else(|| {
            AdminError::new(StatusCode::SERVICE_UNAVAILABLE, "no_brokers", "no brokers online")
        })?;
    Ok(Json(ClusterInfo {
        id: "mock-cluster".to_string(),
        controller,
        brokers: state.brokers.clone(),
    }))
}

// ---------------------------------------------------------------------------
// Consumer groups
// ---------------------------------------------------------------------------

async fn list_groups(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<String>> {
    let state = db.read().await;
    let ids = state
        .groups
        .keys()
        .filter(|id| {
            params
                .group_filter
                .as_deref()
                .is_none_or(|f| wildcard_match(f, id))
        })
        .cloned()
        .collect();
    Json(paginate(ids, params.per_page, params.page))
}

async fn get_group(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Group>, AdminError> {
    let state = db.read().await;
    state
        .groups
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AdminError::not_found("consumer group", &id))
}

async fn delete_group(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, AdminError> {
    let mut state = db.write().await;
    let group = state
        .groups
        .get(&id)
        .ok_or_else(|| AdminError::not_found("consumer group", &id))?;
    if !group.members.is_empty() {
        return Err(AdminError::conflict(format!("consumer group '{id}' is active")));
    }
    state.groups.remove(&id);
    info!(group = %id, "deleted consumer group");
    Ok(StatusCode::ACCEPTED)
}

/// Preview or commit an offset reset. The mock keeps no record timestamps,
/// so `datetime` resolves to the earliest offset.
async fn reset_group(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<GroupReset>,
) -> Result<Json<Vec<ResetResult>>, AdminError> {
    let mut state = db.write().await;
    let group = state
        .groups
        .get_mut(&id)
        .ok_or_else(|| AdminError::not_found("consumer group", &id))?;
    if input.execute && !group.members.is_empty() {
        return Err(AdminError::conflict(format!(
            "consumer group '{id}' must be inactive to reset offsets"
        )));
    }
    let mode = input.mode.as_deref().unwrap_or("latest");
    let specific = match mode {
        "earliest" | "latest" => None,
        "datetime" => {
            if input.value.as_deref().is_none_or(str::is_empty) {
                return Err(AdminError::bad_request("datetime mode requires a value"));
            }
            None
        }
        "specific" => Some(
            input
                .value
                .as_deref()
                .and_then(|v| v.parse::<i64>().ok())
                .ok_or_else(|| AdminError::bad_request("specific mode requires a numeric value"))?,
        ),
        other => return Err(AdminError::bad_request(format!("unknown reset mode '{other}'"))),
    };

    let mut results = Vec::new();
    for offset in group
        .offsets
        .iter_mut()
        .filter(|o| input.topic.as_deref().is_none_or(|t| t == o.topic))
    {
        let new_offset = match (mode, specific) {
            ("latest", _) => offset.end_offset,
            (_, Some(value)) => value.clamp(0, offset.end_offset),
            _ => 0,
        };
        if input.execute {
            offset.current_offset = new_offset;
        }
        results.push(ResetResult {
            topic: offset.topic.clone(),
            partition: offset.partition,
            offset: new_offset,
        });
    }
    if results.is_empty() {
        return Err(AdminError::unprocessable(format!(
            "consumer group '{id}' has no offsets for the requested topic"
        )));
    }
    if input.execute {
        info!(group = %id, mode, "committed offset reset");
    }
    Ok(Json(results))
}

// ---------------------------------------------------------------------------
// Mirroring
// ---------------------------------------------------------------------------

async fn get_topic_selection(State(db): State<Db>) -> Json<TopicSelection> {
    Json(db.read().await.mirroring.clone())
}

async fn replace_topic_selection(
    State(db): State<Db>,
    Json(input): Json<TopicSelection>,
) -> Json<TopicSelection> {
    let mut state = db.write().await;
    state.mirroring = input;
    info!(includes = ?state.mirroring.includes, "replaced mirroring topic selection");
    Json(state.mirroring.clone())
}

async fn active_topics(State(db): State<Db>) -> Json<ActiveTopics> {
    let state = db.read().await;
    let active_topics = state
        .topics
        .keys()
        .filter(|name| {
            state
                .mirroring
                .includes
                .iter()
                .any(|pattern| wildcard_match(pattern, name))
        })
        .cloned()
        .collect();
    Json(ActiveTopics { active_topics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_serializes_with_wire_names() {
        let topic = new_topic("orders", 2, &[]);
        let json = serde_json::to_value(&topic).unwrap();
        assert_eq!(json["name"], "orders");
        assert_eq!(json["replicationFactor"], 3);
        assert_eq!(json["configs"]["cleanup.policy"], "delete");
        assert_eq!(json["replicaAssignments"][1]["brokers"]["replicas"], serde_json::json!([1, 2, 0]));
    }

    #[test]
    fn config_overrides_and_resets() {
        let mut topic = new_topic(
            "orders",
            1,
            &[ConfigEntry {
                name: "retention.ms".to_string(),
                value: Some("1000".to_string()),
                reset_to_default: false,
            }],
        );
        assert_eq!(topic.retention_ms, 1000);
        apply_configs(
            &mut topic,
            &[ConfigEntry {
                name: "retention.ms".to_string(),
                value: None,
                reset_to_default: true,
            }],
        );
        assert_eq!(topic.retention_ms, DEFAULT_RETENTION_MS);
    }

    #[test]
    fn wildcard_patterns() {
        assert!(wildcard_match("orders", "orders"));
        assert!(!wildcard_match("orders", "orders-eu"));
        assert!(wildcard_match("orders*", "orders-eu"));
        assert!(wildcard_match("*-eu", "orders-eu"));
        assert!(wildcard_match("o*s-*u", "orders-eu"));
        assert!(wildcard_match("*", ""));
        assert!(!wildcard_match("pay*", "orders"));
    }

    #[test]
    fn pagination_is_one_based() {
        let items: Vec<i32> = (1..=5).collect();
        assert_eq!(paginate(items.clone(), Some(2), Some(2)), vec![3, 4]);
        assert_eq!(paginate(items.clone(), Some(2), None), vec![1, 2]);
        assert_eq!(paginate(items.clone(), None, Some(3)), items);
        assert!(paginate(items.clone(), Some(2), Some(9)).is_empty());
        assert!(paginate(items, Some(2), Some(usize::MAX)).is_empty());
    }

    #[test]
    fn group_reset_accepts_partial_body() {
        let input: GroupReset = serde_json::from_str(r#"{"mode":"earliest"}"#).unwrap();
        assert!(!input.execute);
        assert!(input.topic.is_none());
    }
}
