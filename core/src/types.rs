//! Wire models for the admin REST API.
//!
//! # Design
//! Response models default every field so that partially populated payloads
//! still decode; request bodies skip unset optional fields. The mock-server
//! crate defines its own copies of these shapes and the integration tests
//! catch drift between the two.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// A topic as reported by `GET /admin/topics` and `GET /admin/topics/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicDetail {
    pub name: Option<String>,
    pub partitions: Option<i64>,
    pub replication_factor: Option<i64>,
    pub retention_ms: Option<i64>,
    pub cleanup_policy: Option<String>,
    pub configs: Option<TopicConfigs>,
    pub replica_assignments: Vec<ReplicaAssignment>,
}

/// The subset of topic configuration surfaced by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicConfigs {
    #[serde(rename = "cleanup.policy", skip_serializing_if = "Option::is_none")]
    pub cleanup_policy: Option<String>,
    #[serde(rename = "min.insync.replicas", skip_serializing_if = "Option::is_none")]
    pub min_insync_replicas: Option<String>,
    #[serde(rename = "retention.bytes", skip_serializing_if = "Option::is_none")]
    pub retention_bytes: Option<String>,
    #[serde(rename = "retention.ms", skip_serializing_if = "Option::is_none")]
    pub retention_ms: Option<String>,
    #[serde(rename = "segment.bytes", skip_serializing_if = "Option::is_none")]
    pub segment_bytes: Option<String>,
    #[serde(rename = "segment.index.bytes", skip_serializing_if = "Option::is_none")]
    pub segment_index_bytes: Option<String>,
    #[serde(rename = "segment.ms", skip_serializing_if = "Option::is_none")]
    pub segment_ms: Option<String>,
}

/// Replica placement of one partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicaAssignment {
    pub id: Option<i64>,
    pub brokers: Option<ReplicaAssignmentBrokers>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicaAssignmentBrokers {
    pub replicas: Vec<i64>,
}

/// A config override applied when creating a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCreate {
    pub name: String,
    pub value: String,
}

impl ConfigCreate {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A config change applied when updating a topic. `reset_to_default`
/// discards the override and `value` is then ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_to_default: Option<bool>,
}

impl ConfigUpdate {
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            reset_to_default: None,
        }
    }

    pub fn reset(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            reset_to_default: Some(true),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partitions: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_count: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub configs: Vec<ConfigCreate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_total_partition_count: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub configs: Vec<ConfigUpdate>,
}

/// Records in `partition` with an offset lower than `before_offset` are
/// deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDeleteRequestRecordsToDeleteItem {
    pub partition: i64,
    pub before_offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDeleteRequest {
    pub records_to_delete: Vec<RecordDeleteRequestRecordsToDeleteItem>,
}

// ---------------------------------------------------------------------------
// Quotas
// ---------------------------------------------------------------------------

/// Request body for creating or updating a quota. Rates are bytes/second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_byte_rate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumer_byte_rate: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaDetail {
    pub producer_byte_rate: Option<i64>,
    pub consumer_byte_rate: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityQuotaDetail {
    pub entity_name: Option<String>,
    pub producer_byte_rate: Option<i64>,
    pub consumer_byte_rate: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaList {
    pub data: Vec<EntityQuotaDetail>,
}

// ---------------------------------------------------------------------------
// Brokers and cluster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerSummary {
    pub id: Option<i64>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub rack: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerDetail {
    pub id: Option<i64>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub rack: Option<String>,
    pub configs: Vec<BrokerDetailConfigsItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerDetailConfigsItem {
    pub name: Option<String>,
    pub value: Option<String>,
    pub is_sensitive: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    pub id: Option<String>,
    pub controller: Option<BrokerSummary>,
    pub brokers: Vec<BrokerSummary>,
}

// ---------------------------------------------------------------------------
// Consumer groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDetail {
    pub group_id: Option<String>,
    pub state: Option<String>,
    pub members: Vec<Member>,
    pub offsets: Vec<TopicPartitionOffset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub consumer_id: Option<String>,
    pub client_id: Option<String>,
    pub host: Option<String>,
    pub assignments: Vec<MemberAssignmentsItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberAssignmentsItem {
    pub topic: Option<String>,
    pub partition: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicPartitionOffset {
    pub topic: Option<String>,
    pub partition: Option<i64>,
    pub current_offset: Option<i64>,
    pub end_offset: Option<i64>,
}

/// Offset reset request. Without `execute = true` the server only reports
/// what the reset would do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute: Option<bool>,
}

/// Reset modes accepted by `GroupResetRequest::mode`.
pub mod reset_mode {
    pub const EARLIEST: &str = "earliest";
    pub const LATEST: &str = "latest";
    pub const DATETIME: &str = "datetime";
    pub const SPECIFIC: &str = "specific";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupResetResultsItem {
    pub topic: Option<String>,
    pub partition: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Mirroring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirroringTopicSelection {
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirroringActiveTopics {
    pub active_topics: Vec<String>,
}
