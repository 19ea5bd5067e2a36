//! Per-operation option structs.
//!
//! Each struct is built with `new(required...)` plus chainable setters named
//! after the field they set. Fields stay public so callers can read back
//! what they set.
//! Every struct carries `headers`, merged last (and therefore winning) over
//! the client's own headers.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::types::{ConfigCreate, ConfigUpdate, RecordDeleteRequestRecordsToDeleteItem};

/// Call-time validation of required fields.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;

    /// Per-call headers, merged over every other header.
    fn custom_headers(&self) -> &BTreeMap<String, String>;
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} must be set")));
    }
    Ok(())
}

/// Defines an options struct together with its constructor, setters and
/// `Validate` impl.
///
/// `required` fields are constructor arguments (strings must be non-empty at
/// call time), `optional` fields start as `None`, `lists` start empty.
macro_rules! options {
    (
        $(#[$meta:meta])*
        $name:ident {
            required { $($req:ident : $req_ty:ty),* $(,)? }
            optional { $($opt:ident : $opt_ty:ty),* $(,)? }
            lists { $($list:ident : $item_ty:ty),* $(,)? }
        }
        check |$this:ident| $check:block
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $(pub $req: $req_ty,)*
            $(pub $opt: Option<$opt_ty>,)*
            $(pub $list: Vec<$item_ty>,)*
            pub headers: BTreeMap<String, String>,
        }

        impl $name {
            pub fn new($($req: impl Into<$req_ty>),*) -> Self {
                Self {
                    $($req: $req.into(),)*
                    ..Default::default()
                }
            }

            paste_setters! { $($opt: $opt_ty),* }

            $(
                pub fn $list(mut self, $list: Vec<$item_ty>) -> Self {
                    self.$list = $list;
                    self
                }
            )*

            pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
                self.headers = headers;
                self
            }

            pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.headers.insert(name.into(), value.into());
                self
            }
        }

        impl Validate for $name {
            fn validate(&self) -> Result<(), ApiError> {
                let $this = self;
                $check
            }

            fn custom_headers(&self) -> &BTreeMap<String, String> {
                &self.headers
            }
        }
    };
}

/// Optional-field setters take the bare value and wrap it in `Some`.
macro_rules! paste_setters {
    ($($opt:ident : $opt_ty:ty),*) => {
        $(
            pub fn $opt(mut self, $opt: impl Into<$opt_ty>) -> Self {
                self.$opt = Some($opt.into());
                self
            }
        )*
    };
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

options! {
    /// Options for `create_topic`.
    CreateTopicOptions {
        required { name: String }
        optional { partitions: i64, partition_count: i64 }
        lists { configs: ConfigCreate }
    }
    check |o| { require("name", &o.name) }
}

options! {
    /// Options for `list_topics`. `topic_filter` accepts `*` wildcards.
    ListTopicsOptions {
        required {}
        optional { topic_filter: String, per_page: i64, page: i64 }
        lists {}
    }
    check |_o| { Ok(()) }
}

options! {
    GetTopicOptions {
        required { topic_name: String }
        optional {}
        lists {}
    }
    check |o| { require("topic_name", &o.topic_name) }
}

options! {
    /// Options for `update_topic`. Partition counts can only grow.
    UpdateTopicOptions {
        required { topic_name: String }
        optional { new_total_partition_count: i64 }
        lists { configs: ConfigUpdate }
    }
    check |o| { require("topic_name", &o.topic_name) }
}

options! {
    DeleteTopicOptions {
        required { topic_name: String }
        optional {}
        lists {}
    }
    check |o| { require("topic_name", &o.topic_name) }
}

options! {
    /// Options for `delete_topic_records`.
    DeleteTopicRecordsOptions {
        required { topic_name: String }
        optional {}
        lists { records_to_delete: RecordDeleteRequestRecordsToDeleteItem }
    }
    check |o| {
        require("topic_name", &o.topic_name)?;
        if o.records_to_delete.is_empty() {
            return Err(ApiError::Validation("records_to_delete must be set".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Quotas
// ---------------------------------------------------------------------------

options! {
    CreateQuotaOptions {
        required { entity_name: String }
        optional { producer_byte_rate: i64, consumer_byte_rate: i64 }
        lists {}
    }
    check |o| { require("entity_name", &o.entity_name) }
}

options! {
    UpdateQuotaOptions {
        required { entity_name: String }
        optional { producer_byte_rate: i64, consumer_byte_rate: i64 }
        lists {}
    }
    check |o| { require("entity_name", &o.entity_name) }
}

options! {
    DeleteQuotaOptions {
        required { entity_name: String }
        optional {}
        lists {}
    }
    check |o| { require("entity_name", &o.entity_name) }
}

options! {
    GetQuotaOptions {
        required { entity_name: String }
        optional {}
        lists {}
    }
    check |o| { require("entity_name", &o.entity_name) }
}

options! {
    ListQuotasOptions {
        required {}
        optional {}
        lists {}
    }
    check |_o| { Ok(()) }
}

// ---------------------------------------------------------------------------
// Brokers and cluster
// ---------------------------------------------------------------------------

options! {
    ListBrokersOptions {
        required {}
        optional {}
        lists {}
    }
    check |_o| { Ok(()) }
}

options! {
    GetBrokerOptions {
        required { broker_id: i64 }
        optional {}
        lists {}
    }
    check |_o| { Ok(()) }
}

options! {
    /// Options for `get_broker_config`. `config_filter` is a `*` wildcard
    /// pattern; `verbose` includes defaulted configs.
    GetBrokerConfigOptions {
        required { broker_id: i64 }
        optional { config_filter: String, verbose: bool }
        lists {}
    }
    check |_o| { Ok(()) }
}

options! {
    GetClusterOptions {
        required {}
        optional {}
        lists {}
    }
    check |_o| { Ok(()) }
}

// ---------------------------------------------------------------------------
// Consumer groups
// ---------------------------------------------------------------------------

options! {
    ListConsumerGroupsOptions {
        required {}
        optional { group_filter: String, per_page: i64, page: i64 }
        lists {}
    }
    check |_o| { Ok(()) }
}

options! {
    GetConsumerGroupOptions {
        required { group_id: String }
        optional {}
        lists {}
    }
    check |o| { require("group_id", &o.group_id) }
}

options! {
    DeleteConsumerGroupOptions {
        required { group_id: String }
        optional {}
        lists {}
    }
    check |o| { require("group_id", &o.group_id) }
}

options! {
    /// Options for `update_consumer_group` (offset reset). Leave `execute`
    /// unset or `false` to preview; `true` commits the new offsets.
    UpdateConsumerGroupOptions {
        required { group_id: String }
        optional { topic: String, mode: String, value: String, execute: bool }
        lists {}
    }
    check |o| { require("group_id", &o.group_id) }
}

// ---------------------------------------------------------------------------
// Mirroring and health
// ---------------------------------------------------------------------------

options! {
    GetMirroringTopicSelectionOptions {
        required {}
        optional {}
        lists {}
    }
    check |_o| { Ok(()) }
}

options! {
    /// Options for `replace_mirroring_topic_selection`. An empty `includes`
    /// list is valid and stops all mirroring.
    ReplaceMirroringTopicSelectionOptions {
        required {}
        optional {}
        lists { includes: String }
    }
    check |_o| { Ok(()) }
}

options! {
    GetMirroringActiveTopicsOptions {
        required {}
        optional {}
        lists {}
    }
    check |_o| { Ok(()) }
}

options! {
    AliveOptions {
        required {}
        optional {}
        lists {}
    }
    check |_o| { Ok(()) }
}
