//! Full admin lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through the default ureq transport, checking
//! that request building, authentication and response parsing agree with
//! the server end to end.

mod common;

use adminrest_core::*;

#[test]
fn admin_lifecycle() {
    let url = common::spawn(mock_server::app());
    let client = AdminRestClient::new(
        ServiceOptions::new()
            .url(&url)
            .authenticator(BearerTokenAuthenticator::new("integration-token")),
    )
    .unwrap();

    // Health.
    let response = client.alive(&AliveOptions::new()).unwrap();
    assert_eq!(response.status, 200);

    // Seeded state.
    let topics = client.list_topics(&ListTopicsOptions::new()).unwrap();
    let topics = topics.result.unwrap();
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].name.as_deref(), Some("payments"));

    // Create a topic.
    let response = client
        .create_topic(
            &CreateTopicOptions::new("orders")
                .partitions(2)
                .configs(vec![ConfigCreate::new("retention.ms", "3600000")]),
        )
        .unwrap();
    assert_eq!(response.status, 202);

    let topic = client
        .get_topic(&GetTopicOptions::new("orders"))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(topic.name.as_deref(), Some("orders"));
    assert_eq!(topic.partitions, Some(2));
    assert_eq!(topic.retention_ms, Some(3_600_000));
    assert_eq!(
        topic.configs.unwrap().retention_ms.as_deref(),
        Some("3600000")
    );
    assert_eq!(topic.replica_assignments.len(), 2);

    // A second create is rejected with the server's message.
    let err = client
        .create_topic(&CreateTopicOptions::new("orders"))
        .unwrap_err();
    match &err {
        ApiError::Http { status, message, .. } => {
            assert_eq!(*status, 422);
            assert!(message.contains("already exists"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Filtered listing.
    let filtered = client
        .list_topics(&ListTopicsOptions::new().topic_filter("ord*"))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(filtered.len(), 1);

    // Grow partitions and reset a config.
    let response = client
        .update_topic(
            &UpdateTopicOptions::new("orders")
                .new_total_partition_count(4)
                .configs(vec![ConfigUpdate::reset("retention.ms")]),
        )
        .unwrap();
    assert_eq!(response.status, 202);
    let topic = client
        .get_topic(&GetTopicOptions::new("orders"))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(topic.partitions, Some(4));
    assert_eq!(topic.retention_ms, Some(86_400_000));

    // DELETE with a body.
    let response = client
        .delete_topic_records(&DeleteTopicRecordsOptions::new("orders").records_to_delete(vec![
            RecordDeleteRequestRecordsToDeleteItem {
                partition: 3,
                before_offset: 10,
            },
        ]))
        .unwrap();
    assert_eq!(response.status, 202);

    // Quotas.
    let response = client
        .create_quota(&CreateQuotaOptions::new("alice").producer_byte_rate(1024))
        .unwrap();
    assert_eq!(response.status, 201);
    client
        .update_quota(&UpdateQuotaOptions::new("alice").consumer_byte_rate(2048))
        .unwrap();
    let quota = client
        .get_quota(&GetQuotaOptions::new("alice"))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(
        quota,
        QuotaDetail {
            producer_byte_rate: Some(1024),
            consumer_byte_rate: Some(2048),
        }
    );
    let quotas = client
        .list_quotas(&ListQuotasOptions::new())
        .unwrap()
        .result
        .unwrap();
    assert_eq!(quotas.data.len(), 1);
    assert_eq!(quotas.data[0].entity_name.as_deref(), Some("alice"));
    client
        .delete_quota(&DeleteQuotaOptions::new("alice"))
        .unwrap();
    let err = client
        .get_quota(&GetQuotaOptions::new("alice"))
        .unwrap_err();
    assert_eq!(err.status(), Some(404));

    // Brokers and cluster.
    let brokers = client
        .list_brokers(&ListBrokersOptions::new())
        .unwrap()
        .result
        .unwrap();
    assert_eq!(brokers.len(), 3);
    let broker = client
        .get_broker(&GetBrokerOptions::new(1))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(broker.host.as_deref(), Some("kafka-1.mock.local"));
    let configs = client
        .get_broker_config(
            &GetBrokerConfigOptions::new(1)
                .config_filter("ssl.*")
                .verbose(true),
        )
        .unwrap()
        .result
        .unwrap()
        .configs;
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].is_sensitive, Some(true));
    let cluster = client
        .get_cluster(&GetClusterOptions::new())
        .unwrap()
        .result
        .unwrap();
    assert_eq!(cluster.brokers.len(), 3);
    assert_eq!(cluster.controller.and_then(|c| c.id), Some(0));

    // Consumer groups: preview, then commit.
    let groups = client
        .list_consumer_groups(&ListConsumerGroupsOptions::new().group_filter("billing*"))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(groups, vec!["billing-service".to_string()]);

    let preview = client
        .update_consumer_group(
            &UpdateConsumerGroupOptions::new("billing-service")
                .topic("payments")
                .mode(reset_mode::LATEST)
                .execute(false),
        )
        .unwrap()
        .result
        .unwrap();
    assert_eq!(preview.len(), 3);
    assert_eq!(preview[0].offset, Some(100));

    let group = client
        .get_consumer_group(&GetConsumerGroupOptions::new("billing-service"))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(group.offsets[0].current_offset, Some(40));

    client
        .update_consumer_group(
            &UpdateConsumerGroupOptions::new("billing-service")
                .mode(reset_mode::LATEST)
                .execute(true),
        )
        .unwrap();
    let group = client
        .get_consumer_group(&GetConsumerGroupOptions::new("billing-service"))
        .unwrap()
        .result
        .unwrap();
    assert_eq!(group.offsets[0].current_offset, Some(100));

    let response = client
        .delete_consumer_group(&DeleteConsumerGroupOptions::new("billing-service"))
        .unwrap();
    assert_eq!(response.status, 202);

    // Mirroring.
    let selection = client
        .replace_mirroring_topic_selection(
            &ReplaceMirroringTopicSelectionOptions::new().includes(vec!["ord*".to_string()]),
        )
        .unwrap()
        .result
        .unwrap();
    assert_eq!(selection.includes, vec!["ord*".to_string()]);
    let selection = client
        .get_mirroring_topic_selection(&GetMirroringTopicSelectionOptions::new())
        .unwrap()
        .result
        .unwrap();
    assert_eq!(selection.includes, vec!["ord*".to_string()]);
    let active = client
        .get_mirroring_active_topics(&GetMirroringActiveTopicsOptions::new())
        .unwrap()
        .result
        .unwrap();
    assert_eq!(active.active_topics, vec!["orders".to_string()]);

    // Delete and confirm it is gone.
    let response = client
        .delete_topic(&DeleteTopicOptions::new("orders"))
        .unwrap();
    assert_eq!(response.status, 202);
    let err = client
        .get_topic(&GetTopicOptions::new("orders"))
        .unwrap_err();
    match err {
        ApiError::Http {
            status,
            message,
            response,
        } => {
            assert_eq!(status, 404);
            assert_eq!(message, "topic 'orders' does not exist");
            assert!(response.body.contains("\"trace\""));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
