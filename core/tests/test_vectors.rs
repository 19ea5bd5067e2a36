//! Verify build/parse against JSON test vectors stored in `test-vectors/`.
//!
//! Each case describes the options, the expected request, a simulated
//! response, and either the expected typed result or the expected error.
//! Bodies and results are compared as parsed values, not raw strings, so
//! field ordering does not matter. `User-Agent` carries the crate version
//! and is left out of the header comparison.

use std::fmt::Debug;

use adminrest_core::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client() -> AdminRestClient {
    AdminRestClient::new(ServiceOptions::new().url(BASE_URL)).unwrap()
}

#[derive(Deserialize)]
struct Case {
    name: String,
    input: Value,
    expected_request: ExpectedRequest,
    simulated_response: SimulatedResponse,
    expected_result: Option<Value>,
    expected_error: Option<ExpectedError>,
}

#[derive(Deserialize)]
struct ExpectedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

#[derive(Deserialize)]
struct SimulatedResponse {
    status: u16,
    body: String,
}

#[derive(Deserialize)]
struct ExpectedError {
    status: u16,
    message: String,
}

fn cases(raw: &str, group: &str) -> Vec<Case> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    serde_json::from_value(vectors[group].clone()).unwrap()
}

fn str_field(input: &Value, field: &str) -> Option<String> {
    input[field].as_str().map(str::to_string)
}

fn check_request(case: &Case, req: &HttpRequest) {
    let name = &case.name;
    let expected = &case.expected_request;
    assert_eq!(req.method.as_str(), expected.method, "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected.path), "{name}: path");

    let headers: Vec<(String, String)> = req
        .headers
        .iter()
        .filter(|(k, _)| !k.eq_ignore_ascii_case("User-Agent"))
        .cloned()
        .collect();
    assert_eq!(headers, expected.headers, "{name}: headers");

    let body = req
        .body
        .as_deref()
        .map(|b| serde_json::from_slice::<Value>(b).unwrap());
    assert_eq!(body, expected.body, "{name}: body");
}

fn simulated(case: &Case) -> HttpResponse {
    HttpResponse {
        status: case.simulated_response.status,
        headers: Vec::new(),
        body: case.simulated_response.body.clone(),
    }
}

/// Check a typed parse against `expected_result` or `expected_error`.
fn check_parse<T>(case: &Case)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    let name = &case.name;
    let parsed = AdminRestClient::parse_response::<T>(simulated(case));
    match (&case.expected_error, parsed) {
        (Some(expected), Err(ApiError::Http { status, message, .. })) => {
            assert_eq!(status, expected.status, "{name}: status");
            assert_eq!(message, expected.message, "{name}: message");
        }
        (None, Ok(response)) => {
            let expected: Option<T> = case
                .expected_result
                .clone()
                .map(|v| serde_json::from_value(v).unwrap());
            assert_eq!(response.result, expected, "{name}: parsed result");
            assert_eq!(response.response.status, case.simulated_response.status);
        }
        (_, other) => panic!("{name}: unexpected outcome {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

#[test]
fn create_topic_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/topics.json"), "create") {
        let input = &case.input;
        let mut options = CreateTopicOptions::new(str_field(input, "name").unwrap());
        if let Some(partitions) = input["partitions"].as_i64() {
            options = options.partitions(partitions);
        }
        if let Some(configs) = input.get("configs") {
            options = options.configs(serde_json::from_value(configs.clone()).unwrap());
        }

        check_request(&case, &c.build_create_topic(&options).unwrap());
        // No-content operations only care about the status.
        check_parse::<Value>(&case);
    }
}

#[test]
fn list_topics_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/topics.json"), "list") {
        let input = &case.input;
        let mut options = ListTopicsOptions::new();
        if let Some(filter) = str_field(input, "topic_filter") {
            options = options.topic_filter(filter);
        }
        if let Some(per_page) = input["per_page"].as_i64() {
            options = options.per_page(per_page);
        }
        if let Some(page) = input["page"].as_i64() {
            options = options.page(page);
        }

        check_request(&case, &c.build_list_topics(&options).unwrap());
        check_parse::<Vec<TopicDetail>>(&case);
    }
}

#[test]
fn get_topic_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/topics.json"), "get") {
        let options = GetTopicOptions::new(str_field(&case.input, "topic_name").unwrap());
        check_request(&case, &c.build_get_topic(&options).unwrap());
        check_parse::<TopicDetail>(&case);
    }
}

// ---------------------------------------------------------------------------
// Quotas
// ---------------------------------------------------------------------------

#[test]
fn create_quota_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/quotas.json"), "create") {
        let input = &case.input;
        let mut options = CreateQuotaOptions::new(str_field(input, "entity_name").unwrap());
        if let Some(rate) = input["producer_byte_rate"].as_i64() {
            options = options.producer_byte_rate(rate);
        }
        if let Some(rate) = input["consumer_byte_rate"].as_i64() {
            options = options.consumer_byte_rate(rate);
        }

        check_request(&case, &c.build_create_quota(&options).unwrap());
        check_parse::<Value>(&case);
    }
}

#[test]
fn list_quotas_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/quotas.json"), "list") {
        check_request(&case, &c.build_list_quotas(&ListQuotasOptions::new()).unwrap());
        check_parse::<QuotaList>(&case);
    }
}

// ---------------------------------------------------------------------------
// Consumer groups
// ---------------------------------------------------------------------------

#[test]
fn update_consumer_group_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/consumer_groups.json"), "update") {
        let input = &case.input;
        let mut options = UpdateConsumerGroupOptions::new(str_field(input, "group_id").unwrap());
        if let Some(topic) = str_field(input, "topic") {
            options = options.topic(topic);
        }
        if let Some(mode) = str_field(input, "mode") {
            options = options.mode(mode);
        }
        if let Some(value) = str_field(input, "value") {
            options = options.value(value);
        }
        if let Some(execute) = input["execute"].as_bool() {
            options = options.execute(execute);
        }

        check_request(&case, &c.build_update_consumer_group(&options).unwrap());
        check_parse::<Vec<GroupResetResultsItem>>(&case);
    }
}
