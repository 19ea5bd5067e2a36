//! Canned servers for exercising client edge cases: slow, malformed, empty
//! and intermittently failing responses, plus a request echo.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::Request,
    http::{header, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Answers every request with `body` after `delay`.
pub fn slow(delay: Duration, body: &'static str) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        json_text(StatusCode::OK, body)
    })
}

/// Answers every request with 200 and a body that is not JSON.
pub fn invalid_json() -> Router {
    Router::new().fallback(|| async { json_text(StatusCode::OK, "} this is not valid json {") })
}

/// Answers every request with 200 and no body.
pub fn empty_ok() -> Router {
    Router::new().fallback(|| async { StatusCode::OK })
}

/// Answers every request with `status` and `body`.
pub fn fixed(status: StatusCode, body: &'static str) -> Router {
    Router::new().fallback(move || async move { json_text(status, body) })
}

/// Fails the first `failures` requests with `status`, then answers 200 with
/// `body`. The counter reports how many requests arrived.
pub fn flaky(failures: usize, status: StatusCode, body: &'static str) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().fallback(move || {
        let counter = counter.clone();
        async move {
            let seen = counter.fetch_add(1, Ordering::SeqCst);
            if seen < failures {
                let mut response = json_text(
                    status,
                    r#"{"errors":[{"code":"unavailable","message":"try again"}]}"#,
                )
                .into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, header::HeaderValue::from_static("0"));
                response
            } else {
                json_text(StatusCode::OK, body).into_response()
            }
        }
    });
    (router, hits)
}

/// What `echo` saw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoedRequest {
    pub method: String,
    pub uri: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

/// Answers every request with a JSON description of that request.
pub fn echo() -> Router {
    Router::new().fallback(|request: Request| async move {
        let (parts, body) = request.into_parts();
        let body: Bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();
        let headers = parts
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        Json(EchoedRequest {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            headers,
            body: body.to_vec(),
        })
    })
}

fn json_text(status: StatusCode, body: &'static str) -> impl IntoResponse {
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    #[tokio::test]
    async fn flaky_recovers_after_failures() {
        let (router, hits) = flaky(2, StatusCode::SERVICE_UNAVAILABLE, "{}");
        for expected in [503, 503, 200] {
            let response = router
                .clone()
                .oneshot(axum::http::Request::get("/x").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status().as_u16(), expected);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
