//! Pipeline behaviour against a scripted transport.
//!
//! # Design
//! `ScriptedTransport` replays canned responses in order and records every
//! request it receives, so tests can assert both what the client returned
//! and how many exchanges it attempted.

use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use flate2::write::GzEncoder;
use flate2::Compression;
use gatus_client::{
    CallContext, Client, ClientConfig, DecodeError, EndpointStatus, Error, HttpMethod, HttpRequest, HttpResponse,
    Transport, TransportError,
};

#[derive(Clone, Default)]
struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> HttpRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest, _ctx: &CallContext) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {}", request.url))
    }
}

fn client(responses: Vec<Result<HttpResponse, TransportError>>) -> (Client, ScriptedTransport) {
    let transport = ScriptedTransport::new(responses);
    let client = Client::with_transport("https://status.example.org/", ClientConfig::default(), transport.clone());
    (client, transport)
}

fn ok(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(200, body))
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn ctx() -> CallContext {
    CallContext::background()
}

// ---------------------------------------------------------------------------
// Validation happens before any network call
// ---------------------------------------------------------------------------

#[test]
fn empty_key_is_rejected_without_request() {
    let (client, transport) = client(Vec::new());

    let err = client.endpoint_status_by_key(&ctx(), "").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "key", .. }));
    let err = client.endpoint_uptime_data(&ctx(), "", "24h").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "key", .. }));
    let err = client.endpoint_response_times(&ctx(), "", "24h").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "key", .. }));
    let err = client.suite_status_by_key(&ctx(), "").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "key", .. }));
    let err = client.push_external_result(&ctx(), "", "token", true, "", "").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "key", .. }));

    assert_eq!(transport.calls(), 0);
}

#[test]
fn empty_name_is_rejected_without_request() {
    let (client, transport) = client(Vec::new());

    let err = client.endpoint_status(&ctx(), "core", "").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "name", .. }));
    let err = client.suite_status(&ctx(), "", "").unwrap_err();
    assert!(matches!(err, Error::Validation { field: "name", .. }));

    assert_eq!(transport.calls(), 0);
}

#[test]
fn unknown_duration_is_rejected_without_request() {
    let (client, transport) = client(Vec::new());

    for duration in ["2h", "", "1H", "48h"] {
        let err = client.endpoint_uptime(&ctx(), "core_blog-home", duration).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "duration", .. }));
        let err = client.endpoint_response_times(&ctx(), "core_blog-home", duration).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "duration", .. }));
    }

    assert_eq!(transport.calls(), 0);
}

#[test]
fn missing_token_is_rejected_without_request() {
    let (client, transport) = client(Vec::new());

    let err = client
        .push_external_result(&ctx(), "core_ext-ep-test", "", true, "", "")
        .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "token", .. }));
    assert_eq!(transport.calls(), 0);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[test]
fn cancelled_context_is_transport_failure() {
    let (client, transport) = client(vec![ok("[]")]);
    let ctx = CallContext::background();
    ctx.cancel();

    let err = client.endpoint_statuses(&ctx).unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn expired_deadline_is_transport_failure() {
    let (client, transport) = client(vec![ok(r#"{"uptime":1.0}"#)]);
    let ctx = CallContext::with_deadline(Instant::now() - Duration::from_millis(1));

    let err = client.endpoint_uptime_data(&ctx, "core_blog-home", "1h").unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::DeadlineExceeded)));
    assert_eq!(transport.calls(), 0);
}

#[test]
fn cancellation_during_exchange_discards_response() {
    struct CancellingTransport;

    impl Transport for CancellingTransport {
        fn execute(&self, _request: &HttpRequest, ctx: &CallContext) -> Result<HttpResponse, TransportError> {
            ctx.cancel();
            Ok(HttpResponse::new(200, "[]"))
        }
    }

    let client = Client::with_transport("https://status.example.org", ClientConfig::default(), CancellingTransport);
    let err = client.suite_statuses(&CallContext::background()).unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Cancelled)));
}

#[test]
fn transport_failure_is_propagated() {
    let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
    let (client, _) = client(vec![Err(TransportError::Io(Box::new(refused)))]);

    let err = client.endpoint_statuses(&ctx()).unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Io(_))));
    assert!(err.to_string().contains("connection refused"));
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn status_by_group_and_name_uses_normalized_key() {
    let body = r#"{"name":"health check","group":"api/v1","key":"api-v1_health check","results":[]}"#;
    let (client, transport) = client(vec![ok(body)]);

    let status = client.endpoint_status(&ctx(), "api/v1", "health check").unwrap();
    assert_eq!(status.name, "health check");

    let request = transport.request(0);
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(
        request.url,
        "https://status.example.org/api/v1/endpoints/api-v1_health%20check/statuses"
    );
    assert_eq!(request.header("accept-encoding"), Some("gzip"));
}

#[test]
fn push_sends_sorted_query_and_bearer_token() {
    let (client, transport) = client(vec![Ok(HttpResponse::new(200, ""))]);

    client
        .push_external_result(&ctx(), "core_ext-ep-test", "potato", false, "timed out", "10s")
        .unwrap();

    let request = transport.request(0);
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.url,
        "https://status.example.org/api/v1/endpoints/core_ext-ep-test/external?duration=10s&error=timed%20out&success=false"
    );
    assert_eq!(request.header("authorization"), Some("Bearer potato"));
}

#[test]
fn push_omits_empty_optional_parameters() {
    let (client, transport) = client(vec![Ok(HttpResponse::new(204, ""))]);

    client
        .push_external_result(&ctx(), "core_ext-ep-test", "potato", true, "", "")
        .unwrap();
    assert!(transport.request(0).url.ends_with("/external?success=true"));
}

#[test]
fn push_rejection_is_api_error() {
    let (client, _) = client(vec![Ok(HttpResponse::new(401, "invalid token"))]);

    let err = client
        .push_external_result(&ctx(), "core_ext-ep-test", "wrong", true, "", "")
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

// ---------------------------------------------------------------------------
// Decoding through the client
// ---------------------------------------------------------------------------

#[test]
fn no_content_is_zero_value() {
    let (client, _) = client(vec![Ok(HttpResponse::new(204, ""))]);

    let status = client.endpoint_status_by_key(&ctx(), "core_blog-home").unwrap();
    assert_eq!(status, EndpointStatus::default());
}

#[test]
fn not_found_carries_raw_body() {
    let (client, _) = client(vec![Ok(HttpResponse::new(404, r#"{"error":"not found"}"#))]);

    let err = client.suite_status_by_key(&ctx(), "_missing").unwrap_err();
    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 404);
            assert_eq!(api.body, r#"{"error":"not found"}"#);
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test]
fn gzip_response_is_inflated() {
    let json = br#"{"average":150000000,"min":50000000,"max":500000000}"#;
    let response = HttpResponse::new(200, gzip(json)).with_header("Content-Encoding", "gzip");
    let (client, _) = client(vec![Ok(response)]);

    let data = client.endpoint_response_times(&ctx(), "core_blog-home", "24h").unwrap();
    assert_eq!(data.average, 150_000_000);
    assert_eq!(data.max, 500_000_000);
}

#[test]
fn fake_gzip_is_decode_error() {
    let response = HttpResponse::new(200, "[]").with_header("Content-Encoding", "gzip");
    let (client, _) = client(vec![Ok(response)]);

    let err = client.endpoint_statuses(&ctx()).unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Gzip(_))));
}

// ---------------------------------------------------------------------------
// Uptime fallback
// ---------------------------------------------------------------------------

#[test]
fn structured_uptime_needs_one_request() {
    let body = r#"{"uptime":0.995,"duration":"24h","timestamp":"2025-10-19T12:00:00Z"}"#;
    let (client, transport) = client(vec![ok(body)]);

    let data = client.endpoint_uptime_data(&ctx(), "core_blog-home", "24h").unwrap();
    assert_eq!(data.uptime, 0.995);
    assert!(data.timestamp.is_some());
    assert_eq!(transport.calls(), 1);
}

#[test]
fn bare_number_uptime_is_wrapped() {
    let (client, transport) = client(vec![ok("98.5"), ok("98.5")]);

    let data = client.endpoint_uptime_data(&ctx(), "core_blog-home", "7d").unwrap();
    assert_eq!(data.uptime, 98.5);
    assert_eq!(data.duration, "7d");
    assert!(data.timestamp.is_none());

    assert_eq!(transport.calls(), 2);
    assert_eq!(transport.request(0), transport.request(1));
}

#[test]
fn bare_number_uptime_value() {
    let (client, _) = client(vec![ok("0.5"), ok("0.5")]);
    assert_eq!(client.endpoint_uptime(&ctx(), "core_blog-home", "1h").unwrap(), 0.5);
}

#[test]
fn first_not_found_wins_over_second_decode_error() {
    let (client, transport) = client(vec![
        Ok(HttpResponse::new(404, r#"{"error":"not found"}"#)),
        ok("{\"unexpected\":true}"),
    ]);

    let err = client.endpoint_uptime_data(&ctx(), "core_missing", "30d").unwrap_err();
    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 404);
            assert_eq!(api.body, r#"{"error":"not found"}"#);
        }
        other => panic!("expected the first API error, got {other:?}"),
    }
    assert_eq!(transport.calls(), 2);
}

#[test]
fn truncated_gzip_not_found_wins_over_second_decode_error() {
    let mut body = gzip(br#"{"error":"not found"}"#);
    body.truncate(body.len() - 6);
    let (client, transport) = client(vec![
        Ok(HttpResponse::new(404, body).with_header("Content-Encoding", "gzip")),
        ok("{\"unexpected\":true}"),
    ]);

    let err = client.endpoint_uptime_data(&ctx(), "core_missing", "30d").unwrap_err();
    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 404);
            assert!(r#"{"error":"not found"}"#.starts_with(&api.body), "{}", api.body);
        }
        other => panic!("expected the first API error, got {other:?}"),
    }
    assert_eq!(transport.calls(), 2);
}

#[test]
fn second_error_reported_after_first_decode_error() {
    let (client, _) = client(vec![ok("\"garbage\""), ok("\"garbage\"")]);

    let err = client.endpoint_uptime_data(&ctx(), "core_blog-home", "1h").unwrap_err();
    assert!(matches!(err, Error::Decode(DecodeError::Json(_))));
}

#[test]
fn uptime_transport_failure_is_not_retried() {
    let (client, transport) = client(vec![Err(TransportError::DeadlineExceeded), ok("98.5")]);

    let err = client.endpoint_uptime_data(&ctx(), "core_blog-home", "1h").unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::DeadlineExceeded)));
    assert_eq!(transport.calls(), 1);
}
