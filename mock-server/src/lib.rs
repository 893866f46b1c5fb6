use std::io::Write;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use flate2::{write::GzEncoder, Compression};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub name: String,
    pub group: String,
    pub key: String,
    pub results: Vec<EndpointResult>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointResult {
    pub status: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    pub duration: i64,
    pub condition_results: Vec<ConditionResult>,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConditionResult {
    pub condition: String,
    pub success: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteStatus {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    pub key: String,
    pub results: Vec<SuiteResult>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    pub name: String,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    pub duration: i64,
    pub endpoint_results: Vec<EndpointResult>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UptimeData {
    pub uptime: f64,
    pub duration: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseTimeData {
    pub average: i64,
    pub min: i64,
    pub max: i64,
    pub timestamp: DateTime<Utc>,
}

/// How the uptime route answers: newer services send an object, older ones a bare number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UptimeShape {
    #[default]
    Structured,
    Bare,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub uptime_shape: UptimeShape,
    /// Bearer token accepted by the external push route.
    pub external_token: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            uptime_shape: UptimeShape::Structured,
            external_token: "potato".to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct PushParams {
    pub success: bool,
    pub error: Option<String>,
    pub duration: Option<String>,
}

pub struct AppState {
    config: MockConfig,
    endpoints: RwLock<Vec<EndpointStatus>>,
    suites: Vec<SuiteStatus>,
}

pub type Db = Arc<AppState>;

const DURATIONS: [&str; 4] = ["1h", "24h", "7d", "30d"];

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let db: Db = Arc::new(AppState {
        config,
        endpoints: RwLock::new(seed_endpoints()),
        suites: seed_suites(),
    });
    Router::new()
        .route("/api/v1/endpoints/statuses", get(endpoint_statuses))
        .route("/api/v1/endpoints/{key}/statuses", get(endpoint_status))
        .route("/api/v1/endpoints/{key}/uptimes/{duration}", get(uptime))
        .route("/api/v1/endpoints/{key}/response-times/{duration}", get(response_times))
        .route("/api/v1/endpoints/{key}/external", post(push_external))
        .route("/api/v1/suites/statuses", get(suite_statuses))
        .route("/api/v1/suites/{key}/statuses", get(suite_status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn seed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_760_875_200, 0).unwrap_or_default()
}

fn check(status: u16, success: bool, duration: i64) -> EndpointResult {
    EndpointResult {
        status,
        hostname: "example.org".to_string(),
        duration,
        condition_results: vec![ConditionResult {
            condition: "[STATUS] == 200".to_string(),
            success,
        }],
        success,
        timestamp: seed_time(),
        ..EndpointResult::default()
    }
}

fn seed_endpoints() -> Vec<EndpointStatus> {
    vec![
        EndpointStatus {
            name: "blog-home".to_string(),
            group: "core".to_string(),
            key: "core_blog-home".to_string(),
            results: vec![
                check(200, true, 100_000_000),
                check(200, true, 200_000_000),
                check(200, true, 150_000_000),
                check(500, false, 350_000_000),
            ],
        },
        EndpointStatus {
            name: "ext-ep-test".to_string(),
            group: "core".to_string(),
            key: "core_ext-ep-test".to_string(),
            results: Vec::new(),
        },
    ]
}

fn seed_suites() -> Vec<SuiteStatus> {
    let login = EndpointResult {
        name: "login".to_string(),
        ..check(200, true, 1_000_000_000)
    };
    vec![SuiteStatus {
        name: "check-authentication".to_string(),
        group: String::new(),
        key: "_check-authentication".to_string(),
        results: vec![SuiteResult {
            name: "check-authentication".to_string(),
            success: true,
            timestamp: seed_time(),
            duration: 1_000_000_000,
            endpoint_results: vec![login],
        }],
    }]
}

/// Serialize `value` as JSON, gzip-compressed when the client accepts it.
fn json<T: Serialize>(headers: &HeaderMap, status: StatusCode, value: &T) -> Response {
    let body = match serde_json::to_vec(value) {
        Ok(body) => body,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };
    let accepts_gzip = headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("gzip"));
    if !accepts_gzip {
        return (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    match encoder.write_all(&body).and_then(|_| encoder.finish()) {
        Ok(compressed) => (
            status,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
                (header::CONTENT_ENCODING, HeaderValue::from_static("gzip")),
            ],
            compressed,
        )
            .into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

fn error(headers: &HeaderMap, status: StatusCode, message: &str) -> Response {
    json(headers, status, &serde_json::json!({ "error": message }))
}

fn not_found(headers: &HeaderMap) -> Response {
    error(headers, StatusCode::NOT_FOUND, "not found")
}

async fn endpoint_statuses(State(db): State<Db>, headers: HeaderMap) -> Response {
    let endpoints = db.endpoints.read().await;
    json(&headers, StatusCode::OK, &*endpoints)
}

async fn endpoint_status(State(db): State<Db>, Path(key): Path<String>, headers: HeaderMap) -> Response {
    let endpoints = db.endpoints.read().await;
    match endpoints.iter().find(|endpoint| endpoint.key == key) {
        Some(endpoint) => json(&headers, StatusCode::OK, endpoint),
        None => not_found(&headers),
    }
}

async fn uptime(
    State(db): State<Db>,
    Path((key, duration)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !DURATIONS.contains(&duration.as_str()) {
        return error(&headers, StatusCode::BAD_REQUEST, "durations supported: 30d, 7d, 24h, 1h");
    }
    let endpoints = db.endpoints.read().await;
    let Some(endpoint) = endpoints.iter().find(|endpoint| endpoint.key == key) else {
        return not_found(&headers);
    };
    let total = endpoint.results.len();
    let successes = endpoint.results.iter().filter(|result| result.success).count();
    let ratio = if total == 0 { 0.0 } else { successes as f64 / total as f64 };

    match db.config.uptime_shape {
        UptimeShape::Structured => {
            let data = UptimeData {
                uptime: ratio,
                duration,
                timestamp: seed_time(),
            };
            json(&headers, StatusCode::OK, &data)
        }
        UptimeShape::Bare => json(&headers, StatusCode::OK, &ratio),
    }
}

async fn response_times(
    State(db): State<Db>,
    Path((key, duration)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if !DURATIONS.contains(&duration.as_str()) {
        return error(&headers, StatusCode::BAD_REQUEST, "durations supported: 30d, 7d, 24h, 1h");
    }
    let endpoints = db.endpoints.read().await;
    let Some(endpoint) = endpoints.iter().find(|endpoint| endpoint.key == key) else {
        return not_found(&headers);
    };
    let durations: Vec<i64> = endpoint.results.iter().map(|result| result.duration).collect();
    let average = if durations.is_empty() {
        0
    } else {
        durations.iter().sum::<i64>() / durations.len() as i64
    };
    let data = ResponseTimeData {
        average,
        min: durations.iter().copied().min().unwrap_or_default(),
        max: durations.iter().copied().max().unwrap_or_default(),
        timestamp: seed_time(),
    };
    json(&headers, StatusCode::OK, &data)
}

async fn push_external(
    State(db): State<Db>,
    Path(key): Path<String>,
    Query(params): Query<PushParams>,
    headers: HeaderMap,
) -> Response {
    let expected = format!("Bearer {}", db.config.external_token);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return error(&headers, StatusCode::UNAUTHORIZED, "invalid token");
    }

    let mut endpoints = db.endpoints.write().await;
    let Some(endpoint) = endpoints.iter_mut().find(|endpoint| endpoint.key == key) else {
        return not_found(&headers);
    };
    let mut result = EndpointResult {
        success: params.success,
        timestamp: Utc::now(),
        ..EndpointResult::default()
    };
    if let Some(message) = params.error.filter(|message| !message.is_empty()) {
        result.errors.push(message);
    }
    if let Some(duration) = params.duration {
        result.duration = parse_duration_nanos(&duration).unwrap_or_default();
    }
    endpoint.results.push(result);
    StatusCode::OK.into_response()
}

/// Parse `500ms`, `10s` or `2m` into nanoseconds.
fn parse_duration_nanos(value: &str) -> Option<i64> {
    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1_000_000)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1_000_000_000)
    } else if let Some(m) = value.strip_suffix('m') {
        (m, 60_000_000_000)
    } else {
        return None;
    };
    number.parse::<i64>().ok().map(|n| n * scale)
}

async fn suite_statuses(State(db): State<Db>, headers: HeaderMap) -> Response {
    json(&headers, StatusCode::OK, &db.suites)
}

async fn suite_status(State(db): State<Db>, Path(key): Path<String>, headers: HeaderMap) -> Response {
    match db.suites.iter().find(|suite| suite.key == key) {
        Some(suite) => json(&headers, StatusCode::OK, suite),
        None => not_found(&headers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_result_serializes_camel_case() {
        let json = serde_json::to_value(check(200, true, 5)).unwrap();
        assert_eq!(json["conditionResults"][0]["success"], true);
        assert_eq!(json["duration"], 5);
        assert!(json.get("errors").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn seeded_keys() {
        let keys: Vec<String> = seed_endpoints().into_iter().map(|e| e.key).collect();
        assert_eq!(keys, ["core_blog-home", "core_ext-ep-test"]);
        assert_eq!(seed_suites()[0].key, "_check-authentication");
    }

    #[test]
    fn push_params_parse_from_query() {
        let params: PushParams = serde_json::from_str(r#"{"success":false,"error":"timeout"}"#).unwrap();
        assert!(!params.success);
        assert_eq!(params.error.as_deref(), Some("timeout"));
        assert!(params.duration.is_none());
    }

    #[test]
    fn duration_parsing() {
        assert_eq!(parse_duration_nanos("500ms"), Some(500_000_000));
        assert_eq!(parse_duration_nanos("10s"), Some(10_000_000_000));
        assert_eq!(parse_duration_nanos("2m"), Some(120_000_000_000));
        assert_eq!(parse_duration_nanos("soon"), None);
    }
}
