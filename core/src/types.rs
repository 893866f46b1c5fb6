//! Response models for the status service.
//!
//! # Design
//! Field names follow the service's camelCase JSON. Every model implements
//! `Default` because a `204 No Content` or an empty 2xx body decodes to the
//! zero value rather than an error. Durations reported by the service are
//! integer nanoseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current status and recent check results of one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub name: String,
    #[serde(default)]
    pub group: String,
    /// Canonical `group_name` key.
    pub key: String,
    #[serde(default)]
    pub results: Vec<EndpointResult>,
}

/// A single health check result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointResult {
    /// HTTP status returned by the monitored endpoint.
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    /// Check duration in nanoseconds.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub condition_results: Vec<ConditionResult>,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Endpoint name; only present on results nested inside a suite.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResult {
    pub condition: String,
    pub success: bool,
}

/// Uptime ratio over a reporting period.
///
/// Older service versions answer the uptime endpoint with a bare number; the
/// client then fills in `duration` from the request and leaves `timestamp`
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UptimeData {
    pub uptime: f64,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response time statistics in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTimeData {
    pub average: i64,
    pub min: i64,
    pub max: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Status of a suite: a named sequence of endpoint checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteStatus {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    pub key: String,
    #[serde(default)]
    pub results: Vec<SuiteResult>,
}

/// One execution of a suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    pub name: String,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    /// Total execution time in nanoseconds.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub endpoint_results: Vec<EndpointResult>,
}
