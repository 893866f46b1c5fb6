//! Endpoint status, uptime, response-time and push operations, plus badge URLs.

use urlencoding::encode;

use crate::client::Client;
use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::http::HttpMethod;
use crate::key::normalize_key;
use crate::period::Period;
use crate::types::{EndpointStatus, ResponseTimeData, UptimeData};

pub(crate) fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(())
}

impl Client {
    /// Status of every configured endpoint.
    pub fn endpoint_statuses(&self, ctx: &CallContext) -> Result<Vec<EndpointStatus>> {
        self.request(ctx, HttpMethod::Get, "/api/v1/endpoints/statuses", None)
    }

    /// Status of one endpoint by its canonical key (see [`normalize_key`]).
    pub fn endpoint_status_by_key(&self, ctx: &CallContext, key: &str) -> Result<EndpointStatus> {
        require("key", key)?;
        let path = format!("/api/v1/endpoints/{}/statuses", encode(key));
        self.request(ctx, HttpMethod::Get, &path, None)
    }

    /// Status of one endpoint by group and name.
    pub fn endpoint_status(&self, ctx: &CallContext, group: &str, name: &str) -> Result<EndpointStatus> {
        require("name", name)?;
        self.endpoint_status_by_key(ctx, &normalize_key(group, name))
    }

    /// Uptime data for `duration` (`1h`, `24h`, `7d` or `30d`).
    ///
    /// Works against service versions that answer with a bare number; see
    /// [`Client::request_uptime`].
    pub fn endpoint_uptime_data(&self, ctx: &CallContext, key: &str, duration: &str) -> Result<UptimeData> {
        require("key", key)?;
        let period: Period = duration.parse()?;
        let path = format!("/api/v1/endpoints/{}/uptimes/{period}", encode(key));
        self.request_uptime(ctx, &path, period.as_str())
    }

    /// Uptime ratio for `duration`.
    pub fn endpoint_uptime(&self, ctx: &CallContext, key: &str, duration: &str) -> Result<f64> {
        self.endpoint_uptime_data(ctx, key, duration).map(|data| data.uptime)
    }

    /// Average, minimum and maximum response times for `duration`.
    pub fn endpoint_response_times(&self, ctx: &CallContext, key: &str, duration: &str) -> Result<ResponseTimeData> {
        require("key", key)?;
        let period: Period = duration.parse()?;
        let path = format!("/api/v1/endpoints/{}/response-times/{period}", encode(key));
        self.request(ctx, HttpMethod::Get, &path, None)
    }

    /// Report the result of an externally executed check.
    ///
    /// The endpoint must be configured as external on the service with
    /// `token` as its bearer token. `error` and `duration` (e.g. `10s`) are
    /// sent only when non-empty.
    pub fn push_external_result(
        &self,
        ctx: &CallContext,
        key: &str,
        token: &str,
        success: bool,
        error: &str,
        duration: &str,
    ) -> Result<()> {
        require("key", key)?;
        require("token", token)?;

        let mut query = Vec::with_capacity(3);
        if !duration.is_empty() {
            query.push(format!("duration={}", encode(duration)));
        }
        if !error.is_empty() {
            query.push(format!("error={}", encode(error)));
        }
        query.push(format!("success={success}"));

        let path = format!("/api/v1/endpoints/{}/external?{}", encode(key), query.join("&"));
        self.send(ctx, HttpMethod::Post, &path, Some(token))
    }

    // Badge URLs are only formatted, never fetched.

    pub fn uptime_badge_url(&self, key: &str, duration: &str) -> String {
        format!(
            "{}/api/v1/endpoints/{}/uptimes/{}/badge.svg",
            self.base_url(),
            encode(key),
            encode(duration)
        )
    }

    pub fn health_badge_url(&self, key: &str) -> String {
        format!("{}/api/v1/endpoints/{}/health/badge.svg", self.base_url(), encode(key))
    }

    pub fn response_time_badge_url(&self, key: &str, duration: &str) -> String {
        format!(
            "{}/api/v1/endpoints/{}/response-times/{}/badge.svg",
            self.base_url(),
            encode(key),
            encode(duration)
        )
    }
}
