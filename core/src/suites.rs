//! Suite status operations.

use urlencoding::encode;

use crate::client::Client;
use crate::context::CallContext;
use crate::endpoints::require;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::key::normalize_key;
use crate::types::SuiteStatus;

impl Client {
    /// Status of every configured suite.
    pub fn suite_statuses(&self, ctx: &CallContext) -> Result<Vec<SuiteStatus>> {
        self.request(ctx, HttpMethod::Get, "/api/v1/suites/statuses", None)
    }

    pub fn suite_status_by_key(&self, ctx: &CallContext, key: &str) -> Result<SuiteStatus> {
        require("key", key)?;
        let path = format!("/api/v1/suites/{}/statuses", encode(key));
        self.request(ctx, HttpMethod::Get, &path, None)
    }

    /// Status of one suite by group and name; suites without a group use `""`.
    pub fn suite_status(&self, ctx: &CallContext, group: &str, name: &str) -> Result<SuiteStatus> {
        require("name", name)?;
        self.suite_status_by_key(ctx, &normalize_key(group, name))
    }
}
