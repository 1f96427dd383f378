use std::fmt;
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP methods a step is allowed to declare.
///
/// Only GET is wired to the transport today; the remaining members keep plan
/// files parseable once more verbs land. Dispatch is an explicit match on
/// this enum, so an unsupported member surfaces as a configuration error
/// instead of an undefined method call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Head => "head",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors contained at the step boundary.
///
/// None of these propagate above the plan: every variant is logged and
/// collapsed to a failed step by the caller.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Decoded result of one HTTP call: status code plus parsed JSON body.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Thin wrapper around [`reqwest::Client`] with query-parameter encoding and
/// a per-request timeout. Steps and the connectivity probe share one client
/// so connection pooling applies across the plan.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Dispatch a request according to the declared verb.
    pub async fn request(
        &self,
        verb: HttpVerb,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> Result<JsonResponse, StepError> {
        match verb {
            HttpVerb::Get => self.get(url, params, timeout).await,
            other => Err(StepError::Config(format!(
                "unsupported HTTP verb '{}' for this runner",
                other
            ))),
        }
    }

    /// Issue a single GET request and decode the JSON body.
    pub async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
        timeout: Duration,
    ) -> Result<JsonResponse, StepError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| StepError::Config(format!("malformed URL '{}': {}", url, e)))?;

        let response = self
            .inner
            .get(url)
            .query(params)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;

        Ok(JsonResponse { status, body })
    }

    /// Connectivity probe: any response within the timeout counts as
    /// reachable, regardless of status or body.
    pub async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match self.inner.get(url).timeout(timeout).send().await {
            Ok(_) => true,
            Err(e) => {
                warn!("connectivity probe against {} failed: {}", url, e);
                false
            }
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
