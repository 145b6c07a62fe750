use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::env;
use std::time::Duration;

use crate::errors::ToolError;
use crate::models::tool::ToolCall;
use crate::models::web::ToolCallResult;

pub const DEFAULT_DISPATCHER_URL: &str = "http://localhost:5001";

const LIVENESS_TIMEOUT: Duration = Duration::from_secs(2);
const INVOKE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE: Duration = Duration::from_secs(1);

/// The orchestrator's view of the tool dispatcher service: a liveness probe
/// plus a bounded-retry invocation wrapper. Invocation never returns an
/// error; every failure mode is folded into the result envelope.
pub struct DispatcherClient {
    client: Client,
    base_url: String,
    backoff_base: Duration,
}

impl DispatcherClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            backoff_base: BACKOFF_BASE,
        })
    }

    /// Resolve the dispatcher address from `TERN_DISPATCHER_URL`, read once
    /// here and fixed for the life of the client.
    pub fn from_env() -> Result<Self> {
        let base_url =
            env::var("TERN_DISPATCHER_URL").unwrap_or_else(|_| DEFAULT_DISPATCHER_URL.to_string());
        Self::new(base_url)
    }

    /// Shrink the retry backoff, for tests that exercise the attempt loop
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the dispatcher's health endpoint. False on any connection
    /// failure or non-200 status, never an error.
    pub async fn check_alive(&self) -> bool {
        let url = format!("{}/health", self.base_url.trim_end_matches('/'));
        match self
            .client
            .get(&url)
            .timeout(LIVENESS_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(error) => {
                tracing::warn!(%error, "dispatcher liveness check failed");
                false
            }
        }
    }

    /// Invoke a tool on the dispatcher. Checks liveness first and
    /// short-circuits when the service is unreachable; otherwise retries
    /// transport failures up to the attempt budget with exponential backoff.
    pub async fn invoke(&self, name: &str, parameters: Value) -> ToolCallResult {
        if !self.check_alive().await {
            return ToolError::BackendUnreachable(self.base_url.clone()).into();
        }

        let mut last_error = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            match self.post_tool(name, &parameters).await {
                Ok(result) => return result,
                Err(error) => {
                    last_error = error.to_string();
                    tracing::warn!(tool = name, attempt, %last_error, "tool invocation failed");
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(self.backoff_delay(attempt)).await;
                    }
                }
            }
        }

        ToolError::ExecutionError(format!(
            "Failed to call tool {} after {} attempts: {}",
            name, MAX_ATTEMPTS, last_error
        ))
        .into()
    }

    /// Wait before retry `attempt + 1`: 2s after the first failure, 4s
    /// after the second (with the default 1s base)
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.pow(attempt)
    }

    async fn post_tool(&self, name: &str, parameters: &Value) -> Result<ToolCallResult> {
        let url = format!("{}/tools/{}", self.base_url.trim_end_matches('/'), name);
        let body = ToolCall::new(name, parameters.clone());

        let response = self
            .client
            .post(&url)
            .timeout(INVOKE_TIMEOUT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
