use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::models::web::WebResult;

pub const DUCKDUCKGO_ENDPOINT: &str = "https://api.duckduckgo.com/";
pub const DEFAULT_RESULT_COUNT: usize = 10;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed query parameters for the Instant Answer API: JSON output, no HTML
/// in fields, disambiguation pages suppressed.
#[derive(Debug, Serialize)]
struct InstantAnswerRequest<'a> {
    q: &'a str,
    format: &'static str,
    no_html: u8,
    skip_disambig: u8,
}

impl<'a> InstantAnswerRequest<'a> {
    fn new(query: &'a str) -> Self {
        Self {
            q: query,
            format: "json",
            no_html: 1,
            skip_disambig: 1,
        }
    }
}

/// Client for the DuckDuckGo Instant Answer API. A lookup yields at most
/// one result: the abstract for the topic, when the API has one. No
/// pagination and no retry; a failed or empty lookup is an empty list.
pub struct SearchClient {
    client: Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(SEARCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Look up a query. Never fails upward: network, parse, and remote
    /// errors are logged and produce an empty list, which callers must
    /// treat as a valid outcome.
    pub async fn search(&self, query: &str, count: usize) -> Vec<WebResult> {
        let query = query.trim();
        if query.is_empty() {
            tracing::warn!("rejecting empty search query");
            return Vec::new();
        }

        match self.fetch(query, count).await {
            Ok(results) => results,
            Err(error) => {
                tracing::warn!(%query, %error, "search request failed, returning no results");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, query: &str, count: usize) -> Result<Vec<WebResult>> {
        let request = InstantAnswerRequest::new(query);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&request)
            .send()
            .await?
            .error_for_status()?;

        let data: Value = response.json().await?;

        let mut results = Vec::new();
        if let Some(description) = data
            .get("Abstract")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
        {
            results.push(WebResult {
                title: field(&data, "Heading"),
                url: field(&data, "AbstractURL"),
                description: description.to_string(),
            });
        }

        results.truncate(count);
        Ok(results)
    }
}

fn field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
