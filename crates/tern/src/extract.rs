use regex::Regex;
use serde::Deserialize;

use crate::models::message::Message;
use crate::providers::base::Provider;

const EXTRACT_SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts website queries \
from user messages. Extract the website queries from the user message and return them in a JSON \
format with a 'queries' field containing an array of strings. If no queries are found return an \
empty array.";

#[derive(Debug, Default, Deserialize)]
struct ExtractedQueries {
    #[serde(default)]
    queries: Vec<String>,
}

/// Asks the model to pull candidate search queries out of free text.
/// Independent of the conversation bridge; usable standalone.
pub struct QueryExtractor {
    provider: Box<dyn Provider>,
}

impl QueryExtractor {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Extract candidate queries. Provider failures and unparsable
    /// responses degrade to an empty list with a log line, never an error.
    pub async fn extract(&self, user_message: &str) -> Vec<String> {
        let messages = [Message::user().with_text(user_message)];

        match self
            .provider
            .complete(EXTRACT_SYSTEM_PROMPT, &messages, &[])
            .await
        {
            Ok((response, _usage)) => parse_queries(response.first_text().unwrap_or_default()),
            Err(error) => {
                tracing::warn!(%error, "query extraction request failed");
                Vec::new()
            }
        }
    }
}

/// Parse a `{"queries": [...]}` payload out of response text. The model
/// usually wraps it in a fenced code block; fall back to parsing the raw
/// text when it does not.
fn parse_queries(content: &str) -> Vec<String> {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap();
    let fragment = fence
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or(content);

    match serde_json::from_str::<ExtractedQueries>(fragment) {
        Ok(extracted) => extracted.queries,
        Err(error) => {
            tracing::warn!(%error, "could not parse extracted queries");
            Vec::new()
        }
    }
}
