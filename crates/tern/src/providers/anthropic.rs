use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{Provider, Usage};
use super::configs::AnthropicProviderConfig;
use crate::errors::{ProviderError, ToolError};
use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const LLM_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AnthropicProvider {
    client: Client,
    config: AnthropicProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(LLM_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn get_usage(data: &Value) -> Usage {
        let usage = data.get("usage");

        let input_tokens = usage
            .and_then(|u| u.get("input_tokens"))
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let output_tokens = usage
            .and_then(|u| u.get("output_tokens"))
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let total_tokens = match (input_tokens, output_tokens) {
            (Some(input), Some(output)) => Some(input + output),
            _ => None,
        };

        Usage::new(input_tokens, output_tokens, total_tokens)
    }

    fn messages_to_anthropic_spec(messages: &[Message]) -> Vec<Value> {
        let mut anthropic_messages = Vec::new();

        for message in messages {
            let role = match message.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            };

            // History entries only ever carry text; tool exchanges are
            // folded into text by the bridge before the next call
            let mut content = String::new();
            for msg_content in &message.content {
                if let MessageContent::Text(text) = msg_content {
                    content.push_str(&text.text);
                }
            }

            anthropic_messages.push(json!({
                "role": role,
                "content": content
            }));
        }

        anthropic_messages
    }

    fn tools_to_anthropic_spec(tools: &[Tool]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "input_schema": tool.input_schema,
                })
            })
            .collect()
    }

    /// Turn an ordered sequence of `text` / `tool_use` blocks into a Message
    fn response_to_message(response: &Value) -> Result<Message, ProviderError> {
        let blocks = response
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                ProviderError::Response("missing content array in Anthropic response".to_string())
            })?;

        let mut message = Message::assistant();
        for block in blocks {
            match block.get("type").and_then(|t| t.as_str()) {
                Some("text") => {
                    if let Some(text) = block.get("text").and_then(|t| t.as_str()) {
                        message = message.with_text(text);
                    }
                }
                Some("tool_use") => {
                    let id = block
                        .get("id")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    let name = block
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default();
                    let input = block.get("input").cloned().unwrap_or_else(|| json!({}));

                    let tool_call = if name.is_empty() {
                        Err(ToolError::ExecutionError(format!(
                            "tool_use block {} carries no tool name",
                            id
                        )))
                    } else {
                        Ok(ToolCall::new(name, input))
                    };
                    message = message.with_tool_request(id, tool_call);
                }
                _ => {}
            }
        }

        Ok(message)
    }

    /// Classify an API failure once, here at the source. Downstream code
    /// branches on the resulting variant, not on message text.
    fn classify_api_error(status: StatusCode, body: &str) -> ProviderError {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| body.to_string());

        let exhausted = status == StatusCode::PAYMENT_REQUIRED
            || detail.contains("insufficient_quota")
            || detail.to_lowercase().contains("credit");

        if exhausted {
            ProviderError::CreditsExhausted(detail)
        } else {
            ProviderError::Request(format!("{} - {}", status, detail))
        }
    }

    async fn post(&self, payload: Value) -> Result<Value, ProviderError> {
        let url = format!("{}/v1/messages", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::OK {
            response
                .json()
                .await
                .map_err(|e| ProviderError::Response(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Self::classify_api_error(status, &body))
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<(Message, Usage), ProviderError> {
        let anthropic_messages = Self::messages_to_anthropic_spec(messages);

        let mut payload = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": anthropic_messages,
        });

        let body = payload.as_object_mut().expect("payload is an object");
        if !system.is_empty() {
            body.insert("system".to_string(), json!(system));
        }
        if let Some(temperature) = self.config.temperature {
            body.insert("temperature".to_string(), json!(temperature));
        }
        if !tools.is_empty() {
            body.insert(
                "tools".to_string(),
                json!(Self::tools_to_anthropic_spec(tools)),
            );
        }

        let response = self.post(payload).await?;

        let message = Self::response_to_message(&response)?;
        let usage = Self::get_usage(&response);

        Ok((message, usage))
    }
}
