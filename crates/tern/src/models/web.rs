use serde::{Deserialize, Serialize};

use crate::errors::{ErrorCode, ToolError};

/// A single web search hit. The description is the payload the bridge folds
/// back into the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// The error half of the dispatcher envelope: a stable code plus a
/// human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub code: ErrorCode,
    pub message: String,
}

impl From<ToolError> for ToolFailure {
    fn from(error: ToolError) -> Self {
        ToolFailure {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// The normalized envelope returned across the dispatcher boundary: either
/// `{"results": [...]}` or `{"error": {...}}`, never a raised error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolCallResult {
    Success { results: Vec<WebResult> },
    Error { error: ToolFailure },
}

impl ToolCallResult {
    pub fn success(results: Vec<WebResult>) -> Self {
        ToolCallResult::Success { results }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolCallResult::Error { .. })
    }

    /// The description of the first result, when there is one
    pub fn first_description(&self) -> Option<&str> {
        match self {
            ToolCallResult::Success { results } => {
                results.first().map(|result| result.description.as_str())
            }
            ToolCallResult::Error { .. } => None,
        }
    }
}

impl From<ToolError> for ToolCallResult {
    fn from(error: ToolError) -> Self {
        ToolCallResult::Error {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_web_result_round_trips_through_envelope() {
        let result = WebResult {
            title: "Rust (programming language)".to_string(),
            url: "https://en.wikipedia.org/wiki/Rust_(programming_language)".to_string(),
            description: "Rust is a general-purpose programming language.".to_string(),
        };

        let envelope = ToolCallResult::success(vec![result.clone()]);
        let wire = serde_json::to_string(&envelope).unwrap();
        let parsed: ToolCallResult = serde_json::from_str(&wire).unwrap();

        match parsed {
            ToolCallResult::Success { results } => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0], result);
            }
            ToolCallResult::Error { .. } => panic!("expected success envelope"),
        }
    }

    #[test]
    fn test_error_envelope_carries_code() {
        let envelope = ToolCallResult::from(ToolError::UnknownTool("fetch_web_content".into()));
        let wire = serde_json::to_value(&envelope).unwrap();

        assert_eq!(wire["error"]["code"], json!("unknown_tool"));
        assert!(wire["error"]["message"]
            .as_str()
            .unwrap()
            .contains("fetch_web_content"));

        let parsed: ToolCallResult = serde_json::from_value(wire).unwrap();
        assert!(parsed.is_error());
        assert_eq!(parsed.first_description(), None);
    }

    #[test]
    fn test_wire_shape_matches_dispatcher_contract() {
        let wire: ToolCallResult = serde_json::from_value(json!({
            "results": [
                {"title": "t", "url": "u", "description": "d"}
            ]
        }))
        .unwrap();

        assert_eq!(wire.first_description(), Some("d"));
    }
}
