use serde_json::{json, Value};

use crate::errors::ToolError;
use crate::models::tool::Tool;
use crate::models::web::ToolCallResult;
use crate::search::{SearchClient, DEFAULT_RESULT_COUNT};

/// The single tool this bridge supports.
pub const WEB_CONTENT_TOOL: &str = "web_content";

/// The schema declared to the model for the web content tool
pub fn web_content_tool() -> Tool {
    Tool::new(
        WEB_CONTENT_TOOL,
        "Retrieves information from the web, based on the user's query.",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The query to search or website to look up for information."
                }
            },
            "required": ["query"]
        }),
    )
}

/// Executes tool calls on behalf of a remote orchestrator. Every failure is
/// reported inside the result envelope; nothing escapes this boundary as a
/// raised error, since the caller is usually in another process.
pub struct ToolDispatcher {
    search: SearchClient,
}

impl ToolDispatcher {
    pub fn new(search: SearchClient) -> Self {
        Self { search }
    }

    pub async fn handle(&self, name: &str, parameters: &Value) -> ToolCallResult {
        if name != WEB_CONTENT_TOOL {
            return ToolError::UnknownTool(name.to_string()).into();
        }

        let query = parameters
            .get("query")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or_default();
        if query.is_empty() {
            return ToolError::MissingParameter("query".to_string()).into();
        }

        let results = self.search.search(query, DEFAULT_RESULT_COUNT).await;
        ToolCallResult::success(results)
    }
}
