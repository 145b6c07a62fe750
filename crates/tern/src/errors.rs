use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable category attached to every failure that crosses a service
/// boundary. Classified once where the failure originates; downstream code
/// matches on the code, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownTool,
    MissingParameter,
    ToolExecution,
    BackendUnreachable,
    CreditsExhausted,
    Network,
    Internal,
}

/// Failures reported across the tool dispatch boundary. These travel inside
/// the result envelope, never as a raised error.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Tool execution failed: {0}")]
    ExecutionError(String),

    #[error("Dispatcher unreachable at {0}")]
    BackendUnreachable(String),
}

impl ToolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ToolError::UnknownTool(_) => ErrorCode::UnknownTool,
            ToolError::MissingParameter(_) => ErrorCode::MissingParameter,
            ToolError::ExecutionError(_) => ErrorCode::ToolExecution,
            ToolError::BackendUnreachable(_) => ErrorCode::BackendUnreachable,
        }
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Failures from the LLM provider. Credit exhaustion is detected here, at
/// the source, so callers can branch on the variant.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API credits or quota exhausted: {0}")]
    CreditsExhausted(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected response: {0}")]
    Response(String),
}

impl ProviderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ProviderError::CreditsExhausted(_) => ErrorCode::CreditsExhausted,
            ProviderError::Request(_) => ErrorCode::Network,
            ProviderError::Response(_) => ErrorCode::Internal,
        }
    }
}

/// Errors surfaced from a full orchestration run.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("The model requested tools for {0} rounds without answering")]
    ToolLoopExceeded(usize),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
