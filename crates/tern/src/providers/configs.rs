use std::env;

use crate::errors::BridgeError;

pub const DEFAULT_ANTHROPIC_HOST: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Unified enum to wrap provider configurations. One concrete provider
/// today; the enum is the place a second one would plug in.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Anthropic(AnthropicProviderConfig),
}

#[derive(Debug, Clone)]
pub struct AnthropicProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: i32,
}

impl AnthropicProviderConfig {
    /// Resolve the configuration from the process environment. Called once
    /// at startup; the resulting struct is passed to constructors and never
    /// re-read.
    pub fn from_env() -> Result<Self, BridgeError> {
        let api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                BridgeError::Configuration(
                    "ANTHROPIC_API_KEY environment variable is not set".to_string(),
                )
            })?;

        Ok(Self {
            host: env::var("ANTHROPIC_HOST").unwrap_or_else(|_| DEFAULT_ANTHROPIC_HOST.to_string()),
            api_key,
            model: env::var("TERN_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: None,
            max_tokens: 4096,
        })
    }
}
