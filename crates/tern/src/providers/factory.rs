use super::{anthropic::AnthropicProvider, base::Provider, configs::ProviderConfig};
use crate::errors::BridgeError;

pub fn get_provider(config: ProviderConfig) -> Result<Box<dyn Provider>, BridgeError> {
    match config {
        ProviderConfig::Anthropic(anthropic_config) => {
            Ok(Box::new(AnthropicProvider::new(anthropic_config)?))
        }
    }
}
