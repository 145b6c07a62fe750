use anyhow::Result;
use bat::PrettyPrinter;
use clap::Parser;
use cliclack::{input, spinner};
use console::style;

use tern::bridge::Bridge;
use tern::client::DispatcherClient;
use tern::errors::{BridgeError, ProviderError};
use tern::providers::configs::{AnthropicProviderConfig, ProviderConfig};
use tern::providers::factory;

/// Ask a question answered with live web search results
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The question to ask. Prompts interactively when omitted.
    question: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let question: String = if cli.question.is_empty() {
        input("Ask a question:").interact()?
    } else {
        cli.question.join(" ")
    };

    let config = match AnthropicProviderConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", style(error).red());
            std::process::exit(1);
        }
    };

    let dispatcher = DispatcherClient::from_env()?;
    if !dispatcher.check_alive().await {
        eprintln!(
            "{}",
            style(format!(
                "Tool dispatcher is not running at {}",
                dispatcher.base_url()
            ))
            .red()
        );
        std::process::exit(1);
    }

    let provider = factory::get_provider(ProviderConfig::Anthropic(config))?;
    let bridge = Bridge::new(provider, dispatcher);

    let spin = spinner();
    spin.start(format!("Searching for '{}'", question));
    let outcome = bridge.get_final_answer(&question).await;
    spin.stop("");

    match outcome {
        Ok(answer) => render(&answer).await,
        Err(BridgeError::Provider(ProviderError::CreditsExhausted(_))) => {
            eprintln!(
                "{}",
                style("Your API quota or credits may be exhausted.").red()
            );
            std::process::exit(1);
        }
        Err(error) => return Err(error.into()),
    }

    Ok(())
}

async fn render(content: &str) {
    PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .unwrap();
}
