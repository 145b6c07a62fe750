use crate::client::DispatcherClient;
use crate::dispatch::web_content_tool;
use crate::errors::BridgeError;
use crate::models::message::Message;
use crate::models::web::ToolCallResult;
use crate::providers::base::Provider;

/// Hard ceiling on orchestration rounds. A model that keeps requesting
/// tools fails closed instead of looping forever.
const MAX_TOOL_ROUNDS: usize = 5;

const SUMMARIZE_PROMPT: &str =
    "Please summarize the information from the tool call and don't send any more tool calls.";
const TOOL_RESULT_CONNECTIVE: &str =
    "\n\nThe tool call was successful and here is the information from the tool call: ";
const TOOL_FAILURE_CONNECTIVE: &str = "\n\nThe tool call failed: ";
const NO_INFORMATION_FALLBACK: &str = "No information was found for this query.";
const NO_ANSWER: &str = "No answer found.";

/// Drives one LLM conversation to a final natural-language answer,
/// dispatching any tool calls the model requests along the way.
///
/// Each round sends the accumulated history plus the current outbound
/// message. A response with a tool_use block gets dispatched, folded into
/// history as a user/assistant text pair, and followed by a fixed
/// summarize-and-stop instruction; a text-only response ends the run.
pub struct Bridge {
    provider: Box<dyn Provider>,
    dispatcher: DispatcherClient,
}

impl Bridge {
    pub fn new(provider: Box<dyn Provider>, dispatcher: DispatcherClient) -> Self {
        Self {
            provider,
            dispatcher,
        }
    }

    pub async fn get_final_answer(&self, query: &str) -> Result<String, BridgeError> {
        let (answer, _history) = self.run(query).await?;
        Ok(answer)
    }

    async fn run(&self, query: &str) -> Result<(String, Vec<Message>), BridgeError> {
        let tools = [web_content_tool()];
        let mut history: Vec<Message> = Vec::new();
        let mut outbound = query.to_string();

        for _round in 0..MAX_TOOL_ROUNDS {
            let mut messages = history.clone();
            messages.push(Message::user().with_text(&outbound));

            let (response, _usage) = self.provider.complete("", &messages, &tools).await?;

            // Only the first tool_use block per response is acted on;
            // additional simultaneous requests are ignored
            let Some(request) = response.first_tool_request() else {
                let answer = response.first_text().unwrap_or(NO_ANSWER).to_string();
                return Ok((answer, history));
            };

            tracing::debug!(id = %request.id, "tool call detected");
            let result = match &request.tool_call {
                Ok(call) => {
                    self.dispatcher
                        .invoke(&call.name, call.parameters.clone())
                        .await
                }
                Err(error) => ToolCallResult::from(error.clone()),
            };

            let preamble = response.first_text().unwrap_or_default();
            history.push(Message::user().with_text(&outbound));
            history.push(
                Message::assistant()
                    .with_text(format!("{}{}", preamble, tool_outcome_text(&result))),
            );
            outbound = SUMMARIZE_PROMPT.to_string();
        }

        Err(BridgeError::ToolLoopExceeded(MAX_TOOL_ROUNDS))
    }
}

/// The text folded into history after a dispatch. An empty result set gets
/// an explicit placeholder; an error envelope is surfaced so the model can
/// interpret it.
fn tool_outcome_text(result: &ToolCallResult) -> String {
    match result {
        ToolCallResult::Success { results } => {
            let information = results
                .first()
                .map(|r| r.description.as_str())
                .unwrap_or(NO_INFORMATION_FALLBACK);
            format!("{}{}", TOOL_RESULT_CONNECTIVE, information)
        }
        ToolCallResult::Error { error } => {
            format!("{}{}", TOOL_FAILURE_CONNECTIVE, error.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::WEB_CONTENT_TOOL;
    use crate::models::role::Role;
    use crate::models::tool::ToolCall;
    use crate::providers::mock::MockProvider;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ABSTRACT: &str = "Terns are seabirds in the family Laridae.";

    fn tool_use_response(query: &str) -> Message {
        Message::assistant()
            .with_text("Let me look that up.")
            .with_tool_request(
                "toolu_01",
                Ok(ToolCall::new(WEB_CONTENT_TOOL, json!({"query": query}))),
            )
    }

    /// A dispatcher that is alive and answers every tool call with one result
    async fn live_dispatcher() -> (MockServer, DispatcherClient) {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tools/web_content"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "title": "Tern",
                    "url": "https://en.wikipedia.org/wiki/Tern",
                    "description": ABSTRACT
                }]
            })))
            .mount(&mock_server)
            .await;

        let client = DispatcherClient::new(mock_server.uri()).unwrap();
        (mock_server, client)
    }

    fn unreachable_dispatcher() -> DispatcherClient {
        DispatcherClient::new("http://127.0.0.1:1").unwrap()
    }

    #[tokio::test]
    async fn test_text_only_response_answers_in_one_round() {
        let provider = MockProvider::new(vec![Message::assistant().with_text("Hello!")]);
        let bridge = Bridge::new(Box::new(provider), unreachable_dispatcher());

        let (answer, history) = bridge.run("Hi").await.unwrap();

        assert_eq!(answer, "Hello!");
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_tool_round_then_answer() {
        let (_server, dispatcher) = live_dispatcher().await;
        let provider = MockProvider::new(vec![
            tool_use_response("terns"),
            Message::assistant().with_text("Terns are seabirds."),
        ]);
        let bridge = Bridge::new(Box::new(provider), dispatcher);

        let (answer, history) = bridge.run("What are terns?").await.unwrap();

        assert_eq!(answer, "Terns are seabirds.");
        // Exactly one user and one assistant entry between the two LLM calls
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].first_text(), Some("What are terns?"));
        assert_eq!(history[1].role, Role::Assistant);
        let folded = history[1].first_text().unwrap();
        assert!(folded.starts_with("Let me look that up."));
        assert!(folded.contains(TOOL_RESULT_CONNECTIVE.trim_start()));
        assert!(folded.ends_with(ABSTRACT));
    }

    #[tokio::test]
    async fn test_empty_result_set_gets_placeholder_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/tools/web_content"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&mock_server)
            .await;
        let dispatcher = DispatcherClient::new(mock_server.uri()).unwrap();

        let provider = MockProvider::new(vec![
            tool_use_response("nothing"),
            Message::assistant().with_text("I could not find anything."),
        ]);
        let bridge = Bridge::new(Box::new(provider), dispatcher);

        let (answer, history) = bridge.run("Find nothing").await.unwrap();

        assert_eq!(answer, "I could not find anything.");
        assert!(history[1]
            .first_text()
            .unwrap()
            .contains(NO_INFORMATION_FALLBACK));
    }

    #[tokio::test]
    async fn test_unreachable_dispatcher_is_folded_not_fatal() {
        let provider = MockProvider::new(vec![
            tool_use_response("terns"),
            Message::assistant().with_text("Sorry, the tool is down."),
        ]);
        let bridge = Bridge::new(Box::new(provider), unreachable_dispatcher());

        let (answer, history) = bridge.run("What are terns?").await.unwrap();

        assert_eq!(answer, "Sorry, the tool is down.");
        assert!(history[1]
            .first_text()
            .unwrap()
            .contains("Dispatcher unreachable"));
    }

    #[tokio::test]
    async fn test_relentless_tool_requests_fail_closed() {
        let (_server, dispatcher) = live_dispatcher().await;
        let responses = (0..MAX_TOOL_ROUNDS).map(|_| tool_use_response("terns")).collect();
        let bridge = Bridge::new(Box::new(MockProvider::new(responses)), dispatcher);

        let error = bridge.run("What are terns?").await.unwrap_err();

        assert!(matches!(error, BridgeError::ToolLoopExceeded(MAX_TOOL_ROUNDS)));
    }

    #[tokio::test]
    async fn test_response_without_text_yields_sentinel() {
        let provider = MockProvider::new(vec![Message::assistant()]);
        let bridge = Bridge::new(Box::new(provider), unreachable_dispatcher());

        let (answer, _) = bridge.run("Hi").await.unwrap();
        assert_eq!(answer, NO_ANSWER);
    }
}
