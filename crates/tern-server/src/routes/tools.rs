use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use tern::models::tool::ToolCall;
use tern::models::web::ToolCallResult;

use crate::state::AppState;

/// Execute a tool call. The path segment names the tool; the body carries
/// the parameters. Every handled call answers 200 with a result envelope;
/// tool failures ride the envelope, not the status code, so clients never
/// retry deterministic errors.
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<ToolCall>,
) -> Json<ToolCallResult> {
    tracing::info!(tool = %name, "tool call received");
    Json(state.dispatcher.handle(&name, &request.parameters).await)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/tools/:name", post(call_tool))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tern::dispatch::ToolDispatcher;
    use tern::search::SearchClient;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(search_endpoint: String) -> Router {
        let dispatcher = ToolDispatcher::new(SearchClient::new(search_endpoint).unwrap());
        routes(AppState::new(dispatcher))
    }

    async fn post_tool(app: Router, name: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post(format!("/tools/{}", name))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_tool_answers_200_with_error_envelope() {
        let app = app("http://127.0.0.1:1".to_string());
        let body = json!({"name": "fetch_web_content", "parameters": {"query": "rust"}});

        let (status, envelope) = post_tool(app, "fetch_web_content", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(envelope["error"]["code"], "unknown_tool");
    }

    #[tokio::test]
    async fn test_missing_query_answers_error_envelope() {
        let app = app("http://127.0.0.1:1".to_string());
        let body = json!({"name": "web_content", "parameters": {}});

        let (status, envelope) = post_tool(app, "web_content", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(envelope["error"]["code"], "missing_parameter");
    }

    #[tokio::test]
    async fn test_successful_call_wraps_backend_results() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Heading": "Tern",
                "AbstractURL": "https://en.wikipedia.org/wiki/Tern",
                "Abstract": "Terns are seabirds in the family Laridae."
            })))
            .mount(&mock_server)
            .await;

        let app = app(mock_server.uri());
        let body = json!({"name": "web_content", "parameters": {"query": "tern"}});

        let (status, envelope) = post_tool(app, "web_content", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            envelope["results"][0]["description"],
            "Terns are seabirds in the family Laridae."
        );
    }
}
