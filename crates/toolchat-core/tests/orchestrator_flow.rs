//! End-to-end orchestration against a mock tool server

use std::sync::Arc;

use toolchat_core::providers::MockProvider;
use toolchat_core::registry::builtin_servers;
use toolchat_core::{
    ClientSettings, FallbackReason, HttpToolClient, NoOpLogger, ServerDescriptor, ServerRegistry,
    ToolOrchestrator,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUESTION: &str = "今日の千葉の天気を教えて";

fn weather_at(base_url: &str) -> ServerDescriptor {
    let mut weather = builtin_servers().remove(0);
    weather.base_url = base_url.to_string();
    weather
}

fn orchestrator(servers: Vec<ServerDescriptor>) -> ToolOrchestrator {
    let logger = Arc::new(NoOpLogger);
    let registry = Arc::new(ServerRegistry::with_builtins(servers, logger.clone()));
    let settings = ClientSettings::default().with_timeout_secs(5);
    let client = Arc::new(HttpToolClient::new(&settings, logger.clone()).unwrap());
    ToolOrchestrator::new(registry, client, logger)
}

async fn weather_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather_service/tools"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!(["get_forecast", "get_alerts"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather_service/call/get_forecast"))
        .and(query_param("city", "Chiba"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"forecast\":\"晴れ、最高気温22度\"}"))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_weather_question_with_server_online() {
    let server = weather_server().await;
    let orchestrator = orchestrator(vec![weather_at(&server.uri())]);
    let provider = MockProvider::scripted(
        [
            "USE_TOOLS: YES\nTOOL_NAME: get_forecast\nARGUMENTS: {\"city\":\"Chiba\"}\nREASON: 天気の質問",
            "今日の千葉は晴れで、最高気温は22度です。",
        ],
        Arc::new(NoOpLogger),
    );

    let reply = orchestrator.respond_detailed(QUESTION, &provider).await;

    assert_eq!(reply.text, "今日の千葉は晴れで、最高気温は22度です。");
    assert!(reply.is_tool_assisted());
    assert_eq!(
        reply.tool_results()[0].content,
        "{\"forecast\":\"晴れ、最高気温22度\"}"
    );

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].prompt.contains("• get_forecast"));
    assert!(prompts[0].prompt.contains("• get_alerts"));
    assert!(prompts[1].prompt.contains("晴れ、最高気温22度"));
}

#[tokio::test]
async fn test_weather_question_with_server_offline() {
    let orchestrator = orchestrator(vec![weather_at("http://127.0.0.1:1")]);
    let provider = MockProvider::fixed("一般的な天気の話です。", Arc::new(NoOpLogger));

    let reply = orchestrator.respond_detailed(QUESTION, &provider).await;

    assert!(reply.text.starts_with("❌ Weather Serviceへの接続に失敗しました。"));
    assert!(reply.text.ends_with("一般的な天気の話です。"));
    assert_eq!(
        reply.fallback_reason(),
        Some(&FallbackReason::ServerUnreachable {
            server: "weather_service".to_string()
        })
    );
    // Only the plain fallback reached the provider
    assert_eq!(provider.prompts().len(), 1);
    assert_eq!(provider.prompts()[0].prompt, QUESTION);
}

#[tokio::test]
async fn test_llm_declines_tool() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather_service/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["get_forecast"])))
        .mount(&server)
        .await;

    let orchestrator = orchestrator(vec![weather_at(&server.uri())]);
    let provider = MockProvider::scripted(
        ["USE_TOOLS: NO\nREASON: general", "Weather is the state of the atmosphere."],
        Arc::new(NoOpLogger),
    );

    let reply = orchestrator
        .respond_detailed("what does weather mean?", &provider)
        .await;

    assert_eq!(reply.text, "Weather is the state of the atmosphere.");
    assert_eq!(reply.fallback_reason(), Some(&FallbackReason::NoToolNeeded));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().contains("/call/")));
}

#[tokio::test]
async fn test_imported_custom_server_is_routed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kb/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["search"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kb/call/search"))
        .and(query_param("q", "vacation"))
        .respond_with(ResponseTemplate::new(200).set_body_string("20 days"))
        .mount(&server)
        .await;

    let logger = Arc::new(NoOpLogger);
    let registry = Arc::new(ServerRegistry::new(logger.clone()));
    let custom = serde_json::json!([{
        "id": "kb",
        "name": "Handbook",
        "description": "Company handbook search",
        "baseUrl": server.uri(),
        "capabilities": ["search"],
        "toolKeywords": ["handbook"]
    }]);
    registry.import_all(&custom.to_string()).unwrap();

    let client = Arc::new(HttpToolClient::new(&ClientSettings::default(), logger.clone()).unwrap());
    let orchestrator = ToolOrchestrator::new(registry, client, logger);
    let provider = MockProvider::scripted(
        [
            "USE_TOOLS: YES\nTOOL_NAME: search\nARGUMENTS: {\"q\": \"vacation\"}\nREASON: lookup",
            "You get 20 vacation days.",
        ],
        Arc::new(NoOpLogger),
    );

    let reply = orchestrator
        .respond_detailed("How many vacation days does the Handbook allow?", &provider)
        .await;

    assert_eq!(reply.text, "You get 20 vacation days.");
    assert_eq!(reply.tool_results()[0].content, "20 days");
}
