use std::sync::Arc;
use std::time::Duration;

use recipe_ai::{OllamaClient, OllamaConfig};
use recipe_api::app::{build_app, services::AppServices};
use recipe_events::{CancellationToken, EventBus, EventBusConfig, InMemoryEventBus};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestServer {
    base_url: String,
    bus: Arc<InMemoryEventBus>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod, with the language model pointed at `ollama`.
    async fn spawn(ollama: &MockServer) -> Self {
        let shutdown = CancellationToken::new();
        let bus = Arc::new(
            InMemoryEventBus::with_config(
                EventBusConfig::default()
                    .with_worker_count(2)
                    .with_queue_capacity(8)
                    .with_handler_timeout(Duration::from_secs(5)),
            )
            .unwrap(),
        );
        let llm = Arc::new(
            OllamaClient::new(OllamaConfig {
                base_url: ollama.uri(),
                timeout: Duration::from_secs(5),
                ..OllamaConfig::default()
            })
            .unwrap(),
        );
        let services = Arc::new(AppServices::new(bus.clone(), llm, shutdown.clone()));
        bus.start(&shutdown).unwrap();

        let app = build_app(services, Duration::from_secs(30));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, bus, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn ollama_replying(model_output: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": model_output,
            "done": true,
        })))
        .mount(&server)
        .await;
    server
}

async fn generate_calls_eventually(ollama: &MockServer, expected: usize) -> Vec<wiremock::Request> {
    // Submission is asynchronous; poll until the bus worker reaches the model.
    for _ in 0..100 {
        let received = ollama.received_requests().await.unwrap_or_default();
        if received.len() >= expected {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    panic!("language model was not called {expected} time(s) within timeout");
}

#[tokio::test]
async fn health_reports_healthy() {
    let ollama = ollama_replying("{}").await;
    let srv = TestServer::spawn(&ollama).await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn submitted_recipe_is_accepted_then_processed_in_background() {
    let ollama = ollama_replying(r#"{"title": "Pannenkoeken", "servings": 4}"#).await;
    let srv = TestServer::spawn(&ollama).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/v1/recipes", srv.base_url))
        .json(&json!({ "recipe_text": "  250g flour, 2 eggs, 500ml milk  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(!body["recipe_id"].as_str().unwrap().is_empty());
    assert_eq!(body["message"], "Recipe submitted for processing");

    let calls = generate_calls_eventually(&ollama, 1).await;
    let sent: serde_json::Value = calls[0].body_json().unwrap();
    assert_eq!(sent["model"], "mistral");
    assert_eq!(sent["stream"], false);
    assert!(sent["prompt"].as_str().unwrap().contains("250g flour, 2 eggs, 500ml milk"));
}

#[tokio::test]
async fn submit_validation_errors_use_stable_codes() {
    let ollama = ollama_replying("{}").await;
    let srv = TestServer::spawn(&ollama).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/recipes", srv.base_url);

    let cases = [
        (json!({ "recipe_text": "   " }), "EMPTY_TEXT"),
        (json!({ "recipe_text": "x".repeat(10_001) }), "TEXT_TOO_LONG"),
        (json!({ "text": "pancakes" }), "INVALID_REQUEST"),
    ];

    for (payload, code) in cases {
        let res = client.post(&url).json(&payload).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {payload}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["code"], code);
        assert!(body["error"].is_string());
        assert!(body["details"].is_string());
    }

    // Malformed JSON never reaches the bus.
    let res = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(srv.bus.stats().events_published, 0);
}

#[tokio::test]
async fn submit_after_bus_stop_is_service_unavailable() {
    let ollama = ollama_replying("{}").await;
    let srv = TestServer::spawn(&ollama).await;
    srv.bus.stop().await.unwrap();

    let res = reqwest::Client::new()
        .post(format!("{}/api/v1/recipes", srv.base_url))
        .json(&json!({ "recipe_text": "soup" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "EVENT_BUS_UNAVAILABLE");
}

#[tokio::test]
async fn process_returns_structured_recipe() {
    let ollama = ollama_replying(
        "Hier is het recept:\n```json\n{\"title\": \"Tomatensoep\", \"ingredients\": [\"1 kg tomaten\"], \"total_time_minutes\": 45}\n```",
    )
    .await;
    let srv = TestServer::spawn(&ollama).await;

    let res = reqwest::Client::new()
        .post(format!("{}/api/v1/recipes/process", srv.base_url))
        .json(&json!({ "recipe": "1 kg tomatoes, simmer for 45 minutes" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["recipe"]["title"], "Tomatensoep");
    assert_eq!(body["recipe"]["ingredients"], json!(["1 kg tomaten"]));
    assert_eq!(body["recipe"]["total_time"], "45");
}

#[tokio::test]
async fn process_rejects_short_input_without_calling_the_model() {
    let ollama = ollama_replying("{}").await;
    let srv = TestServer::spawn(&ollama).await;

    let res = reqwest::Client::new()
        .post(format!("{}/api/v1/recipes/process", srv.base_url))
        .json(&json!({ "recipe": "soup" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(ollama.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn process_maps_model_failure_to_bad_gateway() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ollama)
        .await;
    let srv = TestServer::spawn(&ollama).await;

    let res = reqwest::Client::new()
        .post(format!("{}/api/v1/recipes/process", srv.base_url))
        .json(&json!({ "recipe": "a perfectly reasonable recipe" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["code"], "LLM_FAILED");
    assert!(body["details"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let ollama = ollama_replying("{}").await;
    let srv = TestServer::spawn(&ollama).await;

    let res = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}/api/v1/recipes", srv.base_url))
        .header("origin", "http://example.com")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
