//! End-to-end tests: the terminal client talks to a real server on an
//! ephemeral port, which talks to a scripted stand-in for the model API.

use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use brandchat::Error;
use brandchat::chat::{
    ChatClient, ChatSession, GENERIC_FAILURE_MESSAGE, Phase, Renderer, run_turn,
};
use brandchat::server::{AppState, ServerConfig, serve_with_listener};

const HAPPY_STREAM: &str = "event: message_start\n\
data: {\"type\":\"message_start\",\"message\":{\"id\":\"msg_1\",\"model\":\"m\",\"usage\":{\"input_tokens\":5,\"output_tokens\":1}}}\n\n\
event: content_block_start\n\
data: {\"type\":\"content_block_start\",\"index\":0,\"content_block\":{\"type\":\"text\",\"text\":\"\"}}\n\n\
event: ping\n\
data: {\"type\":\"ping\"}\n\n\
event: content_block_delta\n\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hello\"}}\n\n\
event: content_block_delta\n\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\", friend\"}}\n\n\
event: content_block_stop\n\
data: {\"type\":\"content_block_stop\",\"index\":0}\n\n\
event: message_delta\n\
data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":3}}\n\n\
event: message_stop\n\
data: {\"type\":\"message_stop\"}\n\n";

const FAILING_STREAM: &str = "event: content_block_delta\n\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hel\"}}\n\n\
event: error\n\
data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n\n";

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn messages(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    upstream.seen.lock().unwrap().push((key, request));
    (
        upstream.status,
        [(header::CONTENT_TYPE, "text/event-stream")],
        upstream.body,
    )
        .into_response()
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

struct Harness {
    client: ChatClient,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    _dir: tempfile::TempDir,
}

async fn harness(status: StatusCode, body: &'static str, api_key: Option<&str>) -> Harness {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let upstream = Upstream {
        status,
        body,
        seen: seen.clone(),
    };
    let upstream_addr = spawn(
        Router::new()
            .route("/v1/messages", post(messages))
            .with_state(upstream),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r##"{"companyName":"Acme","primaryColor":"#112233","tagline":"t","welcomeMessage":"w","suggestions":[]}"##,
    )
    .unwrap();
    let content = dir.path().join("content");
    std::fs::create_dir(&content).unwrap();
    std::fs::write(content.join("a.md"), "X").unwrap();
    std::fs::write(content.join("b.md"), "Y").unwrap();
    std::fs::write(content.join("notes.txt"), "ignored").unwrap();

    let config = ServerConfig {
        config_path: dir.path().join("config.json"),
        content_dir: content,
        base_url: format!("http://{upstream_addr}/v1/"),
        api_key: api_key.map(String::from),
        ..ServerConfig::default()
    };
    let state = AppState::from_config(&config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve_with_listener(listener, state).await.unwrap();
    });

    Harness {
        client: ChatClient::new(&format!("http://{addr}")).unwrap(),
        seen,
        _dir: dir,
    }
}

struct Quiet;

impl Renderer for Quiet {
    fn start_response(&mut self) {}
    fn print_text(&mut self, _: &str) {}
    fn print_error(&mut self, _: &str) {}
    fn print_info(&mut self, _: &str) {}
    fn finish_response(&mut self) {}
    fn print_interrupted(&mut self) {}
}

async fn chat(client: &ChatClient, session: &mut ChatSession, text: &str) -> brandchat::Result<()> {
    session.set_input(text);
    let turn = session.submit().expect("session accepts input");
    run_turn(client, session, turn, &mut Quiet, &AtomicBool::new(false)).await
}

#[tokio::test]
async fn reply_streams_through_to_the_transcript() {
    let harness = harness(StatusCode::OK, HAPPY_STREAM, Some("test-key")).await;
    let mut session = ChatSession::new();

    chat(&harness.client, &mut session, "hello").await.unwrap();
    assert_eq!(session.last_reply(), Some("Hello, friend"));
    assert_eq!(session.phase(), Phase::Idle);

    let seen = harness.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (key, request) = &seen[0];
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(request["stream"], Value::Bool(true));
    assert_eq!(request["max_tokens"], Value::from(2048));
    assert_eq!(
        request["messages"],
        serde_json::json!([{"role": "user", "content": "hello"}])
    );
    let system = request["system"].as_str().unwrap();
    assert!(system.contains("brand messaging assistant for Acme."));
    assert!(system.contains("# a.md\n\nX\n\n---\n\n# b.md\n\nY"));
    assert!(!system.contains("ignored"));
}

#[tokio::test]
async fn each_request_is_independent() {
    let harness = harness(StatusCode::OK, HAPPY_STREAM, Some("test-key")).await;
    let mut session = ChatSession::new();

    chat(&harness.client, &mut session, "first").await.unwrap();
    chat(&harness.client, &mut session, "second").await.unwrap();
    assert_eq!(session.messages().len(), 4);

    let seen = harness.seen.lock().unwrap();
    assert_eq!(
        seen[1].1["messages"],
        serde_json::json!([{"role": "user", "content": "second"}])
    );
}

#[tokio::test]
async fn branding_is_served() {
    let harness = harness(StatusCode::OK, HAPPY_STREAM, None).await;
    let branding = harness.client.fetch_config().await.unwrap();
    assert_eq!(branding.company_name, "Acme");
    assert_eq!(branding.primary_color, "#112233");
}

#[tokio::test]
async fn empty_message_is_rejected_by_the_server() {
    let harness = harness(StatusCode::OK, HAPPY_STREAM, Some("test-key")).await;
    let err = match harness.client.send("").await {
        Ok(_) => panic!("empty message accepted"),
        Err(err) => err,
    };
    match err {
        Error::Api {
            status_code,
            message,
            ..
        } => {
            assert_eq!(status_code, 400);
            assert_eq!(message, "message required");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(harness.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_credential_surfaces_in_the_transcript() {
    let harness = harness(StatusCode::OK, HAPPY_STREAM, None).await;
    let mut session = ChatSession::new();

    assert!(chat(&harness.client, &mut session, "hello").await.is_err());
    assert_eq!(session.last_reply(), Some("provider credential missing"));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(harness.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn provider_rejection_is_generic() {
    let harness = harness(
        StatusCode::UNAUTHORIZED,
        r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
        Some("wrong-key"),
    )
    .await;
    let mut session = ChatSession::new();

    assert!(chat(&harness.client, &mut session, "hello").await.is_err());
    assert_eq!(
        session.last_reply(),
        Some("An error occurred processing your request")
    );
}

#[tokio::test]
async fn mid_stream_failure_is_a_failed_turn() {
    let harness = harness(StatusCode::OK, FAILING_STREAM, Some("test-key")).await;
    let mut session = ChatSession::new();

    assert!(chat(&harness.client, &mut session, "hello").await.is_err());
    assert_eq!(session.last_reply(), Some(GENERIC_FAILURE_MESSAGE));
    assert_eq!(session.phase(), Phase::Idle);

    // The session stays usable.
    session.set_input("again");
    assert!(session.submit().is_some());
}

/// Talks to the real API; skipped unless ANTHROPIC_API_KEY is set.
#[tokio::test]
async fn live_provider_stream() {
    use brandchat::{Anthropic, MessageCreateParams, MessageParam, Model};
    use futures::StreamExt;

    let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") else {
        eprintln!("Skipping test: ANTHROPIC_API_KEY not set");
        return;
    };
    let client = Anthropic::new(api_key).expect("Failed to create client");
    let params = MessageCreateParams::new(
        10,
        vec![MessageParam::user("Count to 3")],
        Model::default(),
    );
    let mut stream = client.stream(params).await.expect("stream starts");
    let mut text = String::new();
    while let Some(event) = stream.next().await {
        if let Some(fragment) = event.expect("event parses").text_fragment() {
            text.push_str(fragment);
        }
    }
    assert!(!text.is_empty());
}
