//! Route handlers.

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{ApiError, AppState, ServerConfig};
use crate::Result;
use crate::config::AppConfig;
use crate::observability::{
    CHAT_FAILURES, CHAT_FRAGMENTS, CHAT_MISSING_CREDENTIAL, CHAT_REJECTED_INPUT, CHAT_REQUESTS,
    CHAT_STREAM_DURATION, CHAT_STREAM_ERRORS,
};
use crate::prompt;
use crate::provider::MessageStream;
use crate::types::{MessageCreateParams, MessageParam, MessageStreamEvent};
use crate::wire::ChatEvent;

/// Request body for `POST /chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/api/chat", post(chat_handler))
        .route("/config", get(config_handler))
        .route("/api/config", get(config_handler))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until ctrl-c.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let listener = TcpListener::bind(config.bind).await?;
    serve_with_listener(listener, state).await
}

/// Serve on an already bound listener until ctrl-c.
pub async fn serve_with_listener(listener: TcpListener, state: AppState) -> Result<()> {
    tracing::info!("Starting brandchat server on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "brandchat"
    }))
}

/// Branding never fails; the provider already falls back to the defaults.
async fn config_handler(State(state): State<AppState>) -> Json<AppConfig> {
    Json(AppConfig::clone(&state.config.get()))
}

/// Validate, compose the prompt, and stream the provider's reply.
///
/// The body is parsed as JSON whatever its `Content-Type` says.
async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Response, ApiError> {
    CHAT_REQUESTS.click();

    let request: ChatRequest = serde_json::from_slice(&body).map_err(|err| {
        CHAT_REJECTED_INPUT.click();
        tracing::debug!(error = %err, "rejected chat request body");
        ApiError::InvalidBody
    })?;
    let message = match request.message {
        Some(message) if !message.trim().is_empty() => message,
        _ => {
            CHAT_REJECTED_INPUT.click();
            return Err(ApiError::MessageRequired);
        }
    };

    let Some(provider) = state.provider.clone() else {
        CHAT_MISSING_CREDENTIAL.click();
        tracing::error!("chat request refused: provider credential missing");
        return Err(ApiError::CredentialMissing);
    };

    let branding = state.config.get();
    let guidelines = state.brand.get();
    let system = prompt::compose(&branding.company_name, &guidelines);
    let params = MessageCreateParams::new(
        state.max_tokens,
        vec![MessageParam::user(message)],
        state.model.clone(),
    )
    .with_system(system);

    let events = provider.stream(params).await.map_err(|err| {
        CHAT_FAILURES.click();
        tracing::error!(error = %err, "provider request failed");
        ApiError::Internal
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(relay(events)),
    )
        .into_response())
}

/// Re-frame provider events for the caller.
///
/// Text deltas become `data:` frames in arrival order; everything else is
/// dropped.  The completion marker follows `message_stop` or the end of the
/// provider stream.  A provider error ends the stream with an `Err`, which
/// aborts the response so the caller never sees the marker.
pub(crate) fn relay(events: MessageStream) -> impl Stream<Item = Result<Bytes>> + Send {
    stream::unfold(
        Some((events, Instant::now())),
        |state| async move {
            let (mut events, started) = state?;
            loop {
                match events.next().await {
                    Some(Ok(MessageStreamEvent::MessageStop)) | None => {
                        CHAT_STREAM_DURATION.add(started.elapsed().as_secs_f64());
                        return Some((ChatEvent::Done.to_bytes(), None));
                    }
                    Some(Ok(event)) => {
                        if let Some(text) = event.text_fragment() {
                            CHAT_FRAGMENTS.click();
                            let frame = ChatEvent::Text(text.to_string()).to_bytes();
                            return Some((frame, Some((events, started))));
                        }
                    }
                    Some(Err(err)) => {
                        CHAT_STREAM_ERRORS.click();
                        tracing::error!(error = %err, "provider stream failed mid-response");
                        return Some((Err(err), None));
                    }
                }
            }
        },
    )
}
