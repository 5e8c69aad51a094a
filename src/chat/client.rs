//! HTTP client for the chat server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::chat::render::Renderer;
use crate::chat::session::{ChatSession, StreamUpdate, Turn};
use crate::config::AppConfig;
use crate::wire::{ChatEvent, decode_stream};
use crate::{Error, Result};

/// Shown when the server rejects a request without saying why.
pub const FAILED_RESPONSE_MESSAGE: &str = "Failed to get response";

/// Shown for failures that have no message meant for users.
pub const GENERIC_FAILURE_MESSAGE: &str = "Sorry, there was an error processing your request.";

/// Client for a brandchat server.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    base_url: Url,
}

impl ChatClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)
            .map_err(|e| Error::url(format!("Invalid server URL {base_url:?}: {e}"), Some(e)))?;
        let client = ReqwestClient::builder().build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {e}"),
                Some(Box::new(e)),
            )
        })?;
        Ok(Self { client, base_url })
    }

    /// The server's base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::url(format!("Invalid endpoint {path:?}: {e}"), Some(e)))
    }

    /// Fetch the branding document.
    pub async fn fetch_config(&self) -> Result<AppConfig> {
        let response = self
            .client
            .get(self.endpoint("config")?)
            .send()
            .await
            .map_err(|e| Error::from_send(e, None))?;
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        let body = response.bytes().await.map_err(|e| {
            Error::http_client(format!("Failed to read config: {e}"), Some(Box::new(e)))
        })?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send one message and return the decoded reply stream.
    ///
    /// A non-success status is an [`Error::Api`] whose message is the
    /// server's `error` field, or [`FAILED_RESPONSE_MESSAGE`].
    pub async fn send(
        &self,
        message: &str,
    ) -> Result<impl Stream<Item = Result<ChatEvent>> + Send> {
        let response = self
            .client
            .post(self.endpoint("chat")?)
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|e| Error::from_send(e, None))?;
        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }
        Ok(decode_stream(response.bytes_stream()))
    }

    async fn process_error_response(response: Response) -> Error {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: Option<String>,
        }

        let status_code = response.status().as_u16();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.error)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FAILED_RESPONSE_MESSAGE.to_string());
        Error::api(status_code, None, message, None)
    }
}

/// The text a failed turn leaves in the transcript.
pub fn failure_text(err: &Error) -> String {
    match err {
        Error::Api { message, .. } => message.clone(),
        _ => GENERIC_FAILURE_MESSAGE.to_string(),
    }
}

/// How often a pending send or read checks the interrupt flag.
const INTERRUPT_POLL: Duration = Duration::from_millis(50);

/// Send `turn` and stream the reply into `session` and `renderer`.
///
/// Failures are already applied to the session and rendered when this
/// returns them.  Setting `interrupted` abandons the turn even while the
/// server has not answered.
pub async fn run_turn(
    client: &ChatClient,
    session: &mut ChatSession,
    turn: Turn,
    renderer: &mut dyn Renderer,
    interrupted: &AtomicBool,
) -> Result<()> {
    renderer.start_response();
    let sent = tokio::select! {
        biased;
        _ = interrupt_requested(interrupted) => {
            interrupt(session, &turn, renderer);
            return Ok(());
        }
        sent = client.send(turn.message()) => sent,
    };
    match sent {
        Ok(events) => drive(session, &turn, events, renderer, interrupted).await,
        Err(err) => Err(fail(session, &turn, renderer, err)),
    }
}

/// Feed decoded events for `turn` into the session.
///
/// The turn only succeeds when the completion marker arrives.  Nothing is
/// rendered once the session has moved past `turn`.
pub(crate) async fn drive<S>(
    session: &mut ChatSession,
    turn: &Turn,
    events: S,
    renderer: &mut dyn Renderer,
    interrupted: &AtomicBool,
) -> Result<()>
where
    S: Stream<Item = Result<ChatEvent>>,
{
    session.apply(turn, StreamUpdate::Started);
    let mut events = std::pin::pin!(events);
    loop {
        let next = tokio::select! {
            biased;
            _ = interrupt_requested(interrupted) => {
                interrupt(session, turn, renderer);
                return Ok(());
            }
            next = events.next() => next,
        };
        match next {
            Some(Ok(ChatEvent::Text(text))) => {
                if session.apply(turn, StreamUpdate::Fragment(text.clone())) {
                    renderer.print_text(&text);
                }
            }
            Some(Ok(ChatEvent::Done)) => {
                if session.apply(turn, StreamUpdate::Completed) {
                    renderer.finish_response();
                }
                return Ok(());
            }
            Some(Err(err)) => return Err(fail(session, turn, renderer, err)),
            None => {
                let err = Error::streaming("Response ended before it was complete", None);
                return Err(fail(session, turn, renderer, err));
            }
        }
    }
}

async fn interrupt_requested(interrupted: &AtomicBool) {
    while !interrupted.load(Ordering::Relaxed) {
        tokio::time::sleep(INTERRUPT_POLL).await;
    }
}

fn interrupt(session: &mut ChatSession, turn: &Turn, renderer: &mut dyn Renderer) {
    if session.apply(turn, StreamUpdate::Interrupted) {
        renderer.print_interrupted();
    }
}

fn fail(session: &mut ChatSession, turn: &Turn, renderer: &mut dyn Renderer, err: Error) -> Error {
    tracing::debug!(error = %err, "chat turn failed");
    let text = failure_text(&err);
    if session.apply(turn, StreamUpdate::Failed(text.clone())) {
        renderer.print_error(&text);
    }
    err
}
