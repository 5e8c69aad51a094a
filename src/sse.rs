//! Server-Sent Events (SSE) processing for provider streams.
//!
//! This module turns the raw byte stream of a streaming `messages` response
//! into [`MessageStreamEvent`] values.  Events are delimited by a blank line;
//! the event name is redundant with the `type` field of the JSON payload, so
//! only `data:` lines are interpreted.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::observability::PROVIDER_STREAM_EVENTS;
use crate::types::MessageStreamEvent;
use crate::{Error, Result};

/// Process a stream of bytes into a stream of server-sent events.
///
/// Frames may be split across reads at any byte, including inside a
/// multi-byte UTF-8 sequence.  Carriage returns are discarded so `\r\n`
/// framed streams parse the same as `\n` framed ones.
pub fn process_sse<S, E>(byte_stream: S) -> impl Stream<Item = Result<MessageStreamEvent>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // Drain every complete frame before reading more.
                while let Some(frame) = next_frame(&mut buffer) {
                    if let Some(event) = parse_frame(&frame) {
                        PROVIDER_STREAM_EVENTS.click();
                        return Some((event, (stream, buffer)));
                    }
                }

                match stream.next().await {
                    Some(Ok(bytes)) => {
                        buffer.extend(bytes.iter().copied().filter(|b| *b != b'\r'));
                    }
                    Some(Err(e)) => {
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // A final frame without its trailing blank line.
                        let tail = std::mem::take(&mut buffer);
                        if let Some(event) = parse_frame(&tail) {
                            PROVIDER_STREAM_EVENTS.click();
                            return Some((event, (stream, buffer)));
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Removes and returns the next complete frame, without its delimiter.
fn next_frame(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let end = buffer.windows(2).position(|w| w == b"\n\n")?;
    let mut frame: Vec<u8> = buffer.drain(..end + 2).collect();
    frame.truncate(end);
    Some(frame)
}

/// Parses one frame.  Frames with no `data:` lines (comments, bare event
/// names, keep-alive blanks) produce nothing.
fn parse_frame(frame: &[u8]) -> Option<Result<MessageStreamEvent>> {
    let text = match std::str::from_utf8(frame) {
        Ok(text) => text,
        Err(e) => return Some(Err(e.into())),
    };

    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();
    if data.is_empty() {
        return None;
    }
    let data = data.join("\n");

    match serde_json::from_str::<MessageStreamEvent>(&data) {
        Ok(MessageStreamEvent::Error(event)) => Some(Err(Error::api(
            500,
            Some(event.error.error_type),
            event.error.message,
            None,
        ))),
        Ok(event) => Some(Ok(event)),
        Err(e) => Some(Err(Error::serialization(
            format!("Failed to parse event JSON: {e}"),
            Some(Box::new(e)),
        ))),
    }
}
