//! The chat endpoint's streaming wire format.
//!
//! Each fragment travels as one line `data: {"text":"<fragment>"}` followed
//! by a blank line, and a successful stream always ends with
//! `data: [DONE]` and a blank line.  [`ChatEventCodec`] is both halves: the
//! server encodes with it and the client decodes with it.

use bytes::{BufMut, Bytes, BytesMut};
use futures::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::codec::{Decoder, Encoder, FramedRead};
use tokio_util::io::StreamReader;

use crate::{Error, Result};

/// The literal completion marker.
pub const DONE_MARKER: &str = "[DONE]";

const DATA_PREFIX: &str = "data:";

/// One decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A text fragment to append to the reply.
    Text(String),
    /// The stream finished successfully.
    Done,
}

impl ChatEvent {
    /// Frame this event for the wire.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        ChatEventCodec.encode(self.clone(), &mut buf)?;
        Ok(buf.freeze())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPayload {
    text: String,
}

/// Line-oriented codec for [`ChatEvent`].
///
/// Decoding is tolerant the same way browsers are: blank lines, comment
/// lines and non-`data` fields are skipped, and `\r\n` line endings are
/// accepted.  A `data` line that is neither the completion marker nor a
/// `{"text": ...}` object is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatEventCodec;

impl ChatEventCodec {
    fn parse_line(line: &[u8]) -> Result<Option<ChatEvent>> {
        let line = std::str::from_utf8(line)?;
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return Ok(None);
        };
        let data = data.strip_prefix(' ').unwrap_or(data);
        if data == DONE_MARKER {
            return Ok(Some(ChatEvent::Done));
        }
        let payload: TextPayload = serde_json::from_str(data).map_err(|e| {
            Error::serialization(
                format!("Malformed chat event {data:?}: {e}"),
                Some(Box::new(e)),
            )
        })?;
        Ok(Some(ChatEvent::Text(payload.text)))
    }
}

impl Decoder for ChatEventCodec {
    type Item = ChatEvent;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<ChatEvent>> {
        while let Some(newline) = src.iter().position(|b| *b == b'\n') {
            let line = src.split_to(newline + 1);
            if let Some(event) = Self::parse_line(&line[..newline])? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<ChatEvent>> {
        if let Some(event) = self.decode(src)? {
            return Ok(Some(event));
        }
        if src.is_empty() {
            return Ok(None);
        }
        // The final line lost its newline.
        let line = src.split();
        Self::parse_line(&line)
    }
}

impl Encoder<ChatEvent> for ChatEventCodec {
    type Error = Error;

    fn encode(&mut self, event: ChatEvent, dst: &mut BytesMut) -> Result<()> {
        dst.put_slice(DATA_PREFIX.as_bytes());
        dst.put_u8(b' ');
        match event {
            ChatEvent::Text(text) => {
                let json = serde_json::to_vec(&TextPayload { text })?;
                dst.put_slice(&json);
            }
            ChatEvent::Done => dst.put_slice(DONE_MARKER.as_bytes()),
        }
        dst.put_slice(b"\n\n");
        Ok(())
    }
}

/// Decode a response body into chat events.
///
/// The returned stream is lazy, finite, and cannot be restarted.  Lines split
/// across reads are reassembled before they are parsed.
pub fn decode_stream<S, E>(body: S) -> impl Stream<Item = Result<ChatEvent>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let reader = StreamReader::new(body.map_err(std::io::Error::other));
    FramedRead::new(reader, ChatEventCodec).map_err(|e| match e {
        Error::Io { source, .. } => Error::streaming(
            format!("Error in chat stream: {source}"),
            None,
        ),
        other => other,
    })
}
