use reqwest::Client;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use futures_util::StreamExt;

use crate::session::ChatMessage;

/// Instruction sent alongside the transcript on every request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for a pet owners' community forum. \
Keep your answers clear, friendly, and safe. \
Share knowledge about dogs, cats, and other companion animals.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    system: &'a str,
}

/// One newline-delimited record from the reply stream. Only `response` is
/// consumed; records without it (e.g. end-of-stream markers) are skipped.
#[derive(Deserialize)]
struct StreamRecord {
    response: Option<String>,
}

/// Events delivered from the streaming task to the UI event loop.
#[derive(Debug)]
pub enum StreamEvent {
    /// The full reply text accumulated so far.
    Update(String),
    Done,
    Failed,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send the transcript and stream the assistant's reply.
    ///
    /// `on_update` is called with the full accumulated text after every
    /// server record that carries one; the final text is returned once the
    /// stream ends. A non-success status fails before any update is issued.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        mut on_update: impl FnMut(&str),
    ) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);

        let request = ChatRequest {
            messages,
            system: SYSTEM_PROMPT,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "chat request failed with status: {}",
                response.status()
            ));
        }

        let mut stream = response.bytes_stream();
        let mut lines = LineBuffer::new();
        let mut reply = String::new();

        while let Some(chunk) = stream.next().await {
            for line in lines.push(&chunk?) {
                if let Some(text) = parse_stream_line(&line) {
                    reply = text;
                    on_update(&reply);
                }
            }
        }

        // The stream may end without a trailing newline.
        if let Some(line) = lines.finish() {
            if let Some(text) = parse_stream_line(&line) {
                reply = text;
                on_update(&reply);
            }
        }

        Ok(reply)
    }
}

/// Parse one line of the stream, returning the carried reply text if any.
///
/// The server emits the complete text so far in each `response` field, so
/// the returned value replaces the caller's accumulator. Malformed lines are
/// logged and skipped; they never abort the stream.
fn parse_stream_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<StreamRecord>(line) {
        // An empty value carries no text (end-of-stream markers emit one);
        // it must not clear what already accumulated.
        Ok(record) => record.response.filter(|text| !text.is_empty()),
        Err(err) => {
            tracing::warn!("skipping malformed stream line: {err}");
            None
        }
    }
}

/// Byte buffer that frames an incoming chunk stream into complete lines.
///
/// Chunks split anywhere, including inside a multi-byte character; bytes stay
/// buffered until their line's newline arrives, so only complete lines are
/// ever decoded.
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Absorb a chunk and return the lines it completed, newline included.
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buf.drain(..=newline_pos).collect();
            lines.push(String::from_utf8_lossy(&line_bytes).into_owned());
        }
        lines
    }

    /// Return any unterminated trailing line once the stream is exhausted.
    fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest: Vec<u8> = std::mem::take(&mut self.buf);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}
