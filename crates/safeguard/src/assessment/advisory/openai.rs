use std::time::Duration;

use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::config::AdvisoryConfig;

use super::{AdviceStream, AdvisoryError, AdvisoryPrompt, AdvisoryService};

/// Streaming client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiAdvisoryClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAdvisoryClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, AdvisoryError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|err| AdvisoryError::Transport(err.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &AdvisoryConfig) -> Result<Option<Self>, AdvisoryError> {
        let Some(api_key) = config.api_key.as_deref() else {
            return Ok(None);
        };

        Self::new(
            api_key,
            config.base_url.as_str(),
            config.model.as_str(),
            config.connect_timeout,
        )
        .map(Some)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for OpenAiAdvisoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiAdvisoryClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AdvisoryService for OpenAiAdvisoryClient {
    async fn stream_advice(&self, prompt: AdvisoryPrompt) -> Result<AdviceStream, AdvisoryError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt.text,
            }],
            stream: true,
        };

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| AdvisoryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisoryError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let mut decoder = ChatStreamDecoder::default();
        let fragments = response
            .bytes_stream()
            .map(Some)
            .chain(stream::once(future::ready(None)))
            .map(move |chunk| match chunk {
                Some(Ok(bytes)) => decoder.push(&bytes),
                Some(Err(err)) => vec![Err(AdvisoryError::Transport(err.to_string()))],
                None => decoder.finish(),
            })
            .flat_map(stream::iter)
            .take_while(|event| future::ready(!matches!(event, Ok(ChatStreamEvent::Done))))
            .filter_map(|event| {
                future::ready(match event {
                    Ok(ChatStreamEvent::Delta(text)) => Some(Ok(text)),
                    Ok(ChatStreamEvent::Done) => None,
                    Err(err) => Some(Err(err)),
                })
            });

        Ok(fragments.boxed())
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStreamEvent {
    Delta(String),
    Done,
}

/// Incremental decoder for `text/event-stream` chat completion chunks.
///
/// Bytes are buffered until a full line is available, so chunk boundaries may
/// fall anywhere, including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct ChatStreamDecoder {
    buffer: Vec<u8>,
}

impl ChatStreamDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<ChatStreamEvent, AdvisoryError>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(event) = decode_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Decodes a trailing line the upstream left unterminated at end of stream.
    pub fn finish(&mut self) -> Vec<Result<ChatStreamEvent, AdvisoryError>> {
        let line = std::mem::take(&mut self.buffer);
        if line.is_empty() {
            return Vec::new();
        }
        decode_line(&line).into_iter().collect()
    }
}

fn decode_line(line: &[u8]) -> Option<Result<ChatStreamEvent, AdvisoryError>> {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line.trim_end_matches(['\r', '\n']),
        Err(err) => return Some(Err(AdvisoryError::Decode(err.to_string()))),
    };

    // Blank separators, `:` keep-alive comments and non-data fields carry no text.
    let payload = line.strip_prefix("data:")?.trim_start();
    if payload == "[DONE]" {
        return Some(Ok(ChatStreamEvent::Done));
    }

    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(|content| Ok(ChatStreamEvent::Delta(content))),
        Err(err) => Some(Err(AdvisoryError::Decode(err.to_string()))),
    }
}
