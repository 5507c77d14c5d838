//! OpenAI-compatible chat completions
//!
//! Used for the free-form packing list and the streamed location guide.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, info, instrument};

use super::{TextGenerator, http_client};
use crate::config::AiConfig;
use crate::text_stream::TextStream;

pub struct OpenAiTextGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTextGenerator {
    /// `None` when no API key is configured; callers show a placeholder instead
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        Ok(Some(Self {
            client: http_client(config.timeout())?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }))
    }

    fn request_body<'a>(&'a self, prompt: &'a str, max_tokens: u32, stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
            stream,
        }
    }

    async fn send(&self, body: &ChatRequest<'_>) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .with_context(|| "Chat completion request failed")?
            .error_for_status()?;
        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: String, max_tokens: u32) -> Result<String> {
        let start_time = Instant::now();
        let response = self.send(&self.request_body(&prompt, max_tokens, false)).await?;

        let completion: ChatCompletion = response
            .json()
            .await
            .with_context(|| "Failed to parse chat completion")?;
        let text = completion.into_text()?;

        info!(
            "Generated {} characters in {:.3}s",
            text.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(text)
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate_stream(&self, prompt: String, max_tokens: u32) -> Result<TextStream> {
        let response = self.send(&self.request_body(&prompt, max_tokens, true)).await?;
        debug!("Chat completion stream opened");

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(anyhow::Error::from))
            .boxed();
        Ok(TextStream::new(sse_fragments(bytes)))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletion {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| anyhow!("Chat completion contained no message"))
    }
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// One decoded server-sent event payload
#[derive(Debug, PartialEq, Eq)]
enum SseItem {
    Text(String),
    Done,
}

/// Incremental decoder for `data:` lines of a chat completion stream.
/// Network chunks may split a line, or a UTF-8 sequence, anywhere.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseItem>> {
        self.buffer.extend_from_slice(chunk);

        let mut items = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&raw);
            let Some(payload) = line.trim_end_matches(['\r', '\n']).strip_prefix("data:") else {
                continue;
            };
            let payload = payload.trim();
            if payload.is_empty() {
                continue;
            }
            if payload == "[DONE]" {
                items.push(SseItem::Done);
                break;
            }

            let chunk: StreamChunk = serde_json::from_str(payload)
                .with_context(|| "Failed to parse chat completion chunk")?;
            let text: String = chunk
                .choices
                .into_iter()
                .filter_map(|choice| choice.delta.content)
                .collect();
            if !text.is_empty() {
                items.push(SseItem::Text(text));
            }
        }
        Ok(items)
    }
}

struct SseState<B> {
    bytes: BoxStream<'static, Result<B>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    done: bool,
}

/// Turn a raw byte stream into text fragments, ending at `[DONE]` or end of body
fn sse_fragments<B>(
    bytes: BoxStream<'static, Result<B>>,
) -> impl futures::Stream<Item = Result<String>> + Send + 'static
where
    B: AsRef<[u8]> + Send + 'static,
{
    let state = SseState {
        bytes,
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(text) = state.pending.pop_front() {
                return Some((Ok(text), state));
            }
            if state.done {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => match state.decoder.push(chunk.as_ref()) {
                    Ok(items) => {
                        for item in items {
                            match item {
                                SseItem::Text(text) => state.pending.push_back(text),
                                SseItem::Done => state.done = true,
                            }
                        }
                    }
                    Err(e) => {
                        state.done = true;
                        return Some((Err(e), state));
                    }
                },
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(e), state));
                }
                None => state.done = true,
            }
        }
    })
}
