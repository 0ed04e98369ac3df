//! External LLM provider streaming implementations.
//!
//! Each provider streams tokens via SSE. OpenAI and Groq share one wire
//! format; Anthropic uses its own event types.

use std::pin::Pin;

use futures::Stream;
use reqwest::Client;
use serde_json::{json, Value};
use tokio_stream::StreamExt;
use tracing::{debug, error};

use foodsight_core::{Error, Result};

use crate::types::{ChatMessage, LLMProvider, ResolvedModel};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Boxed stream type for returning different stream implementations.
pub type BoxedStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// A single streamed token or error.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Token(String),
    Done { tokens_used: usize },
    Error(String),
}

/// Sampling parameters for one call.
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub temperature: f64,
    pub max_tokens: usize,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

/// Splits a byte stream into complete, trimmed SSE `data:` payloads.
/// Bytes are buffered until a newline, so a character split across chunks
/// is decoded whole.
#[derive(Default)]
struct SseLines {
    buffer: Vec<u8>,
}

impl SseLines {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut payloads = Vec::new();
        while let Some(line_end) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim();
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim().to_string());
            }
        }
        payloads
    }
}

/// What one SSE payload means for the caller.
enum Event {
    Token(String),
    Done,
    Error(String),
    Skip,
}

fn openai_event(data: &str) -> Event {
    if data == "[DONE]" {
        return Event::Done;
    }
    match serde_json::from_str::<Value>(data) {
        Ok(parsed) => match parsed["choices"][0]["delta"]["content"].as_str() {
            Some(content) if !content.is_empty() => Event::Token(content.to_string()),
            _ => Event::Skip,
        },
        Err(_) => Event::Skip,
    }
}

fn anthropic_event(data: &str) -> Event {
    let Ok(parsed) = serde_json::from_str::<Value>(data) else {
        return Event::Skip;
    };
    match parsed["type"].as_str() {
        Some("content_block_delta") => match parsed["delta"]["text"].as_str() {
            Some(text) if !text.is_empty() => Event::Token(text.to_string()),
            _ => Event::Skip,
        },
        Some("message_stop") => Event::Done,
        Some("error") => {
            let msg = parsed["error"]["message"].as_str().unwrap_or("Unknown error");
            error!("Anthropic error: {}", msg);
            Event::Error(msg.to_string())
        }
        _ => Event::Skip,
    }
}

/// Stream tokens from the resolved provider.
pub fn stream_llm(
    client: &Client,
    target: &ResolvedModel,
    messages: Vec<ChatMessage>,
    sampling: Sampling,
) -> BoxedStream {
    let request = match target.provider {
        LLMProvider::OpenAI | LLMProvider::Groq => {
            let msgs: Vec<Value> = messages
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect();
            client
                .post(format!("{}/chat/completions", target.base_url))
                .bearer_auth(&target.api_key)
                .json(&json!({
                    "model": target.model,
                    "messages": msgs,
                    "temperature": sampling.temperature,
                    "max_tokens": sampling.max_tokens,
                    "stream": true,
                }))
        }
        LLMProvider::Anthropic => {
            let system: Option<&str> = messages
                .iter()
                .find(|m| m.role == "system")
                .map(|m| m.content.as_str());
            let conv: Vec<Value> = messages
                .iter()
                .filter(|m| m.role != "system")
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect();
            let mut body = json!({
                "model": target.model,
                "messages": conv,
                "temperature": sampling.temperature,
                "max_tokens": sampling.max_tokens,
                "stream": true,
            });
            if let Some(sys) = system {
                body["system"] = json!(sys);
            }
            client
                .post(format!("{}/messages", target.base_url))
                .header("x-api-key", &target.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
        }
    };

    let parse: fn(&str) -> Event = match target.provider {
        LLMProvider::Anthropic => anthropic_event,
        _ => openai_event,
    };
    debug!(provider = %target.provider, model = %target.model, "Streaming completion");

    Box::pin(async_stream::stream! {
        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut lines = SseLines::default();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            for data in lines.push(&bytes) {
                match parse(&data) {
                    Event::Token(text) => {
                        token_count += 1;
                        yield StreamChunk::Token(text);
                    }
                    Event::Done => {
                        yield StreamChunk::Done { tokens_used: token_count };
                        return;
                    }
                    Event::Error(msg) => {
                        yield StreamChunk::Error(msg);
                        return;
                    }
                    Event::Skip => {}
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    })
}

/// Run a streamed completion to the end and return the concatenated text.
pub async fn complete(
    client: &Client,
    target: &ResolvedModel,
    messages: Vec<ChatMessage>,
    sampling: Sampling,
) -> Result<String> {
    let mut stream = stream_llm(client, target, messages, sampling);
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            StreamChunk::Token(t) => text.push_str(&t),
            StreamChunk::Done { tokens_used } => {
                debug!(tokens_used, "Completion finished");
                break;
            }
            StreamChunk::Error(e) => return Err(Error::Llm(e)),
        }
    }
    Ok(text)
}

/// Test an API key by making a minimal request.
pub async fn test_api_key(client: &Client, provider: LLMProvider, api_key: &str) -> Result<()> {
    let base = provider.default_base_url();
    let request = match provider {
        LLMProvider::OpenAI | LLMProvider::Groq => {
            client.get(format!("{}/models", base)).bearer_auth(api_key)
        }
        LLMProvider::Anthropic => client
            .post(format!("{}/messages", base))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": crate::config::DEFAULT_ANTHROPIC_MODEL,
                "max_tokens": 1,
                "messages": [{"role": "user", "content": "Hola"}],
            })),
    };

    let resp = request
        .send()
        .await
        .map_err(|e| Error::Http(e.to_string()))?;
    let status = resp.status();
    // Anthropic answers 400 for a valid key with a quota or model problem.
    let accepted = status.is_success()
        || (provider == LLMProvider::Anthropic && status.as_u16() == 400);
    if accepted {
        Ok(())
    } else {
        Err(Error::Llm(format!("API returned status {}", status)))
    }
}
