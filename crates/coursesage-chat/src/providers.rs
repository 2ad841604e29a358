//! Provider wire formats.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic lifts the
//! system prompt out of the message list. Cohere's v1 chat takes a single
//! `message` plus `preamble` and `chat_history`.

use serde_json::{json, Value};

use crate::types::{ChatMessage, LLMProvider, ResolvedProvider, Role};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const COHERE_URL: &str = "https://api.cohere.ai/v1/chat";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A fully-formed outbound completion request.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub url: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

/// Build the HTTP request for the resolved provider.
pub fn build_request(
    resolved: &ResolvedProvider,
    messages: &[ChatMessage],
    max_tokens: usize,
    temperature: f64,
) -> ProviderRequest {
    match resolved.provider {
        LLMProvider::OpenAI => openai_compat(OPENAI_URL, resolved, messages, max_tokens, temperature),
        LLMProvider::Groq => openai_compat(GROQ_URL, resolved, messages, max_tokens, temperature),
        LLMProvider::Anthropic => anthropic(resolved, messages, max_tokens, temperature),
        LLMProvider::Cohere => cohere(resolved, messages, max_tokens, temperature),
    }
}

fn openai_compat(
    url: &'static str,
    resolved: &ResolvedProvider,
    messages: &[ChatMessage],
    max_tokens: usize,
    temperature: f64,
) -> ProviderRequest {
    let msgs: Vec<Value> = messages
        .iter()
        .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
        .collect();

    ProviderRequest {
        url,
        headers: vec![("Authorization", format!("Bearer {}", resolved.api_key))],
        body: json!({
            "model": resolved.model,
            "messages": msgs,
            "max_tokens": max_tokens,
            "temperature": temperature,
        }),
    }
}

fn anthropic(
    resolved: &ResolvedProvider,
    messages: &[ChatMessage],
    max_tokens: usize,
    temperature: f64,
) -> ProviderRequest {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let conversation: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| json!({"role": m.role.as_str(), "content": m.content}))
        .collect();

    let mut body = json!({
        "model": resolved.model,
        "messages": conversation,
        "max_tokens": max_tokens,
        "temperature": temperature,
    });
    if !system.is_empty() {
        body["system"] = json!(system.join("\n\n"));
    }

    ProviderRequest {
        url: ANTHROPIC_URL,
        headers: vec![
            ("x-api-key", resolved.api_key.clone()),
            ("anthropic-version", ANTHROPIC_VERSION.to_string()),
        ],
        body,
    }
}

fn cohere(
    resolved: &ResolvedProvider,
    messages: &[ChatMessage],
    max_tokens: usize,
    temperature: f64,
) -> ProviderRequest {
    let preamble: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();
    let mut turns: Vec<&ChatMessage> = messages.iter().filter(|m| m.role != Role::System).collect();
    let ends_with_user = turns.last().map_or(false, |m| m.role == Role::User);
    let message = if ends_with_user {
        turns.pop().map(|m| m.content.clone()).unwrap_or_default()
    } else {
        String::new()
    };
    let history: Vec<Value> = turns
        .iter()
        .map(|m| {
            let role = if m.role == Role::User { "USER" } else { "CHATBOT" };
            json!({"role": role, "message": m.content})
        })
        .collect();

    let mut body = json!({
        "model": resolved.model,
        "message": message,
        "max_tokens": max_tokens,
        "temperature": temperature,
    });
    if !preamble.is_empty() {
        body["preamble"] = json!(preamble.join("\n\n"));
    }
    if !history.is_empty() {
        body["chat_history"] = json!(history);
    }

    ProviderRequest {
        url: COHERE_URL,
        headers: vec![("Authorization", format!("Bearer {}", resolved.api_key))],
        body,
    }
}

/// Pull the generated text out of a provider response body.
pub fn extract_text(provider: LLMProvider, response: &Value) -> Option<String> {
    match provider {
        LLMProvider::OpenAI | LLMProvider::Groq => response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string),
        LLMProvider::Anthropic => {
            let parts: Vec<&str> = response["content"]
                .as_array()?
                .iter()
                .filter(|block| block["type"].as_str() == Some("text"))
                .filter_map(|block| block["text"].as_str())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.concat())
            }
        }
        LLMProvider::Cohere => response["text"].as_str().map(str::to_string),
    }
}
