//! Blocking client for OpenAI-compatible chat-completion servers (Ollama, llama.cpp, vLLM, ...)

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{GenerationParams, Message, Role, TextGenerator};
use crate::config::EndpointConfig;
use crate::error::GenerationError;

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiCompatibleClient {
    agent: ureq::Agent,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &EndpointConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            url: completions_url(&config.base_url),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn parse_reply(body: &str) -> Result<String, GenerationError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

impl TextGenerator for OpenAiCompatibleClient {
    fn generate(
        &self,
        system: &str,
        history: &[Message],
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(WireMessage {
            role: Role::System.as_str(),
            content: system,
        });
        messages.extend(history.iter().map(|m| WireMessage {
            role: m.role().as_str(),
            content: m.content(),
        }));

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let request_body =
            serde_json::to_string(&request).map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        log::debug!(
            "POST {} model={} messages={} temperature={}",
            self.url,
            self.model,
            request.messages.len(),
            params.temperature
        );

        let mut builder = self.agent.post(&self.url).header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", &format!("Bearer {}", key));
        }

        let mut response = builder.send(request_body.as_bytes()).map_err(|e| {
            log::warn!("Request to {} failed: {}", self.url, e);
            GenerationError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let response_body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            log::warn!("Endpoint {} returned HTTP {}", self.url, status);
            return Err(GenerationError::Status {
                status,
                body: response_body.trim().to_string(),
            });
        }

        let reply = parse_reply(&response_body)?;
        log::debug!("Received {} chars from {}", reply.len(), self.model);
        Ok(reply)
    }
}
