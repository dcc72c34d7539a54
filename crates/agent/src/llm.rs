use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sierra_core::config::{LlmConfig, LlmProvider};
use sierra_core::ConversationTurn;
use tracing::{debug, error};

pub const GATEWAY_FALLBACK_REPLY: &str =
    "Oops! Looks like I'm having trouble reaching the trailhead 🥾. Try again in a moment?";

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ConversationTurn], temperature: f32) -> Result<String>;
}

/// Chat-completions client for OpenAI and OpenAI-compatible endpoints
/// (Ollama serves the same wire format under `/v1`).
pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    provider: LlmProvider,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build llm http client")?;

        Ok(Self {
            client,
            provider: config.provider,
            base_url: config.effective_base_url().trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn complete(&self, messages: &[ConversationTurn], temperature: f32) -> Result<String> {
        let api_key =
            self.api_key.as_ref().filter(|key| !key.expose_secret().trim().is_empty());
        if api_key.is_none() && self.provider == LlmProvider::OpenAi {
            return Err(anyhow!("llm api key is not configured"));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|turn| ChatMessage { role: turn.role.as_str(), content: &turn.content })
                .collect(),
            temperature,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }
        let response = request.send().await.context("chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("chat completion endpoint returned {status}: {detail}"));
        }

        let parsed: ChatResponse =
            response.json().await.context("failed to decode chat completion response")?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completion response contained no message content"))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// The only path from the agent to the model.
#[derive(Clone)]
pub struct LanguageModelGateway {
    client: Arc<dyn LlmClient>,
}

impl LanguageModelGateway {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Single-turn call. Never fails: provider errors are logged and replaced
    /// by [`GATEWAY_FALLBACK_REPLY`].
    pub async fn call(&self, prompt: &str, temperature: f32) -> String {
        match self.chat(&[ConversationTurn::user(prompt)], temperature).await {
            Ok(text) => text,
            Err(error) => {
                let detail = format!("{error:#}");
                error!(event_name = "llm.call.failed", error = %detail, "llm call failed");
                GATEWAY_FALLBACK_REPLY.to_string()
            }
        }
    }

    /// Multi-turn call that surfaces failure so the caller can keep its own
    /// state untouched.
    pub async fn chat(&self, messages: &[ConversationTurn], temperature: f32) -> Result<String> {
        debug!(event_name = "llm.chat.request", messages = messages.len(), temperature);
        let text = self.client.complete(messages, temperature).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sierra_core::config::{AppConfig, LlmConfig};
    use sierra_core::Role;

    use super::{LanguageModelGateway, LlmClient, OpenAiCompatibleClient, GATEWAY_FALLBACK_REPLY};
    use crate::test_support::ScriptedLlm;

    #[tokio::test]
    async fn call_sends_single_user_turn_and_trims_output() {
        let llm = Arc::new(ScriptedLlm::new(["  order, general \n"]));
        let gateway = LanguageModelGateway::new(llm.clone());

        let reply = gateway.call("classify this", 0.0).await;

        assert_eq!(reply, "order, general");
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages.len(), 1);
        assert_eq!(calls[0].messages[0].role, Role::User);
        assert_eq!(calls[0].messages[0].content, "classify this");
        assert_eq!(calls[0].temperature, 0.0);
    }

    #[tokio::test]
    async fn call_converts_failure_into_fallback_reply() {
        let llm = Arc::new(ScriptedLlm::failing());
        let gateway = LanguageModelGateway::new(llm);

        assert_eq!(gateway.call("anything", 0.0).await, GATEWAY_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn chat_propagates_failure() {
        let gateway = LanguageModelGateway::new(Arc::new(ScriptedLlm::failing()));
        assert!(gateway.chat(&[], 0.7).await.is_err());
    }

    #[tokio::test]
    async fn missing_api_key_fails_at_call_time() {
        let config = LlmConfig { api_key: None, ..AppConfig::default().llm };
        let client = OpenAiCompatibleClient::from_config(&config).expect("client should build");

        let error = client.complete(&[], 0.0).await.expect_err("call should fail without a key");
        assert!(error.to_string().contains("api key"));
    }
}
