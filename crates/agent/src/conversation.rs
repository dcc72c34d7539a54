use sierra_core::{ConversationHistory, ConversationTurn};
use tracing::{error, info};

use crate::dispatch::DispatchDecision;
use crate::llm::LanguageModelGateway;

pub const PERSONA_TEMPERATURE: f32 = 0.7;
pub const PERSONA_FAILURE_REPLY: &str = "Something went off trail 🌲— please try again shortly!";
pub const PERSONA_PROMPT: &str = "You are Sierra, an adventurous and cheerful outdoor gear expert. \
Use friendly, trail-inspired language, emojis like 🏕️🌲⛰️, and stay helpful and CONCISE. 3 sentence limit for all responses. \
If a question is unrelated to Sierra Outfitters, still answer politely but stay in character.";

pub fn compile_prompt(user_input: &str, fragments: &[String]) -> String {
    format!(
        "User question: {user_input}. Use the following information to best answer the user's question: {}",
        fragments.join("\n")
    )
}

/// Builds the persona chat message and records successful exchanges.
#[derive(Clone, Debug)]
pub struct ResponseCompiler {
    persona: String,
}

impl Default for ResponseCompiler {
    fn default() -> Self {
        Self::new(PERSONA_PROMPT)
    }
}

impl ResponseCompiler {
    pub fn new(persona: impl Into<String>) -> Self {
        Self { persona: persona.into() }
    }

    pub fn outgoing_message(&self, user_input: &str, decision: &DispatchDecision) -> String {
        match decision {
            DispatchDecision::Augment { fragments } => compile_prompt(user_input, fragments),
            DispatchDecision::PassThrough { .. } => user_input.to_string(),
        }
    }

    pub fn messages(&self, history: &ConversationHistory, message: &str) -> Vec<ConversationTurn> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ConversationTurn::system(self.persona.clone()));
        messages.extend(history.turns().iter().cloned());
        messages.push(ConversationTurn::user(message));
        messages
    }

    /// Persona call. History changes only when the model answers.
    pub async fn reply(
        &self,
        gateway: &LanguageModelGateway,
        history: &mut ConversationHistory,
        message: String,
    ) -> String {
        let messages = self.messages(history, &message);
        match gateway.chat(&messages, PERSONA_TEMPERATURE).await {
            Ok(reply) => {
                history.record_exchange(message, reply.clone());
                info!(event_name = "agent.persona.replied", history_len = history.len());
                reply
            }
            Err(failure) => {
                let detail = format!("{failure:#}");
                error!(event_name = "agent.persona.failed", error = %detail, "persona chat failed");
                PERSONA_FAILURE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sierra_core::{ConversationHistory, ConversationTurn, Role};

    use super::{compile_prompt, ResponseCompiler, PERSONA_FAILURE_REPLY, PERSONA_PROMPT};
    use crate::dispatch::{DispatchDecision, PassThroughReason};
    use crate::llm::LanguageModelGateway;
    use crate::test_support::ScriptedLlm;

    #[test]
    fn compiled_prompt_joins_fragments_with_newlines() {
        let prompt = compile_prompt("any deals?", &["one".to_string(), "two".to_string()]);
        assert_eq!(
            prompt,
            "User question: any deals?. Use the following information to best answer the user's question: one\ntwo"
        );
    }

    #[test]
    fn pass_through_sends_raw_input() {
        let compiler = ResponseCompiler::default();
        let decision = DispatchDecision::PassThrough { reason: PassThroughReason::GeneralIntent };
        assert_eq!(compiler.outgoing_message("hello!", &decision), "hello!");
    }

    #[tokio::test]
    async fn success_replays_history_and_appends_exchange() {
        let llm = Arc::new(ScriptedLlm::new(["Howdy, trail friend!", "Try the Summit Pack 🏕️"]));
        let gateway = LanguageModelGateway::new(llm.clone());
        let compiler = ResponseCompiler::default();
        let mut history = ConversationHistory::new();

        let first = compiler.reply(&gateway, &mut history, "hi".to_string()).await;
        let second = compiler.reply(&gateway, &mut history, "pack?".to_string()).await;

        assert_eq!(first, "Howdy, trail friend!");
        assert_eq!(second, "Try the Summit Pack 🏕️");
        assert_eq!(history.len(), 4);

        let calls = llm.calls();
        assert_eq!(calls[1].temperature, 0.7);
        assert_eq!(
            calls[1].messages,
            vec![
                ConversationTurn::system(PERSONA_PROMPT),
                ConversationTurn::user("hi"),
                ConversationTurn::assistant("Howdy, trail friend!"),
                ConversationTurn::user("pack?"),
            ]
        );
    }

    #[tokio::test]
    async fn failure_leaves_history_untouched() {
        let llm = Arc::new(ScriptedLlm::with_outages([Some("first reply".to_string()), None]));
        let gateway = LanguageModelGateway::new(llm);
        let compiler = ResponseCompiler::default();
        let mut history = ConversationHistory::new();

        compiler.reply(&gateway, &mut history, "hi".to_string()).await;
        let before = history.clone();
        let reply = compiler.reply(&gateway, &mut history, "still there?".to_string()).await;

        assert_eq!(reply, PERSONA_FAILURE_REPLY);
        assert_eq!(history, before);
        assert_eq!(history.turns()[0].role, Role::User);
    }
}
