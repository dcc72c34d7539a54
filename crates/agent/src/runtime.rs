use std::sync::Arc;

use sierra_core::{Clock, ConversationHistory, EarlyRiserPromo, StoreSnapshot};
use tracing::info;

use crate::conversation::ResponseCompiler;
use crate::dispatch::{DispatchDecision, DispatchPolicy};
use crate::handlers::{
    CredentialPrompt, EarlyRiserHandler, HandlerRegistry, OrderLookupHandler,
    RecommendationHandler,
};
use crate::intent::{Intent, IntentClassifier};
use crate::llm::LanguageModelGateway;

/// One chat session: the per-message pipeline plus the history it grows.
pub struct AgentRuntime {
    gateway: LanguageModelGateway,
    classifier: IntentClassifier,
    handlers: HandlerRegistry,
    policy: DispatchPolicy,
    compiler: ResponseCompiler,
    history: ConversationHistory,
}

impl AgentRuntime {
    pub fn new(
        gateway: LanguageModelGateway,
        handlers: HandlerRegistry,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            gateway,
            classifier: IntentClassifier::new(),
            handlers,
            policy,
            compiler: ResponseCompiler::default(),
            history: ConversationHistory::new(),
        }
    }

    /// Wires the three retail handlers over a loaded snapshot.
    pub fn for_store(
        gateway: LanguageModelGateway,
        snapshot: StoreSnapshot,
        prompt: Arc<dyn CredentialPrompt>,
        clock: Arc<dyn Clock>,
        policy: DispatchPolicy,
    ) -> Self {
        let mut handlers = HandlerRegistry::default();
        handlers.register(OrderLookupHandler::new(snapshot.orders, prompt));
        handlers.register(RecommendationHandler::new(snapshot.catalog));
        handlers.register(EarlyRiserHandler::new(EarlyRiserPromo::default(), clock));
        Self::new(gateway, handlers, policy)
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub async fn handle_message(&mut self, text: &str) -> String {
        let intents = self.classifier.classify(&self.gateway, text).await;
        let fragments = self.handlers.run(&intents, text, &self.gateway).await;
        let decision = self.policy.decide(&intents, fragments);

        match &decision {
            DispatchDecision::Augment { fragments } => info!(
                event_name = "agent.dispatch.augment",
                fragments = fragments.len(),
                intents = ?intents.iter().map(Intent::label).collect::<Vec<_>>()
            ),
            DispatchDecision::PassThrough { reason } => info!(
                event_name = "agent.dispatch.pass_through",
                reason = reason.reason_code()
            ),
        }

        let message = self.compiler.outgoing_message(text, &decision);
        self.compiler.reply(&self.gateway, &mut self.history, message).await
    }
}
