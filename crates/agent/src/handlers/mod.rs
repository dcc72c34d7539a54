pub mod early_riser;
pub mod order;
pub mod recommendation;

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tracing::info;

use crate::intent::Intent;
use crate::llm::LanguageModelGateway;

pub use early_riser::EarlyRiserHandler;
pub use order::{CredentialPrompt, OrderLookupHandler};
pub use recommendation::RecommendationHandler;

#[async_trait]
pub trait IntentHandler: Send + Sync {
    fn intent(&self) -> Intent;
    async fn handle(&self, query: &str, gateway: &LanguageModelGateway) -> String;
}

/// Handlers keyed by the intent they serve. Iteration follows [`Intent`]
/// ordering, so fragments always come out as order, recommendation,
/// early_riser regardless of how the model listed the labels.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<Intent, Box<dyn IntentHandler>>,
}

impl HandlerRegistry {
    pub fn register<T>(&mut self, handler: T)
    where
        T: IntentHandler + 'static,
    {
        self.handlers.insert(handler.intent(), Box::new(handler));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every registered handler whose intent was detected.
    pub async fn run(
        &self,
        intents: &BTreeSet<Intent>,
        query: &str,
        gateway: &LanguageModelGateway,
    ) -> Vec<String> {
        let mut fragments = Vec::new();
        for (intent, handler) in &self.handlers {
            if !intents.contains(intent) {
                continue;
            }
            info!(event_name = "agent.handler.run", intent = intent.label());
            fragments.push(handler.handle(query, gateway).await);
        }
        fragments
    }
}
