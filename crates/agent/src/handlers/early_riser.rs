use std::sync::Arc;

use async_trait::async_trait;
use sierra_core::{Clock, EarlyRiserPromo, PromoOutcome};
use tracing::info;

use super::IntentHandler;
use crate::intent::Intent;
use crate::llm::LanguageModelGateway;

pub struct EarlyRiserHandler {
    promo: EarlyRiserPromo,
    clock: Arc<dyn Clock>,
}

impl EarlyRiserHandler {
    pub fn new(promo: EarlyRiserPromo, clock: Arc<dyn Clock>) -> Self {
        Self { promo, clock }
    }
}

#[async_trait]
impl IntentHandler for EarlyRiserHandler {
    fn intent(&self) -> Intent {
        Intent::EarlyRiser
    }

    async fn handle(&self, _query: &str, _gateway: &LanguageModelGateway) -> String {
        let outcome = self.promo.evaluate(self.clock.now());
        info!(
            event_name = "agent.promo.evaluated",
            qualified = matches!(outcome, PromoOutcome::Qualified { .. })
        );
        outcome.message()
    }
}
