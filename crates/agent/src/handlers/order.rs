use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use sierra_core::OrderStore;
use tracing::{info, warn};

use super::IntentHandler;
use crate::intent::Intent;
use crate::llm::LanguageModelGateway;

pub const EMAIL_QUESTION: &str = "Please provide your email: ";
pub const ORDER_NUMBER_QUESTION: &str = "Please provide your order number: ";
pub const ORDER_NOT_FOUND: &str = "Couldn't find an order with that email and order number.";
pub const TRACKING_URL_PREFIX: &str = "https://tools.usps.com/go/TrackConfirmAction?tLabels=";

/// Source of the customer's lookup credentials. The console implementation
/// blocks on stdin; tests script the answers.
pub trait CredentialPrompt: Send + Sync {
    fn ask(&self, question: &str) -> io::Result<String>;
}

pub struct OrderLookupHandler {
    orders: OrderStore,
    prompt: Arc<dyn CredentialPrompt>,
}

impl OrderLookupHandler {
    pub fn new(orders: OrderStore, prompt: Arc<dyn CredentialPrompt>) -> Self {
        Self { orders, prompt }
    }

    pub fn lookup(&self, email: &str, order_number: &str) -> String {
        match self.orders.find(email, order_number) {
            Some(order) => format!(
                "Order {order_number} is {}. Tracking link: {TRACKING_URL_PREFIX}{}",
                order.status, order.tracking_number
            ),
            None => ORDER_NOT_FOUND.to_string(),
        }
    }

    fn ask(&self, question: &str) -> String {
        self.prompt.ask(question).unwrap_or_else(|error| {
            warn!(event_name = "agent.order.prompt_failed", error = %error);
            String::new()
        })
    }
}

#[async_trait]
impl IntentHandler for OrderLookupHandler {
    fn intent(&self) -> Intent {
        Intent::Order
    }

    async fn handle(&self, _query: &str, _gateway: &LanguageModelGateway) -> String {
        let email = self.ask(EMAIL_QUESTION);
        let order_number = self.ask(ORDER_NUMBER_QUESTION);
        let fragment = self.lookup(&email, &order_number);
        info!(
            event_name = "agent.order.lookup",
            found = fragment != ORDER_NOT_FOUND,
            order_number = %order_number
        );
        fragment
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sierra_core::{Order, OrderStore};

    use super::{OrderLookupHandler, EMAIL_QUESTION, ORDER_NOT_FOUND, ORDER_NUMBER_QUESTION};
    use crate::handlers::IntentHandler;
    use crate::llm::LanguageModelGateway;
    use crate::test_support::{ScriptedLlm, ScriptedPrompt};

    fn orders() -> OrderStore {
        OrderStore::new(vec![Order {
            email: "john.doe@example.com".to_string(),
            order_number: "#W001".to_string(),
            status: "in-transit".to_string(),
            tracking_number: "TRK123456789".to_string(),
        }])
    }

    fn handler(answers: [&str; 2]) -> (OrderLookupHandler, Arc<ScriptedPrompt>) {
        let prompt = Arc::new(ScriptedPrompt::new(answers));
        (OrderLookupHandler::new(orders(), prompt.clone()), prompt)
    }

    #[tokio::test]
    async fn matching_order_reports_status_and_tracking_link() {
        let (handler, prompt) = handler(["john.doe@example.com", "#W001"]);
        let llm = Arc::new(ScriptedLlm::failing());
        let gateway = LanguageModelGateway::new(llm.clone());

        let fragment = handler.handle("where is my order?", &gateway).await;

        assert_eq!(
            fragment,
            "Order #W001 is in-transit. Tracking link: https://tools.usps.com/go/TrackConfirmAction?tLabels=TRK123456789"
        );
        assert_eq!(prompt.questions(), vec![EMAIL_QUESTION.to_string(), ORDER_NUMBER_QUESTION.to_string()]);
        assert!(llm.calls().is_empty(), "order lookup never calls the model");
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let (handler, _) = handler(["", ""]);

        for (email, order_number) in [
            ("John.Doe@example.com", "#W001"),
            ("john.doe@example.com", "#w001"),
            ("john.doe@example.com ", "#W001"),
            ("john.doe@example.com", "W001"),
            ("jane@example.com", "#W001"),
        ] {
            assert_eq!(handler.lookup(email, order_number), ORDER_NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn prompt_failure_is_treated_as_a_miss() {
        let prompt = Arc::new(ScriptedPrompt::default());
        let handler = OrderLookupHandler::new(orders(), prompt);
        let gateway = LanguageModelGateway::new(Arc::new(ScriptedLlm::failing()));

        assert_eq!(handler.handle("order?", &gateway).await, ORDER_NOT_FOUND);
    }
}
