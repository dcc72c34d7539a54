use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::llm::LanguageModelGateway;

pub const CLASSIFIER_TEMPERATURE: f32 = 0.0;

/// Closed intent taxonomy. Declaration order is the fixed handler priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Intent {
    Order,
    Recommendation,
    EarlyRiser,
    General,
}

impl Intent {
    pub const ALL: [Intent; 4] =
        [Intent::Order, Intent::Recommendation, Intent::EarlyRiser, Intent::General];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Recommendation => "recommendation",
            Self::EarlyRiser => "early_riser",
            Self::General => "general",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|intent| intent.label() == label)
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Order => {
                "The user is asking about the status of a specific order they have already placed. \
                 This includes questions about tracking, shipping, delivery dates, or order numbers."
            }
            Self::Recommendation => {
                "The user is asking what to buy, looking for gear suggestions, or requesting \
                 something similar to a product or need (e.g. 'any good hiking backpacks?')."
            }
            Self::EarlyRiser => {
                "The user is asking for a discount, promotional code, or any deal. \
                 This includes general questions about promotions or requests for discounts."
            }
            Self::General => {
                "The message doesn't fit the above — e.g. general conversation, brand questions, greetings, etc."
            }
        }
    }
}

/// Parses a comma-separated label list. Tokens outside the taxonomy are
/// dropped rather than treated as errors.
pub fn parse_intents(response: &str) -> BTreeSet<Intent> {
    let mut intents = BTreeSet::new();
    for token in response.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        match Intent::from_label(token) {
            Some(intent) => {
                intents.insert(intent);
            }
            None => debug!(event_name = "agent.intent.unknown_label", label = token),
        }
    }
    intents
}

#[derive(Clone, Debug, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn prompt(&self, user_input: &str) -> String {
        let categories = Intent::ALL
            .iter()
            .map(|intent| format!("- {}: {}", intent.label(), intent.description()))
            .collect::<Vec<_>>()
            .join("\n");
        let labels = Intent::ALL.iter().map(Intent::label).collect::<Vec<_>>().join(", ");

        format!(
            "Classify the user's message into one or more of the following intent categories:\n\n\
             {categories}\n\n\
             User message: '{user_input}'\n\n\
             Respond with a comma-separated list of one or more intents from the list above. \
             Use only the exact labels: {labels}."
        )
    }

    pub async fn classify(
        &self,
        gateway: &LanguageModelGateway,
        user_input: &str,
    ) -> BTreeSet<Intent> {
        let response = gateway.call(&self.prompt(user_input), CLASSIFIER_TEMPERATURE).await;
        let intents = parse_intents(&response);
        info!(
            event_name = "agent.intent.classified",
            intents = ?intents.iter().map(Intent::label).collect::<Vec<_>>(),
            "message classified"
        );
        intents
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use super::{parse_intents, Intent, IntentClassifier};
    use crate::llm::LanguageModelGateway;
    use crate::test_support::ScriptedLlm;

    #[test]
    fn parse_trims_and_drops_empty_tokens() {
        let intents = parse_intents(" recommendation ,, order ,");
        assert_eq!(intents, BTreeSet::from([Intent::Order, Intent::Recommendation]));
    }

    #[test]
    fn parse_ignores_labels_outside_the_taxonomy() {
        assert!(parse_intents("shipping, Order, refund").is_empty());
        assert_eq!(parse_intents("early_riser, bogus"), BTreeSet::from([Intent::EarlyRiser]));
    }

    #[test]
    fn intents_iterate_in_handler_priority_order() {
        let intents = parse_intents("general, early_riser, recommendation, order");
        assert_eq!(intents.into_iter().collect::<Vec<_>>(), Intent::ALL.to_vec());
    }

    #[test]
    fn prompt_embeds_message_and_every_label() {
        let prompt = IntentClassifier::new().prompt("where is my tent?");

        assert!(prompt.contains("User message: 'where is my tent?'"));
        for intent in Intent::ALL {
            assert!(prompt.contains(&format!("- {}:", intent.label())));
        }
        assert!(prompt.ends_with("Use only the exact labels: order, recommendation, early_riser, general."));
    }

    #[tokio::test]
    async fn classify_uses_zero_temperature() {
        let llm = Arc::new(ScriptedLlm::new(["order, early_riser"]));
        let gateway = LanguageModelGateway::new(llm.clone());

        let intents = IntentClassifier::new().classify(&gateway, "any deals on my order?").await;

        assert_eq!(intents, BTreeSet::from([Intent::Order, Intent::EarlyRiser]));
        assert_eq!(llm.calls()[0].temperature, 0.0);
    }

    #[tokio::test]
    async fn provider_outage_yields_no_intents() {
        let gateway = LanguageModelGateway::new(Arc::new(ScriptedLlm::failing()));
        assert!(IntentClassifier::new().classify(&gateway, "hello").await.is_empty());
    }
}
