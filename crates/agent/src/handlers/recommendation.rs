use async_trait::async_trait;
use sierra_core::Catalog;
use tracing::info;

use super::IntentHandler;
use crate::intent::Intent;
use crate::llm::LanguageModelGateway;

pub const MAX_SUGGESTED_TAGS: usize = 8;
pub const SELECTION_TEMPERATURE: f32 = 0.0;
pub const NO_MATCH_FALLBACK: &str = "Product Status: Couldn't find anything that matches. Ask the user to describe what they're looking for in a bit more detail.";

/// Two model calls: narrow the tag vocabulary, then pick one product among
/// everything filed under the surviving tags.
pub struct RecommendationHandler {
    catalog: Catalog,
}

impl RecommendationHandler {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn tag_selection_prompt(&self, query: &str) -> String {
        let tag_csv = self.catalog.tags().collect::<Vec<_>>().join(", ");
        format!(
            "You are an assistant helping customers find gear.\n\
             Available product tags are: {tag_csv}.\n\
             User said: '{query}'\n\
             Choose up to {MAX_SUGGESTED_TAGS} relevant tags from the list based on the user's request. \
             Respond with only the chosen tags, as a comma-separated list."
        )
    }

    /// Keeps the model's tags that exist in the index, in the order returned.
    pub fn valid_tags<'a>(&self, response: &'a str) -> Vec<&'a str> {
        response.split(',').map(str::trim).filter(|tag| self.catalog.contains_tag(tag)).collect()
    }

    pub fn product_selection_prompt(&self, query: &str, summary: &str) -> String {
        format!(
            "You are an assistant helping customers find gear.\n\
             User said: '{query}'\n\
             Available products:\n{summary}\n\
             Choose ONE of the products that best matches the user's request.\n\
             Response format:\n\
             Recommended Purchase for Customer: Product Name - Product Description\n\
             If nothing relevant is available, return the following text: {NO_MATCH_FALLBACK}"
        )
    }
}

#[async_trait]
impl IntentHandler for RecommendationHandler {
    fn intent(&self) -> Intent {
        Intent::Recommendation
    }

    async fn handle(&self, query: &str, gateway: &LanguageModelGateway) -> String {
        let tag_response =
            gateway.call(&self.tag_selection_prompt(query), SELECTION_TEMPERATURE).await;
        let tags = self.valid_tags(&tag_response);
        let matched = self.catalog.products_for_tags(tags.iter().copied());
        info!(
            event_name = "agent.recommendation.matched",
            tags = ?tags,
            candidates = matched.len()
        );

        if matched.is_empty() {
            return NO_MATCH_FALLBACK.to_string();
        }

        let summary =
            matched.iter().map(|product| product.summary_line()).collect::<Vec<_>>().join("\n");
        gateway.call(&self.product_selection_prompt(query, &summary), SELECTION_TEMPERATURE).await
    }
}
