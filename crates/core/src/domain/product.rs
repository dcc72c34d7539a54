use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Product {
    #[serde(rename = "ProductName")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Tags")]
    pub tags: Vec<String>,
}

impl Product {
    /// Single line used when listing candidates to the model.
    pub fn summary_line(&self) -> String {
        format!("{} — {}", self.name, self.description)
    }
}

pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase()
}
