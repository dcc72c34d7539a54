use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Order {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "OrderNumber")]
    pub order_number: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "TrackingNumber")]
    pub tracking_number: String,
}

impl Order {
    /// Exact comparison on the (email, order number) identity. No case folding.
    pub fn matches(&self, email: &str, order_number: &str) -> bool {
        self.email == email && self.order_number == order_number
    }
}
