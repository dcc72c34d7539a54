use crate::domain::order::Order;

/// Read-only snapshot of customer orders, searched by linear scan.
#[derive(Clone, Debug, Default)]
pub struct OrderStore {
    orders: Vec<Order>,
}

impl OrderStore {
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn find(&self, email: &str, order_number: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.matches(email, order_number))
    }
}
