pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod loader;
pub mod orders;
pub mod promo;

pub use catalog::Catalog;
pub use domain::conversation::{ConversationHistory, ConversationTurn, Role};
pub use domain::order::Order;
pub use domain::product::Product;
pub use errors::ApplicationError;
pub use loader::{LoadError, StoreSnapshot};
pub use orders::OrderStore;
pub use promo::{Clock, EarlyRiserPromo, PromoOutcome, SystemClock};
