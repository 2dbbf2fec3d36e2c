//! HTTP handlers for the Cocoon Price Advisor API

pub mod health;
pub mod history;
pub mod recommendation;

pub use health::health_check;
pub use history::list_history;
pub use recommendation::{list_locations, recommend};
