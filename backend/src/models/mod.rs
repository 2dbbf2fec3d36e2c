//! Data models served by the Cocoon Price Advisor backend
//!
//! Re-exports the wire models from the shared crate and adds the history row

pub use crate::services::history::HistoryEntry;
pub use shared::models::{Location, RecommendationResponse};
