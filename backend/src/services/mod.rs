//! Services behind the Cocoon Price Advisor handlers

pub mod history;
pub mod model;
pub mod recommendation;
pub mod weather;

pub use history::HistoryService;
pub use recommendation::{AppContext, RecommendationService};
pub use weather::WeatherHistoryLoader;
