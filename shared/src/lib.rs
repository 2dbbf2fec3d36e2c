//! Shared types and the recommendation core for the Cocoon Price Advisor
//!
//! This crate contains the pure part of the system: weather history indexing,
//! climatology aggregation, feature encoding, the price model contract and
//! the start-date ranker. It is used by the backend server and, through WASM,
//! by the web dashboard.

pub mod climatology;
pub mod error;
pub mod models;
pub mod predictor;
pub mod ranking;
pub mod types;
pub mod validation;
pub mod vocabulary;

pub use climatology::*;
pub use error::*;
pub use models::*;
pub use predictor::*;
pub use ranking::*;
pub use types::*;
pub use validation::*;
pub use vocabulary::*;
