//! Domain models for the Cocoon Price Advisor

mod features;
mod location;
mod prediction;
mod season;
mod weather;

pub use features::*;
pub use location::*;
pub use prediction::*;
pub use season::*;
pub use weather::*;
