//! Recognized farm locations and their spellings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Revision of the spelling and training-label tables below.
/// Bump together with the model artifact whenever either table changes.
pub const VOCABULARY_REVISION: &str = "2024-03-notebook";

/// A location the advisor has weather history and a model code for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Bengaluru,
    Ramanagara,
    Shidlaghatta,
}

/// Every spelling accepted from users, mapped to its location.
/// Matching is exact after trimming surrounding whitespace.
pub const LOCATION_SPELLINGS: &[(&str, Location)] = &[
    ("Bengaluru", Location::Bengaluru),
    ("Ramanagara", Location::Ramanagara),
    ("Ramanagar", Location::Ramanagara),
    ("Shidlaghatta", Location::Shidlaghatta),
    ("Siddlaghatta", Location::Shidlaghatta),
];

/// Label each location carried in the training data set
pub const TRAINING_LABELS: &[(Location, &str)] = &[
    (Location::Bengaluru, "Bengaluru"),
    (Location::Ramanagara, "Ramanagar"),
    (Location::Shidlaghatta, "Siddlaghatta"),
];

impl Location {
    pub const ALL: [Location; 3] = [
        Location::Bengaluru,
        Location::Ramanagara,
        Location::Shidlaghatta,
    ];

    /// Resolve a user-facing spelling to a location
    pub fn canonicalize(label: &str) -> Option<Location> {
        let label = label.trim();
        LOCATION_SPELLINGS
            .iter()
            .find(|(spelling, _)| *spelling == label)
            .map(|(_, location)| *location)
    }

    /// Name shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Location::Bengaluru => "Bengaluru",
            Location::Ramanagara => "Ramanagara",
            Location::Shidlaghatta => "Shidlaghatta",
        }
    }

    /// Name the model was trained with
    pub fn training_label(&self) -> &'static str {
        TRAINING_LABELS
            .iter()
            .find(|(location, _)| location == self)
            .map(|(_, label)| *label)
            .unwrap_or_else(|| self.display_name())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
