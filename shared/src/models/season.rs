//! Seasons of the Karnataka calendar used as a model feature

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Monsoon,
    PostMonsoon,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Summer,
        Season::Monsoon,
        Season::PostMonsoon,
        Season::Winter,
    ];

    /// Label used by the model vocabulary
    pub fn label(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
            Season::PostMonsoon => "PostMonsoon",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Season a month belongs to. Anything outside 3..=11 is Winter.
pub fn season_of(month: u32) -> Season {
    match month {
        3..=5 => Season::Summer,
        6..=9 => Season::Monsoon,
        10..=11 => Season::PostMonsoon,
        _ => Season::Winter,
    }
}
