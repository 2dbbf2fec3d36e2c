//! Common types and constants used across the platform

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of one rearing cycle, from start date to harvest date
pub const CYCLE_DAYS: u64 = 25;

/// Number of calendar days averaged for one candidate
pub const WINDOW_DAYS: u32 = 25;

/// Number of forward-looking start dates evaluated per request
pub const DEFAULT_HORIZON: u32 = 10;

/// Upper bound accepted for a configured horizon
pub const MAX_HORIZON: u32 = 60;

/// Harvest date for a cycle started on `start_date`
///
/// Returns `None` only when the date falls outside chrono's calendar range.
pub fn harvest_date_for(start_date: NaiveDate) -> Option<NaiveDate> {
    start_date.checked_add_days(Days::new(CYCLE_DAYS))
}

/// Consecutive calendar days whose historical weather describes one cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClimatologyWindow {
    pub start: NaiveDate,
    pub days: u32,
}

impl ClimatologyWindow {
    pub fn new(start: NaiveDate, days: u32) -> Self {
        Self { start, days }
    }

    /// The standard 25-day window starting at `start`
    pub fn for_cycle(start: NaiveDate) -> Self {
        Self::new(start, WINDOW_DAYS)
    }

    /// Dates in the window, `start` first. Dates past chrono's range are cut off.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.days).map_while(move |offset| self.start.checked_add_days(Days::new(offset as u64)))
    }

    /// Last day included in the window
    pub fn last_day(&self) -> Option<NaiveDate> {
        match self.days {
            0 => None,
            n => self.start.checked_add_days(Days::new(n as u64 - 1)),
        }
    }
}
