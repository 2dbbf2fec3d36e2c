//! Weather data models

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Location;

/// One day of historical weather at a location
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherRecord {
    date: NaiveDate,
    month: u32,
    day: u32,
    /// Daily mean temperature at 2 m (°C)
    pub temperature_mean: f64,
    /// Relative humidity at 2 m (%)
    pub relative_humidity: f64,
    /// Corrected total precipitation (mm/day)
    pub precipitation: f64,
    pub location: Location,
}

impl WeatherRecord {
    /// Build a record; month and day always come from `date`
    pub fn new(
        location: Location,
        date: NaiveDate,
        temperature_mean: f64,
        relative_humidity: f64,
        precipitation: f64,
    ) -> Self {
        Self {
            date,
            month: date.month(),
            day: date.day(),
            temperature_mean,
            relative_humidity,
            precipitation,
            location,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Calendar day key used for same-day lookups across years
    pub fn calendar_day(&self) -> (u32, u32) {
        (self.month, self.day)
    }
}

/// Climate statistics for one candidate growth window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClimateStats {
    /// Mean of the per-day mean temperatures
    pub avg_temp: f64,
    /// Highest per-day mean temperature
    pub max_temp: f64,
    /// Mean of the per-day mean humidities
    pub avg_humidity: f64,
    /// Sum of the per-day mean rainfall over the window
    pub rainfall: f64,
}

impl ClimateStats {
    pub fn is_finite(&self) -> bool {
        self.avg_temp.is_finite()
            && self.max_temp.is_finite()
            && self.avg_humidity.is_finite()
            && self.rainfall.is_finite()
    }
}
