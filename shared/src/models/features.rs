//! Model input features
//!
//! The price model was fitted on a fixed column order. `FeatureVector` keeps
//! its fields private and only exports values through [`FeatureVector::to_array`],
//! so the order lives in exactly one place.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{season_of, ClimateStats, Location};
use crate::error::RecommendError;
use crate::types::harvest_date_for;
use crate::vocabulary::CategoryVocabulary;

/// Number of model input columns
pub const FEATURE_COUNT: usize = 7;

/// Column names, in the order the model expects them
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "city",
    "month",
    "season",
    "avg_temp",
    "max_temp",
    "avg_humidity",
    "rainfall",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    location_code: u32,
    feature_month: u32,
    season_code: u32,
    avg_temp: f64,
    max_temp: f64,
    avg_humidity: f64,
    rainfall: f64,
}

impl FeatureVector {
    /// `feature_month` is the month of the HARVEST date; `season_code` encodes
    /// the season of the START date.
    pub fn new(
        location_code: u32,
        feature_month: u32,
        season_code: u32,
        stats: &ClimateStats,
    ) -> Self {
        Self {
            location_code,
            feature_month,
            season_code,
            avg_temp: stats.avg_temp,
            max_temp: stats.max_temp,
            avg_humidity: stats.avg_humidity,
            rainfall: stats.rainfall,
        }
    }

    pub fn location_code(&self) -> u32 {
        self.location_code
    }

    pub fn feature_month(&self) -> u32 {
        self.feature_month
    }

    pub fn season_code(&self) -> u32 {
        self.season_code
    }

    pub fn climate(&self) -> ClimateStats {
        ClimateStats {
            avg_temp: self.avg_temp,
            max_temp: self.max_temp,
            avg_humidity: self.avg_humidity,
            rainfall: self.rainfall,
        }
    }

    /// Values in [`FEATURE_COLUMNS`] order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.location_code),
            f64::from(self.feature_month),
            f64::from(self.season_code),
            self.avg_temp,
            self.max_temp,
            self.avg_humidity,
            self.rainfall,
        ]
    }
}

/// Build the model input for a cycle at `location` starting on `start_date`
pub fn build_features(
    vocabulary: &CategoryVocabulary,
    location: Location,
    start_date: NaiveDate,
    stats: &ClimateStats,
) -> Result<FeatureVector, RecommendError> {
    if !stats.is_finite() {
        return Err(RecommendError::EncodingError(format!(
            "non-finite climate statistics for {} starting {}",
            location, start_date
        )));
    }

    let harvest_date = harvest_date_for(start_date).ok_or_else(|| {
        RecommendError::EncodingError(format!("no harvest date for start {}", start_date))
    })?;

    let location_code = vocabulary.encode_location(location)?;
    let season_code = vocabulary.encode_season(season_of(start_date.month()))?;

    Ok(FeatureVector::new(
        location_code,
        harvest_date.month(),
        season_code,
        stats,
    ))
}
