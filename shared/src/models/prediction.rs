//! Prediction results and the recommendation payload

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Location;
use crate::error::SkippedCandidate;

/// Predicted harvest price for one candidate start date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub start_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub predicted_price: f64,
}

/// Outcome of ranking a horizon of candidates
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub location: Location,
    /// Highest predicted price
    pub best: PredictionResult,
    /// Every retained candidate, highest price first
    pub all: Vec<PredictionResult>,
    pub skipped: Vec<SkippedCandidate>,
}

/// Wire shape of a successful recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub recommended_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub predicted_price: f64,
    pub all_predictions: Vec<PredictionResult>,
}

impl From<&RankedResult> for RecommendationResponse {
    fn from(ranked: &RankedResult) -> Self {
        Self {
            recommended_date: ranked.best.start_date,
            expected_harvest_date: ranked.best.harvest_date,
            predicted_price: ranked.best.predicted_price,
            all_predictions: ranked.all.clone(),
        }
    }
}
