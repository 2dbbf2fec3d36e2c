//! Start-date ranking over a forward horizon

use chrono::{Days, NaiveDate};

use crate::climatology::{aggregate, WeatherStore};
use crate::error::{RecommendError, SkipReason, SkippedCandidate};
use crate::models::{build_features, Location, PredictionResult, RankedResult};
use crate::predictor::PricePredictor;
use crate::types::{harvest_date_for, MAX_HORIZON, WINDOW_DAYS};
use crate::vocabulary::CategoryVocabulary;

/// Ranks candidate start dates by predicted harvest price.
///
/// Borrows the process-wide weather history, vocabulary and predictor; it
/// holds no state of its own.
pub struct Ranker<'a, P: PricePredictor + ?Sized> {
    weather: &'a WeatherStore,
    vocabulary: &'a CategoryVocabulary,
    predictor: &'a P,
    window_days: u32,
}

impl<'a, P: PricePredictor + ?Sized> Ranker<'a, P> {
    pub fn new(
        weather: &'a WeatherStore,
        vocabulary: &'a CategoryVocabulary,
        predictor: &'a P,
    ) -> Self {
        Self {
            weather,
            vocabulary,
            predictor,
            window_days: WINDOW_DAYS,
        }
    }

    /// Rank start dates `today + 1 ..= today + horizon` for a location label
    pub fn recommend(
        &self,
        location_label: &str,
        today: NaiveDate,
        horizon: u32,
    ) -> Result<RankedResult, RecommendError> {
        let location = Location::canonicalize(location_label)
            .ok_or_else(|| RecommendError::InvalidLocation(location_label.to_string()))?;

        self.rank(location, today, horizon)
    }

    pub fn rank(
        &self,
        location: Location,
        today: NaiveDate,
        horizon: u32,
    ) -> Result<RankedResult, RecommendError> {
        let no_candidates = || RecommendError::NoViableCandidates {
            location: location.to_string(),
            horizon,
        };
        if !self.weather.has_location(location) {
            return Err(no_candidates());
        }

        // Horizon is unbounded here, so only preallocate for the usual range
        let mut all = Vec::with_capacity(horizon.min(MAX_HORIZON) as usize);
        let mut skipped = Vec::new();

        for offset in 1..=horizon {
            let Some(start_date) = today.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };

            match self.evaluate(location, start_date)? {
                Ok(prediction) => all.push(prediction),
                Err(reason) => skipped.push(SkippedCandidate { start_date, reason }),
            }
        }

        // Stable sort keeps chronological order among equal prices
        all.sort_by(|a, b| b.predicted_price.total_cmp(&a.predicted_price));

        let best = all.first().copied().ok_or_else(no_candidates)?;

        Ok(RankedResult {
            location,
            best,
            all,
            skipped,
        })
    }

    /// Predict one candidate. The outer error aborts the request, the inner
    /// one only drops this candidate.
    pub fn evaluate(
        &self,
        location: Location,
        start_date: NaiveDate,
    ) -> Result<Result<PredictionResult, SkipReason>, RecommendError> {
        let Some(stats) = aggregate(self.weather, location, start_date, self.window_days) else {
            return Ok(Err(SkipReason::NoClimateData));
        };
        let Some(harvest_date) = harvest_date_for(start_date) else {
            return Ok(Err(SkipReason::DateOutOfRange));
        };

        let features = build_features(self.vocabulary, location, start_date, &stats)?;
        let predicted_price = self.predictor.predict(&features);
        if !predicted_price.is_finite() {
            return Ok(Err(SkipReason::NonFinitePrice));
        }

        Ok(Ok(PredictionResult {
            start_date,
            harvest_date,
            predicted_price,
        }))
    }
}
