//! Recommendation service
//!
//! Holds the process-wide context built at startup and runs the ranker for
//! each request against it.

use chrono::{Local, NaiveDate};
use std::sync::Arc;

use shared::{Location, RankedResult, Ranker, RecommendError, WeatherStore};

use crate::services::history::HistoryService;
use crate::services::model::ModelState;

/// Read-only state shared by every request
#[derive(Clone)]
pub struct AppContext {
    pub weather: Arc<WeatherStore>,
    pub model: ModelState,
    pub history: HistoryService,
    pub horizon: u32,
}

impl AppContext {
    pub fn new(
        weather: WeatherStore,
        model: ModelState,
        history: HistoryService,
        horizon: u32,
    ) -> Self {
        Self {
            weather: Arc::new(weather),
            model,
            history,
            horizon,
        }
    }
}

/// Recommends start dates against the shared context
pub struct RecommendationService {
    context: AppContext,
}

impl RecommendationService {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    /// Recommend for a location label using today's local date
    pub fn recommend(&self, location_label: &str) -> Result<RankedResult, RecommendError> {
        self.recommend_on(location_label, Local::now().date_naive())
    }

    /// Recommend for a location label as if today were `today`
    pub fn recommend_on(
        &self,
        location_label: &str,
        today: NaiveDate,
    ) -> Result<RankedResult, RecommendError> {
        // Unknown locations are rejected before the model is consulted
        let location = Location::canonicalize(location_label)
            .ok_or_else(|| RecommendError::InvalidLocation(location_label.to_string()))?;

        let model = self
            .context
            .model
            .as_ref()
            .map_err(|reason| RecommendError::ModelUnavailable(reason.clone()))?;

        let ranker = Ranker::new(&self.context.weather, model.vocabulary(), &**model);
        let ranked = ranker.rank(location, today, self.context.horizon)?;

        for skipped in &ranked.skipped {
            tracing::debug!(
                "Skipped {} start date {}: {:?}",
                location,
                skipped.start_date,
                skipped.reason
            );
        }
        tracing::info!(
            "Recommended {} for {} at {:.2} from {} candidates",
            ranked.best.start_date,
            location,
            ranked.best.predicted_price,
            ranked.all.len()
        );

        Ok(ranked)
    }
}
