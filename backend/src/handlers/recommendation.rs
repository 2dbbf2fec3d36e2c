//! HTTP handlers for start-date recommendations

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{Location, RecommendationResponse};
use crate::services::RecommendationService;
use crate::AppState;

/// Request body for `POST /recommend`
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendRequest {
    #[serde(default)]
    #[validate(custom = "location_label")]
    pub location: String,
}

fn location_label(label: &str) -> Result<(), ValidationError> {
    shared::validate_location_label(label).map_err(|msg| {
        let mut err = ValidationError::new("location");
        err.message = Some(msg.into());
        err
    })
}

/// Recommend the best start date for a location
pub async fn recommend(
    State(state): State<AppState>,
    current_user: Option<CurrentUser>,
    WithRejection(Json(input), _): WithRejection<Json<RecommendRequest>, AppError>,
) -> AppResult<Json<RecommendationResponse>> {
    input.validate()?;

    let service = RecommendationService::new(state.context.clone());
    let ranked = service.recommend(&input.location)?;

    if let Some(CurrentUser(identity)) = current_user {
        state
            .context
            .history
            .record_detached(identity.user_id, ranked.location, ranked.best);
    }

    Ok(Json(RecommendationResponse::from(&ranked)))
}

/// A recognized location and how much weather history backs it
#[derive(Debug, Serialize)]
pub struct LocationSummary {
    pub name: &'static str,
    pub record_count: usize,
}

/// List recognized locations
pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationSummary>> {
    let locations = Location::ALL
        .iter()
        .map(|location| LocationSummary {
            name: location.display_name(),
            record_count: state.context.weather.record_count(*location),
        })
        .collect();

    Json(locations)
}
