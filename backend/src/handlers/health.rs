//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: ModelHealth,
    pub locations: Vec<&'static str>,
    pub database: String,
}

#[derive(Serialize)]
pub struct ModelHealth {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let context = &state.context;

    // Check database connectivity
    let db_status = match context.history.pool() {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => "connected",
            Err(_) => "disconnected",
        },
        None => "disabled",
    };

    let model = match &context.model {
        Ok(model) => ModelHealth {
            available: true,
            revision: Some(model.revision().to_string()),
            reason: None,
        },
        Err(reason) => ModelHealth {
            available: false,
            revision: None,
            reason: Some(reason.clone()),
        },
    };

    let status = if model.available && !context.weather.is_empty() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model,
        locations: context
            .weather
            .locations()
            .into_iter()
            .map(|l| l.display_name())
            .collect(),
        database: db_status.to_string(),
    })
}
