//! HTTP handlers for recommendation history

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::HistoryEntry;
use crate::AppState;

/// List the caller's past recommendations, newest first
pub async fn list_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = state.context.history.list(&current_user.0.user_id).await?;
    Ok(Json(entries))
}
