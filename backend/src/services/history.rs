//! Recommendation history
//!
//! History is a sink that runs after a successful recommendation. Nothing it
//! does can fail the request that produced the entry, and the whole service
//! is disabled when no database is configured.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tokio::task::JoinHandle;
use uuid::Uuid;

use shared::{Location, PredictionResult};

use crate::error::AppResult;

/// Most entries returned by one history listing
pub const HISTORY_LIST_LIMIT: i64 = 100;

/// One stored recommendation
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub predicted_price: f64,
    pub created_at: DateTime<Utc>,
}

/// History service backed by the `recommendations` table
#[derive(Clone)]
pub struct HistoryService {
    db: Option<PgPool>,
}

impl HistoryService {
    pub fn new(db: Option<PgPool>) -> Self {
        Self { db }
    }

    /// A service that stores nothing
    pub fn disabled() -> Self {
        Self { db: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.db.is_some()
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.db.as_ref()
    }

    /// Store the recommended candidate for a user
    pub async fn record(
        &self,
        user_id: &str,
        location: Location,
        best: &PredictionResult,
    ) -> AppResult<()> {
        let Some(db) = &self.db else {
            tracing::debug!("History disabled, not recording recommendation for {}", user_id);
            return Ok(());
        };

        sqlx::query(
            r#"
            INSERT INTO recommendations (id, user_id, location, start_date, harvest_date, predicted_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(location.display_name())
        .bind(best.start_date)
        .bind(best.harvest_date)
        .bind(best.predicted_price)
        .execute(db)
        .await?;

        Ok(())
    }

    /// Record on a detached task; failures are logged and dropped.
    ///
    /// Returns the task handle, or `None` when history is disabled.
    pub fn record_detached(
        &self,
        user_id: String,
        location: Location,
        best: PredictionResult,
    ) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            tracing::debug!("History disabled, not recording recommendation for {}", user_id);
            return None;
        }

        let service = self.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = service.record(&user_id, location, &best).await {
                tracing::warn!("Failed to record recommendation history for {}: {}", user_id, e);
            }
        }))
    }

    /// Entries for a user, newest first
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<HistoryEntry>> {
        let Some(db) = &self.db else {
            return Ok(Vec::new());
        };

        let entries = sqlx::query_as::<_, HistoryEntry>(
            r#"
            SELECT id, user_id, location, start_date, harvest_date, predicted_price, created_at
            FROM recommendations
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(HISTORY_LIST_LIMIT)
        .fetch_all(db)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;

    use crate::error::AppError;

    /// A pool whose connections can never be established
    fn unreachable_history() -> HistoryService {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://cpa@127.0.0.1:1/cocoon_advisor")
            .unwrap();
        HistoryService::new(Some(pool))
    }

    fn prediction() -> PredictionResult {
        PredictionResult {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            harvest_date: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
            predicted_price: 561.5,
        }
    }

    #[tokio::test]
    async fn test_disabled_history_records_nothing() {
        let service = HistoryService::disabled();
        assert!(!service.is_enabled());

        service
            .record("farmer-1", Location::Bengaluru, &prediction())
            .await
            .unwrap();
        assert!(service.list("farmer-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detached_record_is_noop_when_disabled() {
        let handle = HistoryService::disabled().record_detached(
            "farmer-1".to_string(),
            Location::Ramanagara,
            prediction(),
        );
        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_failed_insert_surfaces_from_record() {
        let service = unreachable_history();
        assert!(service.is_enabled());

        let result = service
            .record("farmer-1", Location::Bengaluru, &prediction())
            .await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_detached_record_swallows_failed_insert() {
        let handle = unreachable_history()
            .record_detached("farmer-1".to_string(), Location::Bengaluru, prediction())
            .expect("history is enabled");

        // The task finishes without panicking even though the insert failed
        assert!(handle.await.is_ok());
    }
}
