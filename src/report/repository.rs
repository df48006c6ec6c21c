use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::DivisionReport;
use crate::shared::AppError;

/// Persists the current report per division. Upserts replace the whole document.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn upsert_report(&self, division: &str, report: &DivisionReport)
        -> Result<(), AppError>;
    async fn get_report(&self, division: &str) -> Result<Option<DivisionReport>, AppError>;
}

#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: Arc<RwLock<HashMap<String, DivisionReport>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self {
            reports: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn upsert_report(
        &self,
        division: &str,
        report: &DivisionReport,
    ) -> Result<(), AppError> {
        let mut reports = self.reports.write().await;
        reports.insert(division.to_string(), report.clone());
        debug!(division = %division, "Stored division report in memory");
        Ok(())
    }

    async fn get_report(&self, division: &str) -> Result<Option<DivisionReport>, AppError> {
        let reports = self.reports.read().await;
        Ok(reports.get(division).cloned())
    }
}

/// PostgreSQL implementation of ReportStore backed by `division_reports`
pub struct PostgresReportStore {
    pool: PgPool,
}

impl PostgresReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PostgresReportStore {
    #[instrument(skip(self, report))]
    async fn upsert_report(
        &self,
        division: &str,
        report: &DivisionReport,
    ) -> Result<(), AppError> {
        let payload = serde_json::to_string(report)?;

        sqlx::query(
            r#"
            INSERT INTO division_reports (division, generated_at, payload)
            VALUES ($1, $2, $3)
            ON CONFLICT (division) DO UPDATE
            SET generated_at = EXCLUDED.generated_at, payload = EXCLUDED.payload
            "#,
        )
        .bind(division)
        .bind(report.generated_at)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, division = %division, "Failed to upsert division report");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_report(&self, division: &str) -> Result<Option<DivisionReport>, AppError> {
        let row = sqlx::query("SELECT payload FROM division_reports WHERE division = $1")
            .bind(division)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, division = %division, "Failed to fetch division report");
                AppError::DatabaseError(e.to_string())
            })?;

        match row {
            Some(row) => {
                let payload: String = row
                    .try_get("payload")
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?;
                Ok(Some(serde_json::from_str(&payload)?))
            }
            None => Ok(None),
        }
    }
}
