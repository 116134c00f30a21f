//! Exception repository.

use crate::models::ExceptionRow;
use anyhow::Result;
use async_trait::async_trait;
use otc_recon_core::exception::{ExceptionRecord, ResolutionStatus};
use otc_recon_core::traits::ExceptionStore;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ExceptionRepository {
    pool: PgPool,
}

impl ExceptionRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExceptionStore for ExceptionRepository {
    async fn insert_exception(&self, exception: &ExceptionRecord) -> Result<()> {
        let row = ExceptionRow::from_record(exception);
        sqlx::query(
            r"
            INSERT INTO exceptions
                (exception_id, created_at, source_event, trade_id, match_score,
                 reason_codes, severity_score, severity, routing_destination,
                 priority, sla_deadline, resolution)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (exception_id) DO NOTHING
            ",
        )
        .bind(row.exception_id)
        .bind(row.created_at)
        .bind(&row.source_event)
        .bind(&row.trade_id)
        .bind(row.match_score)
        .bind(&row.reason_codes)
        .bind(row.severity_score)
        .bind(&row.severity)
        .bind(&row.routing_destination)
        .bind(row.priority)
        .bind(row.sla_deadline)
        .bind(&row.resolution)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_exception(&self, exception: &ExceptionRecord) -> Result<()> {
        let row = ExceptionRow::from_record(exception);
        sqlx::query(
            r"
            UPDATE exceptions
            SET severity_score = $2,
                severity = $3,
                routing_destination = $4,
                priority = $5,
                sla_deadline = $6,
                resolution = $7
            WHERE exception_id = $1
            ",
        )
        .bind(row.exception_id)
        .bind(row.severity_score)
        .bind(&row.severity)
        .bind(&row.routing_destination)
        .bind(row.priority)
        .bind(row.sla_deadline)
        .bind(&row.resolution)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_exception(&self, exception_id: Uuid) -> Result<Option<ExceptionRecord>> {
        let row = sqlx::query_as::<_, ExceptionRow>(
            r"
            SELECT exception_id, created_at, source_event, trade_id, match_score,
                   reason_codes, severity_score, severity, routing_destination,
                   priority, sla_deadline, resolution
            FROM exceptions
            WHERE exception_id = $1
            ",
        )
        .bind(exception_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExceptionRow::into_record).transpose()
    }

    async fn fetch_by_status(&self, status: ResolutionStatus) -> Result<Vec<ExceptionRecord>> {
        let status_text = serde_json::to_value(status)
            .ok()
            .and_then(|v| v.as_str().map(ToString::to_string))
            .unwrap_or_default();

        let rows = sqlx::query_as::<_, ExceptionRow>(
            r"
            SELECT exception_id, created_at, source_event, trade_id, match_score,
                   reason_codes, severity_score, severity, routing_destination,
                   priority, sla_deadline, resolution
            FROM exceptions
            WHERE resolution = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(status_text)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ExceptionRow::into_record).collect()
    }
}
