//! Match result repository.
//!
//! Results are insert-only: a re-match writes a new row, never an update.

use crate::models::MatchResultRow;
use anyhow::Result;
use otc_recon_matching::MatchResult;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct MatchResultRepository {
    pool: PgPool,
}

impl MatchResultRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts one match result and returns its generated id.
    ///
    /// # Errors
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, result: &MatchResult) -> Result<i32> {
        let row = MatchResultRow::from_result(result);
        let inserted: (i32,) = sqlx::query_as(
            r"
            INSERT INTO match_results
                (bank_trade_id, counterparty_trade_id, classification, match_score,
                 decision, reason_codes, differences, evaluated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(&row.bank_trade_id)
        .bind(&row.counterparty_trade_id)
        .bind(&row.classification)
        .bind(row.match_score)
        .bind(&row.decision)
        .bind(&row.reason_codes)
        .bind(&row.differences)
        .bind(row.evaluated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted.0)
    }

    /// Fetches the most recently evaluated results.
    ///
    /// # Errors
    /// Returns an error if the database query fails or a stored row is
    /// malformed.
    pub async fn fetch_latest(&self, limit: i64) -> Result<Vec<MatchResult>> {
        let rows = sqlx::query_as::<_, MatchResultRow>(
            r"
            SELECT id, bank_trade_id, counterparty_trade_id, classification,
                   match_score, decision, reason_codes, differences, evaluated_at
            FROM match_results
            ORDER BY evaluated_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MatchResultRow::into_result).collect()
    }
}
