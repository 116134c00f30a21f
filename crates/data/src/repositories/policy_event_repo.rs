//! Policy reward-event repository (append-only).

use crate::models::PolicyEventRow;
use anyhow::Result;
use async_trait::async_trait;
use otc_recon_core::events::RewardEvent;
use otc_recon_core::traits::PolicyEventStore;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct PolicyEventRepository {
    pool: PgPool,
}

impl PolicyEventRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PolicyEventStore for PolicyEventRepository {
    async fn append_reward(&self, event: &RewardEvent) -> Result<()> {
        let row = PolicyEventRow::from_event(event);
        sqlx::query(
            r"
            INSERT INTO policy_events
                (exception_id, reason_codes, routed_to, actual_destination,
                 within_sla, reward, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(row.exception_id)
        .bind(&row.reason_codes)
        .bind(&row.routed_to)
        .bind(&row.actual_destination)
        .bind(row.within_sla)
        .bind(row.reward)
        .bind(row.occurred_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_rewards(&self) -> Result<Vec<RewardEvent>> {
        let rows = sqlx::query_as::<_, PolicyEventRow>(
            r"
            SELECT id, exception_id, reason_codes, routed_to, actual_destination,
                   within_sla, reward, occurred_at
            FROM policy_events
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PolicyEventRow::into_event).collect()
    }
}
