//! Source-partitioned trade repository.
//!
//! The two tables are the physical form of the source partitions: fetching
//! returns whatever the table holds, including records whose own source tag
//! disagrees with the partition. Detecting that disagreement is the
//! integrity checker's job, not the repository's.

use crate::models::TradeRow;
use anyhow::Result;
use async_trait::async_trait;
use otc_recon_core::record::{CanonicalTradeRecord, TradeSource};
use otc_recon_core::traits::RecordStore;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct TradeRepository {
    pool: PgPool,
}

impl TradeRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    const fn table(partition: TradeSource) -> &'static str {
        match partition {
            TradeSource::Bank => "bank_trades",
            TradeSource::Counterparty => "counterparty_trades",
        }
    }
}

#[async_trait]
impl RecordStore for TradeRepository {
    async fn insert_record(
        &self,
        partition: TradeSource,
        record: &CanonicalTradeRecord,
    ) -> Result<()> {
        let row = TradeRow::from_record(record);
        let query = format!(
            r"
            INSERT INTO {} (trade_id, source, trade_date, effective_date, maturity_date,
                            notional, currency, counterparty_name, fixed_price,
                            product_type, commodity_type, attributes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (trade_id) DO NOTHING
            ",
            Self::table(partition)
        );

        sqlx::query(&query)
            .bind(&row.trade_id)
            .bind(&row.source)
            .bind(row.trade_date)
            .bind(row.effective_date)
            .bind(row.maturity_date)
            .bind(row.notional)
            .bind(&row.currency)
            .bind(&row.counterparty_name)
            .bind(row.fixed_price)
            .bind(&row.product_type)
            .bind(&row.commodity_type)
            .bind(&row.attributes)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn fetch_partition(&self, partition: TradeSource) -> Result<Vec<CanonicalTradeRecord>> {
        let query = format!(
            r"
            SELECT trade_id, source, trade_date, effective_date, maturity_date,
                   notional, currency, counterparty_name, fixed_price,
                   product_type, commodity_type, attributes
            FROM {}
            ORDER BY trade_id ASC
            ",
            Self::table(partition)
        );

        let rows = sqlx::query_as::<_, TradeRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TradeRow::into_record).collect()
    }
}
