use crate::events::RewardEvent;
use crate::exception::{ExceptionRecord, ResolutionStatus};
use crate::record::{CanonicalTradeRecord, TradeSource};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Source-partitioned trade record store. Each partition is reserved for one
/// source; the integrity checker verifies that a fetched record's own tag
/// agrees with the partition it came from.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_record(
        &self,
        partition: TradeSource,
        record: &CanonicalTradeRecord,
    ) -> Result<()>;
    async fn fetch_partition(&self, partition: TradeSource) -> Result<Vec<CanonicalTradeRecord>>;
}

#[async_trait]
pub trait ExceptionStore: Send + Sync {
    async fn insert_exception(&self, exception: &ExceptionRecord) -> Result<()>;
    async fn update_exception(&self, exception: &ExceptionRecord) -> Result<()>;
    async fn fetch_exception(&self, exception_id: Uuid) -> Result<Option<ExceptionRecord>>;
    async fn fetch_by_status(&self, status: ResolutionStatus) -> Result<Vec<ExceptionRecord>>;
}

/// Append-only store of routing reward events.
#[async_trait]
pub trait PolicyEventStore: Send + Sync {
    async fn append_reward(&self, event: &RewardEvent) -> Result<()>;
    async fn fetch_rewards(&self) -> Result<Vec<RewardEvent>>;
}
