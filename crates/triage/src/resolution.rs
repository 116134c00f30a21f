//! Resolution tracking and the policy feedback loop.
//!
//! Resolving an exception computes a reward and appends it to the policy
//! event store. The append is best-effort: a store outage is logged and
//! skipped so resolution tracking itself never fails. Re-resolving an
//! already-resolved exception is a no-op and applies no second reward.

use crate::policy::reward_for;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use otc_recon_core::events::RewardEvent;
use otc_recon_core::exception::RoutingDestination;
use otc_recon_core::traits::{ExceptionStore, PolicyEventStore};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ResolutionTracker {
    exception_store: Arc<dyn ExceptionStore>,
    policy_store: Arc<dyn PolicyEventStore>,
}

impl ResolutionTracker {
    #[must_use]
    pub fn new(
        exception_store: Arc<dyn ExceptionStore>,
        policy_store: Arc<dyn PolicyEventStore>,
    ) -> Self {
        Self {
            exception_store,
            policy_store,
        }
    }

    /// Marks an exception as assigned to an operator.
    ///
    /// # Errors
    /// Returns an error if the exception does not exist or the store fails.
    pub async fn assign(&self, exception_id: Uuid) -> Result<()> {
        let mut exception = self
            .exception_store
            .fetch_exception(exception_id)
            .await?
            .with_context(|| format!("unknown exception: {exception_id}"))?;

        if !exception.mark_assigned() {
            info!(%exception_id, "exception already resolved, assignment skipped");
            return Ok(());
        }

        self.exception_store.update_exception(&exception).await
    }

    /// Resolves an exception and feeds the outcome back to the learned
    /// policy.
    ///
    /// `actual_destination` is where the human eventually handled the
    /// exception; `resolved_at` is compared against the SLA deadline.
    /// Returns the reward event, or `None` when the exception was already
    /// resolved (idempotent re-resolution).
    ///
    /// # Errors
    /// Returns an error if the exception does not exist or the exception
    /// store fails. A policy-store failure is NOT an error: the update is
    /// logged and skipped.
    pub async fn resolve(
        &self,
        exception_id: Uuid,
        actual_destination: RoutingDestination,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<RewardEvent>> {
        let mut exception = self
            .exception_store
            .fetch_exception(exception_id)
            .await?
            .with_context(|| format!("unknown exception: {exception_id}"))?;

        if !exception.mark_resolved() {
            info!(%exception_id, "exception already resolved, no reward applied");
            return Ok(None);
        }

        let (within_sla, routing_matched, routed_to) = match &exception.routing {
            Some(routing) => (
                resolved_at <= routing.sla_deadline,
                routing.destination == actual_destination,
                routing.destination,
            ),
            // Never routed: treat the human's destination as the routing
            // baseline so the reward reflects SLA adherence alone.
            None => (false, true, actual_destination),
        };

        self.exception_store.update_exception(&exception).await?;

        let event = RewardEvent {
            exception_id,
            reason_codes: exception.reason_codes.clone(),
            routed_to,
            actual_destination,
            within_sla,
            reward: reward_for(within_sla, routing_matched),
            occurred_at: resolved_at,
        };

        if let Err(error) = self.policy_store.append_reward(&event).await {
            warn!(%exception_id, %error, "policy store unavailable, skipping reward update");
        }

        info!(
            %exception_id,
            reward = %event.reward,
            within_sla,
            "exception resolved"
        );

        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::Duration;
    use otc_recon_core::config::TriageConfig;
    use otc_recon_core::exception::{
        ExceptionRecord, ExceptionSource, ResolutionStatus,
    };
    use otc_recon_core::reason::ReasonCode;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct MemoryExceptionStore {
        records: Mutex<HashMap<Uuid, ExceptionRecord>>,
    }

    impl MemoryExceptionStore {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl ExceptionStore for MemoryExceptionStore {
        async fn insert_exception(&self, exception: &ExceptionRecord) -> Result<()> {
            self.records
                .lock()
                .await
                .insert(exception.exception_id, exception.clone());
            Ok(())
        }

        async fn update_exception(&self, exception: &ExceptionRecord) -> Result<()> {
            self.records
                .lock()
                .await
                .insert(exception.exception_id, exception.clone());
            Ok(())
        }

        async fn fetch_exception(&self, exception_id: Uuid) -> Result<Option<ExceptionRecord>> {
            Ok(self.records.lock().await.get(&exception_id).cloned())
        }

        async fn fetch_by_status(
            &self,
            status: ResolutionStatus,
        ) -> Result<Vec<ExceptionRecord>> {
            Ok(self
                .records
                .lock()
                .await
                .values()
                .filter(|e| e.resolution == status)
                .cloned()
                .collect())
        }
    }

    struct MemoryPolicyStore {
        events: Mutex<Vec<RewardEvent>>,
        fail: bool,
    }

    impl MemoryPolicyStore {
        fn new(fail: bool) -> Self {
            Self {
                events: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl PolicyEventStore for MemoryPolicyStore {
        async fn append_reward(&self, event: &RewardEvent) -> Result<()> {
            if self.fail {
                return Err(anyhow!("policy store offline"));
            }
            self.events.lock().await.push(event.clone());
            Ok(())
        }

        async fn fetch_rewards(&self) -> Result<Vec<RewardEvent>> {
            Ok(self.events.lock().await.clone())
        }
    }

    fn routed_exception() -> ExceptionRecord {
        let created_at: DateTime<Utc> = "2025-03-05T10:00:00Z".parse().unwrap();
        let mut exception = ExceptionRecord::new(
            ExceptionSource::MatchBreak,
            Some("T-9".to_string()),
            Some(dec!(0.40)),
            [ReasonCode::NotionalMismatch].into_iter().collect(),
            created_at,
        );
        let router = crate::router::TriageRouter::new(TriageConfig::default());
        router.triage(&mut exception, None);
        exception
    }

    #[tokio::test]
    async fn resolving_within_sla_at_routed_destination_earns_full_reward() {
        let exceptions = Arc::new(MemoryExceptionStore::new());
        let policy = Arc::new(MemoryPolicyStore::new(false));
        let tracker = ResolutionTracker::new(exceptions.clone(), policy.clone());

        let exception = routed_exception();
        let routed_to = exception.routing.unwrap().destination;
        exceptions.insert_exception(&exception).await.unwrap();

        let resolved_at = exception.created_at + Duration::hours(1);
        let event = tracker
            .resolve(exception.exception_id, routed_to, resolved_at)
            .await
            .unwrap()
            .unwrap();

        assert!(event.within_sla);
        assert_eq!(event.reward, dec!(1.0));
        assert_eq!(policy.fetch_rewards().await.unwrap().len(), 1);

        let stored = exceptions
            .fetch_exception(exception.exception_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.resolution, ResolutionStatus::Resolved);
    }

    #[tokio::test]
    async fn late_and_misrouted_resolution_earns_negative_reward() {
        let exceptions = Arc::new(MemoryExceptionStore::new());
        let policy = Arc::new(MemoryPolicyStore::new(false));
        let tracker = ResolutionTracker::new(exceptions.clone(), policy.clone());

        let exception = routed_exception();
        exceptions.insert_exception(&exception).await.unwrap();

        let resolved_at = exception.created_at + Duration::hours(72);
        let event = tracker
            .resolve(
                exception.exception_id,
                RoutingDestination::SeniorOps,
                resolved_at,
            )
            .await
            .unwrap()
            .unwrap();

        assert!(!event.within_sla);
        assert_eq!(event.reward, dec!(-1.0));
    }

    #[tokio::test]
    async fn double_resolution_applies_no_second_reward() {
        let exceptions = Arc::new(MemoryExceptionStore::new());
        let policy = Arc::new(MemoryPolicyStore::new(false));
        let tracker = ResolutionTracker::new(exceptions.clone(), policy.clone());

        let exception = routed_exception();
        let routed_to = exception.routing.unwrap().destination;
        exceptions.insert_exception(&exception).await.unwrap();

        let resolved_at = exception.created_at + Duration::hours(1);
        let first = tracker
            .resolve(exception.exception_id, routed_to, resolved_at)
            .await
            .unwrap();
        assert!(first.is_some());

        let second = tracker
            .resolve(exception.exception_id, routed_to, resolved_at)
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(policy.fetch_rewards().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn policy_store_outage_does_not_block_resolution() {
        let exceptions = Arc::new(MemoryExceptionStore::new());
        let policy = Arc::new(MemoryPolicyStore::new(true));
        let tracker = ResolutionTracker::new(exceptions.clone(), policy);

        let exception = routed_exception();
        let routed_to = exception.routing.unwrap().destination;
        exceptions.insert_exception(&exception).await.unwrap();

        let resolved_at = exception.created_at + Duration::hours(1);
        let event = tracker
            .resolve(exception.exception_id, routed_to, resolved_at)
            .await
            .unwrap();

        assert!(event.is_some());
        let stored = exceptions
            .fetch_exception(exception.exception_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.resolution, ResolutionStatus::Resolved);
    }

    #[tokio::test]
    async fn assignment_transitions_pending_to_assigned() {
        let exceptions = Arc::new(MemoryExceptionStore::new());
        let policy = Arc::new(MemoryPolicyStore::new(false));
        let tracker = ResolutionTracker::new(exceptions.clone(), policy);

        let exception = routed_exception();
        exceptions.insert_exception(&exception).await.unwrap();

        tracker.assign(exception.exception_id).await.unwrap();

        let stored = exceptions
            .fetch_exception(exception.exception_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.resolution, ResolutionStatus::Assigned);
    }
}
