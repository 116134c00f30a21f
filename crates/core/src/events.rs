use crate::exception::{RoutingDestination, SeverityTier};
use crate::reason::ReasonCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Audit-trail events emitted by the matching and triage pipelines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReconEvent {
    MatchEvaluated {
        bank_trade_id: String,
        counterparty_trade_id: String,
        classification: String,
        match_score: Decimal,
        timestamp: DateTime<Utc>,
    },
    ExceptionRaised {
        exception_id: Uuid,
        severity: SeverityTier,
        destination: Option<RoutingDestination>,
        timestamp: DateTime<Utc>,
    },
    ExceptionResolved {
        exception_id: Uuid,
        within_sla: bool,
        timestamp: DateTime<Utc>,
    },
    RewardRecorded {
        exception_id: Uuid,
        reward: Decimal,
        timestamp: DateTime<Utc>,
    },
}

/// One resolution outcome feeding the learned routing policy.
///
/// Reward events are append-only; the effective policy is recomputed from
/// the stream rather than mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEvent {
    pub exception_id: Uuid,
    pub reason_codes: BTreeSet<ReasonCode>,
    pub routed_to: RoutingDestination,
    pub actual_destination: RoutingDestination,
    pub within_sla: bool,
    pub reward: Decimal,
    pub occurred_at: DateTime<Utc>,
}
