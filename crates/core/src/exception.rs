//! Exception record lifecycle.
//!
//! An `ExceptionRecord` is created for any failure or break-worthy event,
//! scored and routed by the triage step, and tracked through
//! `Pending -> Assigned -> Resolved`. Resolution is terminal.

use crate::reason::ReasonCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What kind of event raised the exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionSource {
    MatchBreak,
    MatchReview,
    ProcessingFailure,
    DataIntegrity,
}

/// Severity band derived from the severity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityTier {
    /// Maps a severity score to its tier.
    ///
    /// Bands: `< 0.30` Low, `[0.30, 0.60)` Medium, `[0.60, 0.85]` High,
    /// `> 0.85` Critical.
    #[must_use]
    pub fn from_score(score: Decimal) -> Self {
        if score < Decimal::new(30, 2) {
            Self::Low
        } else if score < Decimal::new(60, 2) {
            Self::Medium
        } else if score <= Decimal::new(85, 2) {
            Self::High
        } else {
            Self::Critical
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Team or queue an exception is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingDestination {
    SeniorOps,
    OpsDesk,
    AutoResolve,
}

impl RoutingDestination {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SeniorOps => "SENIOR_OPS",
            Self::OpsDesk => "OPS_DESK",
            Self::AutoResolve => "AUTO_RESOLVE",
        }
    }
}

impl fmt::Display for RoutingDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingDestination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SENIOR_OPS" => Ok(Self::SeniorOps),
            "OPS_DESK" => Ok(Self::OpsDesk),
            "AUTO_RESOLVE" => Ok(Self::AutoResolve),
            other => Err(format!("unknown routing destination: {other}")),
        }
    }
}

/// Routing assigned by the triage router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub destination: RoutingDestination,
    pub severity: SeverityTier,
    /// 1 = highest, 5 = lowest.
    pub priority: u8,
    pub sla_deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolutionStatus {
    Pending,
    Assigned,
    Resolved,
}

/// One exception requiring human (or auto) attention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionRecord {
    pub exception_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub source_event: ExceptionSource,
    pub trade_id: Option<String>,
    pub match_score: Option<Decimal>,
    pub reason_codes: BTreeSet<ReasonCode>,
    pub severity_score: Decimal,
    pub severity: SeverityTier,
    pub routing: Option<RoutingDecision>,
    pub resolution: ResolutionStatus,
}

impl ExceptionRecord {
    /// Creates an unscored, unrouted exception in `Pending` state.
    #[must_use]
    pub fn new(
        source_event: ExceptionSource,
        trade_id: Option<String>,
        match_score: Option<Decimal>,
        reason_codes: BTreeSet<ReasonCode>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            exception_id: Uuid::new_v4(),
            created_at,
            source_event,
            trade_id,
            match_score,
            reason_codes,
            severity_score: Decimal::ZERO,
            severity: SeverityTier::Low,
            routing: None,
            resolution: ResolutionStatus::Pending,
        }
    }

    /// Records the triage severity assessment.
    pub fn apply_severity(&mut self, score: Decimal) {
        self.severity_score = score;
        self.severity = SeverityTier::from_score(score);
    }

    /// Records the routing decision. Routing may also raise the severity
    /// tier (rule precedence can force Critical/High regardless of score).
    pub fn apply_routing(&mut self, decision: RoutingDecision) {
        self.severity = decision.severity;
        self.routing = Some(decision);
    }

    /// Pending -> Assigned. Returns false if the exception is already
    /// resolved (terminal) and leaves it untouched.
    pub fn mark_assigned(&mut self) -> bool {
        match self.resolution {
            ResolutionStatus::Resolved => false,
            ResolutionStatus::Pending | ResolutionStatus::Assigned => {
                self.resolution = ResolutionStatus::Assigned;
                true
            }
        }
    }

    /// Transition to the terminal `Resolved` state. Returns false if the
    /// record was already resolved.
    pub fn mark_resolved(&mut self) -> bool {
        if self.resolution == ResolutionStatus::Resolved {
            return false;
        }
        self.resolution = ResolutionStatus::Resolved;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn severity_tier_bands() {
        assert_eq!(SeverityTier::from_score(dec!(0.0)), SeverityTier::Low);
        assert_eq!(SeverityTier::from_score(dec!(0.29)), SeverityTier::Low);
        assert_eq!(SeverityTier::from_score(dec!(0.30)), SeverityTier::Medium);
        assert_eq!(SeverityTier::from_score(dec!(0.59)), SeverityTier::Medium);
        assert_eq!(SeverityTier::from_score(dec!(0.60)), SeverityTier::High);
        assert_eq!(SeverityTier::from_score(dec!(0.85)), SeverityTier::High);
        assert_eq!(SeverityTier::from_score(dec!(0.86)), SeverityTier::Critical);
        assert_eq!(SeverityTier::from_score(dec!(1.0)), SeverityTier::Critical);
    }

    #[test]
    fn resolution_is_terminal() {
        let mut exception = ExceptionRecord::new(
            ExceptionSource::MatchBreak,
            Some("T-1".to_string()),
            None,
            BTreeSet::new(),
            Utc::now(),
        );

        assert!(exception.mark_assigned());
        assert_eq!(exception.resolution, ResolutionStatus::Assigned);

        assert!(exception.mark_resolved());
        assert!(!exception.mark_resolved());
        assert!(!exception.mark_assigned());
        assert_eq!(exception.resolution, ResolutionStatus::Resolved);
    }
}
