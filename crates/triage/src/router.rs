//! Exception triage routing.
//!
//! Rules are evaluated in strict precedence order and the first match wins.
//! The learned policy is consulted only by the final catch-all rule, so a
//! bad policy update can never hijack counterparty or notional escalations.

use crate::policy::LearnedPolicy;
use crate::severity::SeverityScorer;
use chrono::Duration;
use otc_recon_core::config::TriageConfig;
use otc_recon_core::exception::{
    ExceptionRecord, RoutingDecision, RoutingDestination, SeverityTier,
};
use otc_recon_core::reason::ReasonCode;
use rust_decimal::Decimal;
use tracing::debug;

pub struct TriageRouter {
    config: TriageConfig,
    scorer: SeverityScorer,
}

impl TriageRouter {
    #[must_use]
    pub fn new(config: TriageConfig) -> Self {
        Self {
            scorer: SeverityScorer::new(config.clone()),
            config,
        }
    }

    /// Scores and routes one exception in place.
    pub fn triage(&self, exception: &mut ExceptionRecord, policy: Option<&LearnedPolicy>) {
        let adjustment = policy.map_or(Decimal::ZERO, LearnedPolicy::severity_adjustment);
        let severity_score =
            self.scorer
                .score(&exception.reason_codes, exception.match_score, adjustment);
        exception.apply_severity(severity_score);

        let decision = self.route(exception, policy);
        debug!(
            exception_id = %exception.exception_id,
            severity = %decision.severity,
            destination = %decision.destination,
            priority = decision.priority,
            "exception routed"
        );
        exception.apply_routing(decision);
    }

    /// First-matching-rule routing. SLA deadlines derive from the
    /// exception's creation time, never from the clock at routing time.
    #[must_use]
    pub fn route(
        &self,
        exception: &ExceptionRecord,
        policy: Option<&LearnedPolicy>,
    ) -> RoutingDecision {
        let severity_score = exception.severity_score;
        let created_at = exception.created_at;

        if exception
            .reason_codes
            .contains(&ReasonCode::CounterpartyMismatch)
        {
            return RoutingDecision {
                destination: RoutingDestination::SeniorOps,
                severity: SeverityTier::Critical,
                priority: 1,
                sla_deadline: created_at + Duration::hours(self.config.critical_sla_hours),
            };
        }

        if exception.reason_codes.contains(&ReasonCode::NotionalMismatch)
            && severity_score > Decimal::new(70, 2)
        {
            return RoutingDecision {
                destination: RoutingDestination::OpsDesk,
                severity: SeverityTier::High,
                priority: 2,
                sla_deadline: created_at + Duration::hours(self.config.high_sla_hours),
            };
        }

        if severity_score < Decimal::new(30, 2) {
            return RoutingDecision {
                destination: RoutingDestination::AutoResolve,
                severity: SeverityTier::Low,
                priority: 4,
                sla_deadline: created_at + Duration::hours(self.config.low_sla_hours),
            };
        }

        let destination = policy
            .and_then(|p| p.suggest(&exception.reason_codes))
            .unwrap_or(RoutingDestination::OpsDesk);

        RoutingDecision {
            destination,
            severity: SeverityTier::Medium,
            priority: 3,
            sla_deadline: created_at + Duration::hours(self.config.medium_sla_hours),
        }
    }
}
