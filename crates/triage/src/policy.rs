//! Learned routing policy.
//!
//! Policy state is an append-only stream of `RewardEvent`s; the effective
//! policy is recomputed from the stream rather than mutated in place, so
//! concurrent resolutions cannot lose updates and the learning component is
//! replayable from its event log. The policy is advisory only: the router
//! consults it for the otherwise-unrouted medium band and nowhere else.

use otc_recon_core::config::TriageConfig;
use otc_recon_core::events::RewardEvent;
use otc_recon_core::exception::RoutingDestination;
use otc_recon_core::reason::ReasonCode;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Reward for one resolution outcome.
///
/// +1.0 resolved within SLA and routed where the human landed; +0.5 within
/// SLA but misrouted; -0.5 late but routed correctly; -1.0 late and
/// misrouted.
#[must_use]
pub fn reward_for(within_sla: bool, routing_matched: bool) -> Decimal {
    match (within_sla, routing_matched) {
        (true, true) => Decimal::ONE,
        (true, false) => Decimal::new(5, 1),
        (false, true) => Decimal::new(-5, 1),
        (false, false) => Decimal::NEGATIVE_ONE,
    }
}

/// Effective routing policy recomputed from the reward-event log.
#[derive(Debug, Clone, Default)]
pub struct LearnedPolicy {
    routes: BTreeMap<ReasonCode, RoutingDestination>,
    severity_adjustment: Decimal,
}

impl LearnedPolicy {
    /// Recomputes the policy from the full event stream.
    ///
    /// For each reason code, the destination where resolutions earned the
    /// best mean reward is learned, gated on a minimum sample count. The
    /// overall mean reward yields a bounded severity correction: poor
    /// outcomes push severity up, good outcomes ease it down.
    #[must_use]
    pub fn from_events(events: &[RewardEvent], config: &TriageConfig) -> Self {
        let mut stats: BTreeMap<(ReasonCode, RoutingDestination), (Decimal, usize)> =
            BTreeMap::new();
        let mut total_reward = Decimal::ZERO;

        for event in events {
            total_reward += event.reward;
            for code in &event.reason_codes {
                let entry = stats
                    .entry((*code, event.actual_destination))
                    .or_insert((Decimal::ZERO, 0));
                entry.0 += event.reward;
                entry.1 += 1;
            }
        }

        let mut best: BTreeMap<ReasonCode, (RoutingDestination, Decimal)> = BTreeMap::new();
        for ((code, destination), (sum, count)) in &stats {
            if *count < config.min_policy_samples {
                continue;
            }
            let mean = sum / Decimal::from(*count as u64);
            let improves = best.get(code).map_or(true, |(_, current)| mean > *current);
            if improves {
                best.insert(*code, (*destination, mean));
            }
        }

        let severity_adjustment = if events.is_empty() {
            Decimal::ZERO
        } else {
            let mean_reward = total_reward / Decimal::from(events.len() as u64);
            let bound = config.policy_adjustment_bound;
            (-mean_reward * bound).clamp(-bound, bound).round_dp(4)
        };

        Self {
            routes: best
                .into_iter()
                .map(|(code, (destination, _))| (code, destination))
                .collect(),
            severity_adjustment,
        }
    }

    /// Suggested destination for an exception's reason codes, if the log
    /// has taught one.
    #[must_use]
    pub fn suggest(&self, reason_codes: &BTreeSet<ReasonCode>) -> Option<RoutingDestination> {
        reason_codes
            .iter()
            .find_map(|code| self.routes.get(code).copied())
    }

    #[must_use]
    pub const fn severity_adjustment(&self) -> Decimal {
        self.severity_adjustment
    }

    #[must_use]
    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn event(
        code: ReasonCode,
        destination: RoutingDestination,
        reward: Decimal,
    ) -> RewardEvent {
        RewardEvent {
            exception_id: Uuid::new_v4(),
            reason_codes: [code].into_iter().collect(),
            routed_to: RoutingDestination::OpsDesk,
            actual_destination: destination,
            within_sla: reward > Decimal::ZERO,
            reward,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn reward_table_matches_resolution_outcomes() {
        assert_eq!(reward_for(true, true), dec!(1.0));
        assert_eq!(reward_for(true, false), dec!(0.5));
        assert_eq!(reward_for(false, true), dec!(-0.5));
        assert_eq!(reward_for(false, false), dec!(-1.0));
    }

    #[test]
    fn no_suggestion_below_minimum_sample_count() {
        let config = TriageConfig::default();
        let events = vec![
            event(ReasonCode::DateMismatch, RoutingDestination::OpsDesk, dec!(1.0)),
            event(ReasonCode::DateMismatch, RoutingDestination::OpsDesk, dec!(1.0)),
        ];

        let policy = LearnedPolicy::from_events(&events, &config);
        assert_eq!(policy.suggest(&[ReasonCode::DateMismatch].into_iter().collect()), None);
    }

    #[test]
    fn learns_the_destination_with_best_mean_reward() {
        let config = TriageConfig::default();
        let mut events = Vec::new();
        for _ in 0..3 {
            events.push(event(
                ReasonCode::DateMismatch,
                RoutingDestination::SeniorOps,
                dec!(0.5),
            ));
        }
        for _ in 0..3 {
            events.push(event(
                ReasonCode::DateMismatch,
                RoutingDestination::OpsDesk,
                dec!(1.0),
            ));
        }

        let policy = LearnedPolicy::from_events(&events, &config);
        assert_eq!(
            policy.suggest(&[ReasonCode::DateMismatch].into_iter().collect()),
            Some(RoutingDestination::OpsDesk)
        );
    }

    #[test]
    fn unknown_reason_codes_get_no_suggestion() {
        let config = TriageConfig::default();
        let events = vec![
            event(ReasonCode::DateMismatch, RoutingDestination::OpsDesk, dec!(1.0)),
            event(ReasonCode::DateMismatch, RoutingDestination::OpsDesk, dec!(1.0)),
            event(ReasonCode::DateMismatch, RoutingDestination::OpsDesk, dec!(1.0)),
        ];

        let policy = LearnedPolicy::from_events(&events, &config);
        assert_eq!(
            policy.suggest(&[ReasonCode::CurrencyMismatch].into_iter().collect()),
            None
        );
    }

    #[test]
    fn severity_adjustment_opposes_mean_reward_and_stays_bounded() {
        let config = TriageConfig::default();

        // Consistently bad outcomes -> positive (severity-raising) correction.
        let bad: Vec<_> = (0..4)
            .map(|_| event(ReasonCode::DateMismatch, RoutingDestination::OpsDesk, dec!(-1.0)))
            .collect();
        let policy = LearnedPolicy::from_events(&bad, &config);
        assert_eq!(policy.severity_adjustment(), dec!(0.05));

        // Consistently good outcomes -> negative correction, same bound.
        let good: Vec<_> = (0..4)
            .map(|_| event(ReasonCode::DateMismatch, RoutingDestination::OpsDesk, dec!(1.0)))
            .collect();
        let policy = LearnedPolicy::from_events(&good, &config);
        assert_eq!(policy.severity_adjustment(), dec!(-0.05));

        let policy = LearnedPolicy::from_events(&[], &config);
        assert_eq!(policy.severity_adjustment(), Decimal::ZERO);
    }
}
