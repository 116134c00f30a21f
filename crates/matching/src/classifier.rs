//! Score-to-decision mapping.
//!
//! Thresholds are fixed constants, not configuration: routing consumers and
//! auditors rely on the same score always producing the same tier.

use otc_recon_core::decision::{Classification, DecisionStatus};
use rust_decimal::Decimal;

pub struct MatchClassifier;

impl MatchClassifier {
    /// `>= 0.85` auto-match band.
    #[must_use]
    pub fn auto_match_threshold() -> Decimal {
        Decimal::new(85, 2)
    }

    /// `>= 0.70` probable-match band.
    #[must_use]
    pub fn probable_match_threshold() -> Decimal {
        Decimal::new(70, 2)
    }

    /// `>= 0.50` review band; anything below is a break.
    #[must_use]
    pub fn review_threshold() -> Decimal {
        Decimal::new(50, 2)
    }

    /// Maps a match score to its classification tier. Lower bounds are
    /// inclusive. Data-integrity violations and comparison failures bypass
    /// this mapping entirely (see the match engine).
    #[must_use]
    pub fn classify(score: Decimal) -> Classification {
        if score >= Self::auto_match_threshold() {
            Classification::Matched
        } else if score >= Self::probable_match_threshold() {
            Classification::ProbableMatch
        } else if score >= Self::review_threshold() {
            Classification::ReviewRequired
        } else {
            Classification::Break
        }
    }

    /// The action implied by a classification.
    #[must_use]
    pub const fn decision_for(classification: Classification) -> DecisionStatus {
        match classification {
            Classification::Matched => DecisionStatus::AutoMatch,
            Classification::ProbableMatch => DecisionStatus::Escalate,
            Classification::ReviewRequired | Classification::Break | Classification::DataError => {
                DecisionStatus::Exception
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn boundary_values_are_inclusive_on_lower_bounds() {
        assert_eq!(MatchClassifier::classify(dec!(0.85)), Classification::Matched);
        assert_eq!(
            MatchClassifier::classify(dec!(0.84)),
            Classification::ProbableMatch
        );
        assert_eq!(
            MatchClassifier::classify(dec!(0.70)),
            Classification::ProbableMatch
        );
        assert_eq!(
            MatchClassifier::classify(dec!(0.69)),
            Classification::ReviewRequired
        );
        assert_eq!(
            MatchClassifier::classify(dec!(0.50)),
            Classification::ReviewRequired
        );
        assert_eq!(MatchClassifier::classify(dec!(0.49)), Classification::Break);
    }

    #[test]
    fn classification_is_consistent_across_the_full_range() {
        // Sweep [0.00, 1.00] in 0.01 steps and check the threshold table.
        let mut score = Decimal::ZERO;
        while score <= Decimal::ONE {
            let classification = MatchClassifier::classify(score);
            let expected = if score >= dec!(0.85) {
                Classification::Matched
            } else if score >= dec!(0.70) {
                Classification::ProbableMatch
            } else if score >= dec!(0.50) {
                Classification::ReviewRequired
            } else {
                Classification::Break
            };
            assert_eq!(classification, expected, "score {score}");

            let decision = MatchClassifier::decision_for(classification);
            let expected_decision = match classification {
                Classification::Matched => DecisionStatus::AutoMatch,
                Classification::ProbableMatch => DecisionStatus::Escalate,
                _ => DecisionStatus::Exception,
            };
            assert_eq!(decision, expected_decision, "score {score}");

            score += dec!(0.01);
        }
    }

    #[test]
    fn data_error_always_maps_to_exception() {
        assert_eq!(
            MatchClassifier::decision_for(Classification::DataError),
            DecisionStatus::Exception
        );
    }
}
