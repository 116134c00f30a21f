//! Per-pair matching pipeline.
//!
//! Runs integrity check -> comparators -> scorer -> classifier and assembles
//! one immutable `MatchResult`. Batch evaluation isolates failures at the
//! pair level: a structurally invalid value in one pair becomes that pair's
//! `DATA_ERROR` result and never aborts the rest of the batch.

use crate::classifier::MatchClassifier;
use crate::comparator::{FieldComparator, FieldComparison};
use crate::integrity::IntegrityChecker;
use crate::scorer::{MatchScorer, WeightedComparisons, WeightedField};
use chrono::{DateTime, Utc};
use otc_recon_core::config::MatchingConfig;
use otc_recon_core::decision::{Classification, DecisionStatus};
use otc_recon_core::errors::ComparisonError;
use otc_recon_core::events::ReconEvent;
use otc_recon_core::exception::{ExceptionRecord, ExceptionSource};
use otc_recon_core::reason::ReasonCode;
use otc_recon_core::record::CanonicalTradeRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Outcome of one matching attempt. Immutable once created; a re-match
/// produces a new result rather than updating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub bank_trade_id: String,
    pub counterparty_trade_id: String,
    pub classification: Classification,
    pub match_score: Decimal,
    pub decision: DecisionStatus,
    pub reason_codes: BTreeSet<ReasonCode>,
    pub differences: Vec<FieldComparison>,
    pub evaluated_at: DateTime<Utc>,
}

pub struct MatchEngine {
    comparator: FieldComparator,
    config: MatchingConfig,
}

impl MatchEngine {
    #[must_use]
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            comparator: FieldComparator::new(config.clone()),
            config,
        }
    }

    /// Evaluates one candidate pair.
    ///
    /// `evaluated_at` is supplied by the caller so that re-running a match
    /// over the same inputs yields a bit-identical result.
    #[must_use]
    pub fn match_pair(
        &self,
        bank: &CanonicalTradeRecord,
        counterparty: &CanonicalTradeRecord,
        evaluated_at: DateTime<Utc>,
    ) -> MatchResult {
        let violations = IntegrityChecker::check_pair(bank, counterparty);
        if !violations.is_empty() {
            for violation in &violations {
                warn!(
                    trade_id = %violation.trade_id,
                    expected = %violation.expected,
                    found = %violation.found,
                    "record found in wrong source partition"
                );
            }
            return Self::data_error_result(
                bank,
                counterparty,
                ReasonCode::DataIntegrityViolation,
                evaluated_at,
            );
        }

        match self.evaluate_fields(bank, counterparty) {
            Ok((weighted, supplemental)) => {
                let match_score = MatchScorer::score(&weighted);
                let classification = MatchClassifier::classify(match_score);
                let decision = MatchClassifier::decision_for(classification);

                let mut differences = vec![
                    weighted.trade_reference.clone(),
                    weighted.notional.clone(),
                    weighted.trade_date.clone(),
                    weighted.counterparty_name.clone(),
                    weighted.currency.clone(),
                ];
                differences.extend(supplemental);

                let reason_codes: BTreeSet<ReasonCode> = differences
                    .iter()
                    .filter_map(|comparison| comparison.reason_code)
                    .collect();

                debug!(
                    bank_trade_id = %bank.trade_id,
                    counterparty_trade_id = %counterparty.trade_id,
                    %match_score,
                    classification = %classification,
                    "pair evaluated"
                );

                MatchResult {
                    bank_trade_id: bank.trade_id.clone(),
                    counterparty_trade_id: counterparty.trade_id.clone(),
                    classification,
                    match_score,
                    decision,
                    reason_codes,
                    differences,
                    evaluated_at,
                }
            }
            Err(error) => {
                warn!(
                    bank_trade_id = %bank.trade_id,
                    counterparty_trade_id = %counterparty.trade_id,
                    %error,
                    "comparison failed, classifying pair as data error"
                );
                Self::data_error_result(bank, counterparty, ReasonCode::ProcessingError, evaluated_at)
            }
        }
    }

    /// Evaluates a batch of candidate pairs. Pairs are independent; a
    /// failure in one never affects the others.
    #[must_use]
    pub fn match_batch(
        &self,
        pairs: &[(CanonicalTradeRecord, CanonicalTradeRecord)],
        evaluated_at: DateTime<Utc>,
    ) -> Vec<MatchResult> {
        pairs
            .iter()
            .map(|(bank, counterparty)| self.match_pair(bank, counterparty, evaluated_at))
            .collect()
    }

    fn evaluate_fields(
        &self,
        bank: &CanonicalTradeRecord,
        counterparty: &CanonicalTradeRecord,
    ) -> Result<(WeightedComparisons, Vec<FieldComparison>), ComparisonError> {
        let weighted = WeightedComparisons {
            trade_reference: self.comparator.compare_trade_reference(bank, counterparty),
            notional: self.comparator.compare_numeric(
                WeightedField::Notional.as_str(),
                bank.notional,
                counterparty.notional,
                ReasonCode::NotionalMismatch,
            ),
            trade_date: self.comparator.compare_dates(
                WeightedField::TradeDate.as_str(),
                bank.trade_date,
                counterparty.trade_date,
            ),
            counterparty_name: self.comparator.compare_fuzzy_text(
                WeightedField::CounterpartyName.as_str(),
                bank.counterparty_name.as_deref(),
                counterparty.counterparty_name.as_deref(),
                ReasonCode::CounterpartyMismatch,
            ),
            currency: self.comparator.compare_exact(
                WeightedField::Currency.as_str(),
                bank.currency.as_deref(),
                counterparty.currency.as_deref(),
                ReasonCode::CurrencyMismatch,
            ),
        };

        let supplemental = self.evaluate_supplemental(bank, counterparty)?;
        Ok((weighted, supplemental))
    }

    // Supplemental comparisons are reported in `differences` only and never
    // enter the weighted sum. A field absent on both sides is skipped.
    fn evaluate_supplemental(
        &self,
        bank: &CanonicalTradeRecord,
        counterparty: &CanonicalTradeRecord,
    ) -> Result<Vec<FieldComparison>, ComparisonError> {
        let mut comparisons = Vec::new();

        if bank.effective_date.is_some() || counterparty.effective_date.is_some() {
            comparisons.push(self.comparator.compare_dates(
                "effective_date",
                bank.effective_date,
                counterparty.effective_date,
            ));
        }
        if bank.maturity_date.is_some() || counterparty.maturity_date.is_some() {
            comparisons.push(self.comparator.compare_dates(
                "maturity_date",
                bank.maturity_date,
                counterparty.maturity_date,
            ));
        }
        if bank.fixed_price.is_some() || counterparty.fixed_price.is_some() {
            comparisons.push(self.comparator.compare_numeric(
                "fixed_price",
                bank.fixed_price,
                counterparty.fixed_price,
                ReasonCode::PriceMismatch,
            ));
        }
        if bank.product_type.is_some() || counterparty.product_type.is_some() {
            comparisons.push(self.comparator.compare_exact(
                "product_type",
                bank.product_type.as_deref(),
                counterparty.product_type.as_deref(),
                ReasonCode::ProductMismatch,
            ));
        }
        if bank.commodity_type.is_some() || counterparty.commodity_type.is_some() {
            comparisons.push(self.comparator.compare_exact(
                "commodity_type",
                bank.commodity_type.as_deref(),
                counterparty.commodity_type.as_deref(),
                ReasonCode::CommodityMismatch,
            ));
        }

        for name in &self.config.compare_attributes {
            match (bank.attribute(name), counterparty.attribute(name)) {
                (Some(a), Some(b)) => comparisons.push(self.comparator.compare_attribute(name, a, b)?),
                (None, None) => {}
                _ => comparisons.push(self.comparator.missing(name)),
            }
        }

        Ok(comparisons)
    }

    fn data_error_result(
        bank: &CanonicalTradeRecord,
        counterparty: &CanonicalTradeRecord,
        code: ReasonCode,
        evaluated_at: DateTime<Utc>,
    ) -> MatchResult {
        MatchResult {
            bank_trade_id: bank.trade_id.clone(),
            counterparty_trade_id: counterparty.trade_id.clone(),
            classification: Classification::DataError,
            match_score: Decimal::ZERO,
            decision: DecisionStatus::Exception,
            reason_codes: BTreeSet::from([code]),
            differences: Vec::new(),
            evaluated_at,
        }
    }
}

/// Builds the exception record for a result that needs triage, if any.
///
/// Probable matches escalate to the human-review queue directly and do not
/// raise exceptions; auto-matches raise nothing.
#[must_use]
pub fn exception_for(result: &MatchResult) -> Option<ExceptionRecord> {
    let source_event = match result.classification {
        Classification::Matched | Classification::ProbableMatch => return None,
        Classification::ReviewRequired => ExceptionSource::MatchReview,
        Classification::Break => ExceptionSource::MatchBreak,
        Classification::DataError => {
            if result
                .reason_codes
                .contains(&ReasonCode::DataIntegrityViolation)
            {
                ExceptionSource::DataIntegrity
            } else {
                ExceptionSource::ProcessingFailure
            }
        }
    };

    let match_score = match result.classification {
        // A data-error score was never meaningfully computed.
        Classification::DataError => None,
        _ => Some(result.match_score),
    };

    Some(ExceptionRecord::new(
        source_event,
        Some(result.bank_trade_id.clone()),
        match_score,
        result.reason_codes.clone(),
        result.evaluated_at,
    ))
}

/// Audit-journal event for one evaluated pair.
#[must_use]
pub fn event_for(result: &MatchResult) -> ReconEvent {
    ReconEvent::MatchEvaluated {
        bank_trade_id: result.bank_trade_id.clone(),
        counterparty_trade_id: result.counterparty_trade_id.clone(),
        classification: result.classification.as_str().to_string(),
        match_score: result.match_score,
        timestamp: result.evaluated_at,
    }
}
