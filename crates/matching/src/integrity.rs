//! Data-integrity placement check.
//!
//! A record fetched from the partition reserved for one source must carry
//! that source's tag. A misplaced record short-circuits classification to
//! `DATA_ERROR` before any field is scored: a record in the wrong store must
//! never be reported as a clean match, however similar its fields are.

use otc_recon_core::record::{CanonicalTradeRecord, TradeSource};

/// A record found in the wrong source-partitioned store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementViolation {
    pub trade_id: String,
    pub expected: TradeSource,
    pub found: TradeSource,
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    /// Verifies one record against the partition it was fetched from.
    #[must_use]
    pub fn verify_placement(
        record: &CanonicalTradeRecord,
        partition: TradeSource,
    ) -> Option<PlacementViolation> {
        if record.source == partition {
            None
        } else {
            Some(PlacementViolation {
                trade_id: record.trade_id.clone(),
                expected: partition,
                found: record.source,
            })
        }
    }

    /// Checks both sides of a candidate pair, in store order.
    #[must_use]
    pub fn check_pair(
        bank: &CanonicalTradeRecord,
        counterparty: &CanonicalTradeRecord,
    ) -> Vec<PlacementViolation> {
        let mut violations = Vec::new();
        if let Some(v) = Self::verify_placement(bank, TradeSource::Bank) {
            violations.push(v);
        }
        if let Some(v) = Self::verify_placement(counterparty, TradeSource::Counterparty) {
            violations.push(v);
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correctly_placed_records_pass() {
        let bank = CanonicalTradeRecord::new("B-1", TradeSource::Bank);
        let counterparty = CanonicalTradeRecord::new("C-1", TradeSource::Counterparty);
        assert!(IntegrityChecker::check_pair(&bank, &counterparty).is_empty());
    }

    #[test]
    fn misplaced_record_is_reported() {
        let misplaced = CanonicalTradeRecord::new("B-1", TradeSource::Counterparty);
        let counterparty = CanonicalTradeRecord::new("C-1", TradeSource::Counterparty);

        let violations = IntegrityChecker::check_pair(&misplaced, &counterparty);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].expected, TradeSource::Bank);
        assert_eq!(violations[0].found, TradeSource::Counterparty);
        assert_eq!(violations[0].trade_id, "B-1");
    }

    #[test]
    fn both_sides_misplaced_yields_two_violations() {
        let a = CanonicalTradeRecord::new("X-1", TradeSource::Counterparty);
        let b = CanonicalTradeRecord::new("X-2", TradeSource::Bank);
        assert_eq!(IntegrityChecker::check_pair(&a, &b).len(), 2);
    }
}
