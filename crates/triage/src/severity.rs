//! Exception severity scoring.
//!
//! Severity starts from the worst reason code present, is amplified by a low
//! match score when one exists, and may carry a small bounded correction
//! from the learned policy. The result is always clamped to `[0, 1]`.

use otc_recon_core::config::TriageConfig;
use otc_recon_core::reason::ReasonCode;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub struct SeverityScorer {
    config: TriageConfig,
}

impl SeverityScorer {
    #[must_use]
    pub const fn new(config: TriageConfig) -> Self {
        Self { config }
    }

    /// Fixed reason-code base severities. Codes without an entry default
    /// to 0.5.
    #[must_use]
    pub fn base_severity(code: ReasonCode) -> Decimal {
        match code {
            ReasonCode::CounterpartyMismatch => Decimal::new(90, 2),
            ReasonCode::DataIntegrityViolation => Decimal::new(85, 2),
            ReasonCode::NotionalMismatch => Decimal::new(80, 2),
            ReasonCode::CurrencyMismatch => Decimal::new(70, 2),
            ReasonCode::MissingField | ReasonCode::TradeRefMismatch => Decimal::new(60, 2),
            ReasonCode::DateMismatch => Decimal::new(50, 2),
            ReasonCode::ProcessingError => Decimal::new(40, 2),
            _ => Decimal::new(50, 2),
        }
    }

    /// Computes the severity score for one exception.
    ///
    /// `adjustment` is the learned correction term; it is clamped to the
    /// configured bound here, so a bad policy update can only ever nudge
    /// severity, never swing it.
    #[must_use]
    pub fn score(
        &self,
        reason_codes: &BTreeSet<ReasonCode>,
        match_score: Option<Decimal>,
        adjustment: Decimal,
    ) -> Decimal {
        let base = reason_codes
            .iter()
            .map(|code| Self::base_severity(*code))
            .max()
            .unwrap_or_else(|| Decimal::new(50, 2));

        let scaled = match match_score {
            Some(score) => base * (Decimal::ONE - score),
            None => base,
        };

        let bound = self.config.policy_adjustment_bound;
        let adjustment = adjustment.clamp(-bound, bound);

        (scaled + adjustment)
            .clamp(Decimal::ZERO, Decimal::ONE)
            .round_dp(2)
    }
}
