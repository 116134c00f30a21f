//! Per-field comparison rules.
//!
//! Every comparator is pure and side-effect free: two candidate values in, a
//! normalized `[0, 1]` score plus an optional reason code out. Missing values
//! are indeterminate, not mismatches: they score a neutral 0.5 with the soft
//! `MISSING_FIELD` code so one absent optional cannot tank an otherwise-good
//! match. A typed `ComparisonError` fires only for values that are present
//! but structurally invalid.

use chrono::NaiveDate;
use otc_recon_core::config::MatchingConfig;
use otc_recon_core::errors::ComparisonError;
use otc_recon_core::reason::ReasonCode;
use otc_recon_core::record::CanonicalTradeRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Result of comparing one field between two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldComparison {
    pub field: String,
    pub raw_score: Decimal,
    pub within_tolerance: bool,
    pub reason_code: Option<ReasonCode>,
}

impl FieldComparison {
    fn full_match(field: &str) -> Self {
        Self {
            field: field.to_string(),
            raw_score: Decimal::ONE,
            within_tolerance: true,
            reason_code: None,
        }
    }

    fn mismatch(field: &str, raw_score: Decimal, code: ReasonCode) -> Self {
        Self {
            field: field.to_string(),
            raw_score,
            within_tolerance: false,
            reason_code: Some(code),
        }
    }

    fn indeterminate(field: &str) -> Self {
        Self {
            field: field.to_string(),
            raw_score: Decimal::new(5, 1),
            within_tolerance: false,
            reason_code: Some(ReasonCode::MissingField),
        }
    }
}

pub struct FieldComparator {
    config: MatchingConfig,
}

impl FieldComparator {
    #[allow(clippy::missing_const_for_fn)] // Vec fields cannot be used in const fn
    #[must_use]
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// ID-adjacent cross-link signal.
    ///
    /// Source-local `trade_id`s differ by system and are never compared;
    /// the signal keys off a shared external reference when both sides
    /// carry one, and is indeterminate otherwise.
    #[must_use]
    pub fn compare_trade_reference(
        &self,
        a: &CanonicalTradeRecord,
        b: &CanonicalTradeRecord,
    ) -> FieldComparison {
        const FIELD: &str = "trade_reference";

        match (a.external_reference(), b.external_reference()) {
            (Some(ref_a), Some(ref_b)) => {
                let norm_a = normalize_reference(ref_a);
                let norm_b = normalize_reference(ref_b);
                if !norm_a.is_empty() && norm_a == norm_b {
                    FieldComparison::full_match(FIELD)
                } else {
                    FieldComparison::mismatch(FIELD, Decimal::ZERO, ReasonCode::TradeRefMismatch)
                }
            }
            _ => FieldComparison::indeterminate(FIELD),
        }
    }

    /// Date comparison: full score within the calendar-day tolerance, linear
    /// decay to zero at the outer bound.
    #[must_use]
    pub fn compare_dates(
        &self,
        field: &str,
        a: Option<NaiveDate>,
        b: Option<NaiveDate>,
    ) -> FieldComparison {
        let (Some(date_a), Some(date_b)) = (a, b) else {
            return FieldComparison::indeterminate(field);
        };

        let tolerance = self.config.date_tolerance_days;
        let zero_at = self.config.date_zero_score_days;
        let diff_days = (date_a - date_b).num_days().abs();

        if diff_days <= tolerance {
            FieldComparison::full_match(field)
        } else if diff_days >= zero_at {
            FieldComparison::mismatch(field, Decimal::ZERO, ReasonCode::DateMismatch)
        } else {
            let score = Decimal::from(zero_at - diff_days) / Decimal::from(zero_at - tolerance);
            FieldComparison::mismatch(field, score.round_dp(4), ReasonCode::DateMismatch)
        }
    }

    /// Numeric comparison on relative difference against the larger
    /// magnitude: full score within the inner band, linear decay to zero at
    /// the outer bound.
    #[must_use]
    pub fn compare_numeric(
        &self,
        field: &str,
        a: Option<Decimal>,
        b: Option<Decimal>,
        code: ReasonCode,
    ) -> FieldComparison {
        let (Some(value_a), Some(value_b)) = (a, b) else {
            return FieldComparison::indeterminate(field);
        };

        let denominator = value_a.abs().max(value_b.abs());
        if denominator.is_zero() {
            // Both exactly zero.
            return FieldComparison::full_match(field);
        }

        let diff_pct = ((value_a - value_b).abs() / denominator) * Decimal::ONE_HUNDRED;
        let tolerance = self.config.notional_tolerance_pct;
        let zero_at = self.config.notional_zero_score_pct;

        if diff_pct <= tolerance {
            FieldComparison::full_match(field)
        } else if diff_pct >= zero_at {
            FieldComparison::mismatch(field, Decimal::ZERO, code)
        } else {
            let score = (zero_at - diff_pct) / (zero_at - tolerance);
            FieldComparison::mismatch(field, score.round_dp(4), code)
        }
    }

    /// Categorical comparison: exact equality after case-fold and trim.
    #[must_use]
    pub fn compare_exact(
        &self,
        field: &str,
        a: Option<&str>,
        b: Option<&str>,
        code: ReasonCode,
    ) -> FieldComparison {
        let (Some(text_a), Some(text_b)) = (a, b) else {
            return FieldComparison::indeterminate(field);
        };

        if normalize_text(text_a) == normalize_text(text_b) {
            FieldComparison::full_match(field)
        } else {
            FieldComparison::mismatch(field, Decimal::ZERO, code)
        }
    }

    /// Fuzzy text comparison via Jaro-Winkler similarity on normalized
    /// names. Similarity at or above the configured threshold counts as a
    /// full match for weighting; below it the raw similarity is kept and a
    /// mismatch code is set.
    #[must_use]
    pub fn compare_fuzzy_text(
        &self,
        field: &str,
        a: Option<&str>,
        b: Option<&str>,
        code: ReasonCode,
    ) -> FieldComparison {
        let (Some(text_a), Some(text_b)) = (a, b) else {
            return FieldComparison::indeterminate(field);
        };

        let similarity = strsim::jaro_winkler(&normalize_text(text_a), &normalize_text(text_b));
        let similarity = Decimal::try_from(similarity)
            .unwrap_or(Decimal::ZERO)
            .round_dp(4);

        if similarity >= self.config.counterparty_match_threshold {
            FieldComparison::full_match(field)
        } else {
            FieldComparison::mismatch(field, similarity, code)
        }
    }

    /// Supplemental extension-map comparison. Attributes declared numeric
    /// must parse as decimals on both sides.
    ///
    /// # Errors
    ///
    /// Returns `ComparisonError` when a declared-numeric attribute does not
    /// parse, or a value is not a comparable scalar.
    pub fn compare_attribute(
        &self,
        name: &str,
        a: &JsonValue,
        b: &JsonValue,
    ) -> Result<FieldComparison, ComparisonError> {
        if self.config.numeric_attributes.iter().any(|n| n == name) {
            let value_a = decimal_from_json(name, a)?;
            let value_b = decimal_from_json(name, b)?;
            return Ok(self.compare_numeric(
                name,
                Some(value_a),
                Some(value_b),
                ReasonCode::AttributeMismatch,
            ));
        }

        let text_a = scalar_text(name, a)?;
        let text_b = scalar_text(name, b)?;
        Ok(self.compare_exact(
            name,
            Some(&text_a),
            Some(&text_b),
            ReasonCode::AttributeMismatch,
        ))
    }

    /// Neutral comparison for a value present on only one side.
    #[must_use]
    pub fn missing(&self, field: &str) -> FieldComparison {
        FieldComparison::indeterminate(field)
    }
}

fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn normalize_reference(reference: &str) -> String {
    reference
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn decimal_from_json(field: &str, value: &JsonValue) -> Result<Decimal, ComparisonError> {
    let text = match value {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.trim().to_string(),
        _ => {
            return Err(ComparisonError::UnsupportedValue {
                field: field.to_string(),
            })
        }
    };

    text.parse::<Decimal>()
        .map_err(|_| ComparisonError::InvalidNumeric {
            field: field.to_string(),
            value: text,
        })
}

fn scalar_text(field: &str, value: &JsonValue) -> Result<String, ComparisonError> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        _ => Err(ComparisonError::UnsupportedValue {
            field: field.to_string(),
        }),
    }
}
