//! Match result row model.

use anyhow::Result;
use chrono::{DateTime, Utc};
use otc_recon_matching::MatchResult;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchResultRow {
    pub id: i32,
    pub bank_trade_id: String,
    pub counterparty_trade_id: String,
    pub classification: String,
    pub match_score: Decimal,
    pub decision: String,
    pub reason_codes: JsonValue,
    pub differences: JsonValue,
    pub evaluated_at: DateTime<Utc>,
}

impl MatchResultRow {
    #[must_use]
    pub fn from_result(result: &MatchResult) -> Self {
        Self {
            id: 0, // Assigned by the database.
            bank_trade_id: result.bank_trade_id.clone(),
            counterparty_trade_id: result.counterparty_trade_id.clone(),
            classification: result.classification.as_str().to_string(),
            match_score: result.match_score,
            decision: result.decision.as_str().to_string(),
            reason_codes: serde_json::to_value(&result.reason_codes)
                .unwrap_or(JsonValue::Null),
            differences: serde_json::to_value(&result.differences)
                .unwrap_or(JsonValue::Null),
            evaluated_at: result.evaluated_at,
        }
    }

    /// Reconstructs the immutable match result.
    ///
    /// # Errors
    /// Returns an error if any stored enum or JSON column is malformed.
    pub fn into_result(self) -> Result<MatchResult> {
        Ok(MatchResult {
            bank_trade_id: self.bank_trade_id,
            counterparty_trade_id: self.counterparty_trade_id,
            classification: serde_json::from_value(JsonValue::String(self.classification))?,
            match_score: self.match_score,
            decision: serde_json::from_value(JsonValue::String(self.decision))?,
            reason_codes: serde_json::from_value(self.reason_codes)?,
            differences: serde_json::from_value(self.differences)?,
            evaluated_at: self.evaluated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otc_recon_core::decision::{Classification, DecisionStatus};
    use otc_recon_core::reason::ReasonCode;
    use rust_decimal_macros::dec;

    #[test]
    fn row_round_trips_a_result() {
        let result = MatchResult {
            bank_trade_id: "B-1".to_string(),
            counterparty_trade_id: "C-1".to_string(),
            classification: Classification::ProbableMatch,
            match_score: dec!(0.78),
            decision: DecisionStatus::Escalate,
            reason_codes: [ReasonCode::NotionalMismatch].into_iter().collect(),
            differences: Vec::new(),
            evaluated_at: "2025-03-05T09:00:00Z".parse().unwrap(),
        };

        let restored = MatchResultRow::from_result(&result).into_result().unwrap();
        assert_eq!(restored, result);
    }
}
