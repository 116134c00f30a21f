use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured token identifying which field caused a score reduction or
/// triggered an exception.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    TradeRefMismatch,
    DateMismatch,
    NotionalMismatch,
    CounterpartyMismatch,
    CurrencyMismatch,
    PriceMismatch,
    ProductMismatch,
    CommodityMismatch,
    AttributeMismatch,
    /// Soft code: a value was missing on one or both sides.
    MissingField,
    ProcessingError,
    DataIntegrityViolation,
}

impl ReasonCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TradeRefMismatch => "TRADE_REF_MISMATCH",
            Self::DateMismatch => "DATE_MISMATCH",
            Self::NotionalMismatch => "NOTIONAL_MISMATCH",
            Self::CounterpartyMismatch => "COUNTERPARTY_MISMATCH",
            Self::CurrencyMismatch => "CURRENCY_MISMATCH",
            Self::PriceMismatch => "PRICE_MISMATCH",
            Self::ProductMismatch => "PRODUCT_MISMATCH",
            Self::CommodityMismatch => "COMMODITY_MISMATCH",
            Self::AttributeMismatch => "ATTRIBUTE_MISMATCH",
            Self::MissingField => "MISSING_FIELD",
            Self::ProcessingError => "PROCESSING_ERROR",
            Self::DataIntegrityViolation => "DATA_INTEGRITY_VIOLATION",
        }
    }

}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_screaming_snake_case() {
        let json = serde_json::to_string(&ReasonCode::NotionalMismatch).unwrap();
        assert_eq!(json, "\"NOTIONAL_MISMATCH\"");

        let back: ReasonCode = serde_json::from_str("\"COUNTERPARTY_MISMATCH\"").unwrap();
        assert_eq!(back, ReasonCode::CounterpartyMismatch);
    }

    #[test]
    fn as_str_matches_serde_form() {
        let json = serde_json::to_string(&ReasonCode::TradeRefMismatch).unwrap();
        assert_eq!(json, format!("\"{}\"", ReasonCode::TradeRefMismatch.as_str()));
    }
}
