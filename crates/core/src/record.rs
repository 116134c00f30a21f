//! Canonical trade record model.
//!
//! A `CanonicalTradeRecord` is the normalized output of the upstream
//! confirmation-extraction stage. Records are created once, tagged with the
//! source system they were extracted for, and are read-only inputs to the
//! matching core.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Extension-map key for a shared cross-system trade reference (e.g. a USI).
pub const EXTERNAL_REFERENCE_KEY: &str = "external_reference";

/// Which counterparty's system a confirmation was extracted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSource {
    Bank,
    Counterparty,
}

impl TradeSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "BANK",
            Self::Counterparty => "COUNTERPARTY",
        }
    }
}

impl fmt::Display for TradeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BANK" => Ok(Self::Bank),
            "COUNTERPARTY" => Ok(Self::Counterparty),
            other => Err(format!("unknown trade source: {other}")),
        }
    }
}

/// One normalized trade confirmation.
///
/// The typed fields are the attributes that participate in matching; anything
/// else the extraction stage produced lands in `attributes`. `trade_id` is
/// source-local and is never compared for equality across sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalTradeRecord {
    pub trade_id: String,
    pub source: TradeSource,
    pub trade_date: Option<NaiveDate>,
    pub effective_date: Option<NaiveDate>,
    pub maturity_date: Option<NaiveDate>,
    pub notional: Option<Decimal>,
    pub currency: Option<String>,
    pub counterparty_name: Option<String>,
    pub fixed_price: Option<Decimal>,
    pub product_type: Option<String>,
    pub commodity_type: Option<String>,
    /// Open extension map for optional attributes that do not enter scoring.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, JsonValue>,
}

impl CanonicalTradeRecord {
    /// Creates a record with only identity populated.
    #[must_use]
    pub fn new(trade_id: impl Into<String>, source: TradeSource) -> Self {
        Self {
            trade_id: trade_id.into(),
            source,
            trade_date: None,
            effective_date: None,
            maturity_date: None,
            notional: None,
            currency: None,
            counterparty_name: None,
            fixed_price: None,
            product_type: None,
            commodity_type: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Shared cross-system reference from the extension map, if present.
    #[must_use]
    pub fn external_reference(&self) -> Option<&str> {
        self.attributes
            .get(EXTERNAL_REFERENCE_KEY)
            .and_then(JsonValue::as_str)
    }

    /// Extension attribute by key.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trade_source_round_trips_from_str() {
        assert_eq!("bank".parse::<TradeSource>().unwrap(), TradeSource::Bank);
        assert_eq!(
            " COUNTERPARTY ".parse::<TradeSource>().unwrap(),
            TradeSource::Counterparty
        );
        assert!("broker".parse::<TradeSource>().is_err());
    }

    #[test]
    fn external_reference_reads_extension_map() {
        let mut record = CanonicalTradeRecord::new("T-1001", TradeSource::Bank);
        assert_eq!(record.external_reference(), None);

        record
            .attributes
            .insert(EXTERNAL_REFERENCE_KEY.to_string(), json!("USI-77-X"));
        assert_eq!(record.external_reference(), Some("USI-77-X"));
    }

    #[test]
    fn non_string_external_reference_is_ignored() {
        let mut record = CanonicalTradeRecord::new("T-1002", TradeSource::Counterparty);
        record
            .attributes
            .insert(EXTERNAL_REFERENCE_KEY.to_string(), json!(12345));
        assert_eq!(record.external_reference(), None);
    }
}
