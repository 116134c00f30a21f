//! Trade record row model.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use otc_recon_core::record::{CanonicalTradeRecord, TradeSource};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Row shape shared by the `bank_trades` and `counterparty_trades` tables.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TradeRow {
    pub trade_id: String,
    pub source: String,
    pub trade_date: Option<NaiveDate>,
    pub effective_date: Option<NaiveDate>,
    pub maturity_date: Option<NaiveDate>,
    pub notional: Option<Decimal>,
    pub currency: Option<String>,
    pub counterparty_name: Option<String>,
    pub fixed_price: Option<Decimal>,
    pub product_type: Option<String>,
    pub commodity_type: Option<String>,
    pub attributes: Option<JsonValue>,
}

impl TradeRow {
    #[must_use]
    pub fn from_record(record: &CanonicalTradeRecord) -> Self {
        let attributes = if record.attributes.is_empty() {
            None
        } else {
            serde_json::to_value(&record.attributes).ok()
        };

        Self {
            trade_id: record.trade_id.clone(),
            source: record.source.as_str().to_string(),
            trade_date: record.trade_date,
            effective_date: record.effective_date,
            maturity_date: record.maturity_date,
            notional: record.notional,
            currency: record.currency.clone(),
            counterparty_name: record.counterparty_name.clone(),
            fixed_price: record.fixed_price,
            product_type: record.product_type.clone(),
            commodity_type: record.commodity_type.clone(),
            attributes,
        }
    }

    /// Converts the row back into a canonical record.
    ///
    /// # Errors
    /// Returns an error if the stored source tag or attribute map is
    /// malformed.
    pub fn into_record(self) -> Result<CanonicalTradeRecord> {
        let source: TradeSource = self
            .source
            .parse()
            .map_err(|e: String| anyhow!(e))?;

        let attributes: BTreeMap<String, JsonValue> = match self.attributes {
            Some(value) => serde_json::from_value(value)?,
            None => BTreeMap::new(),
        };

        Ok(CanonicalTradeRecord {
            trade_id: self.trade_id,
            source,
            trade_date: self.trade_date,
            effective_date: self.effective_date,
            maturity_date: self.maturity_date,
            notional: self.notional,
            currency: self.currency,
            counterparty_name: self.counterparty_name,
            fixed_price: self.fixed_price,
            product_type: self.product_type,
            commodity_type: self.commodity_type,
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn row_round_trips_a_record() {
        let mut record = CanonicalTradeRecord::new("T-55", TradeSource::Bank);
        record.notional = Some(dec!(1000000.50));
        record.currency = Some("USD".to_string());
        record
            .attributes
            .insert("settlement_type".to_string(), json!("physical"));

        let row = TradeRow::from_record(&record);
        let restored = row.into_record().unwrap();

        assert_eq!(restored.trade_id, "T-55");
        assert_eq!(restored.source, TradeSource::Bank);
        assert_eq!(restored.notional, Some(dec!(1000000.50)));
        assert_eq!(
            restored.attribute("settlement_type"),
            Some(&json!("physical"))
        );
    }

    #[test]
    fn unknown_source_tag_is_rejected() {
        let mut row = TradeRow::from_record(&CanonicalTradeRecord::new("T-1", TradeSource::Bank));
        row.source = "BROKER".to_string();
        assert!(row.into_record().is_err());
    }
}
