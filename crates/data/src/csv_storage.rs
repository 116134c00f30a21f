use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use otc_recon_core::reason::ReasonCode;
use otc_recon_core::record::{CanonicalTradeRecord, TradeSource, EXTERNAL_REFERENCE_KEY};
use otc_recon_matching::MatchResult;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs::File;

/// One line of a trade confirmation CSV export.
///
/// The `source` column is taken at face value; a record whose tag disagrees
/// with the file it arrived in surfaces later as a data-integrity violation.
#[derive(Debug, Deserialize)]
struct CsvTradeRow {
    trade_id: String,
    source: String,
    trade_date: Option<NaiveDate>,
    effective_date: Option<NaiveDate>,
    maturity_date: Option<NaiveDate>,
    notional: Option<Decimal>,
    currency: Option<String>,
    counterparty_name: Option<String>,
    fixed_price: Option<Decimal>,
    product_type: Option<String>,
    commodity_type: Option<String>,
    external_reference: Option<String>,
}

pub struct CsvStorage;

impl CsvStorage {
    /// Reads canonical trade records from a CSV export.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, a row fails to parse, or
    /// a source tag is unknown.
    pub fn read_trades(path: &str) -> Result<Vec<CanonicalTradeRecord>> {
        let mut reader =
            Reader::from_path(path).with_context(|| format!("Failed to open CSV file: {path}"))?;

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<CsvTradeRow>().enumerate() {
            let row = row.with_context(|| format!("Malformed row {} in {path}", index + 2))?;

            let source: TradeSource = row
                .source
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .with_context(|| format!("Row {} in {path}", index + 2))?;

            let mut record = CanonicalTradeRecord::new(row.trade_id, source);
            record.trade_date = row.trade_date;
            record.effective_date = row.effective_date;
            record.maturity_date = row.maturity_date;
            record.notional = row.notional;
            record.currency = row.currency;
            record.counterparty_name = row.counterparty_name;
            record.fixed_price = row.fixed_price;
            record.product_type = row.product_type;
            record.commodity_type = row.commodity_type;
            if let Some(reference) = row.external_reference {
                if !reference.trim().is_empty() {
                    record
                        .attributes
                        .insert(EXTERNAL_REFERENCE_KEY.to_string(), JsonValue::String(reference));
                }
            }

            records.push(record);
        }

        Ok(records)
    }

    /// Writes match results to a CSV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    pub fn write_results(path: &str, results: &[MatchResult]) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create CSV file: {path}"))?;
        let mut writer = Writer::from_writer(file);

        writer.write_record([
            "bank_trade_id",
            "counterparty_trade_id",
            "classification",
            "match_score",
            "decision",
            "reason_codes",
        ])?;

        for result in results {
            let codes: Vec<&str> = result.reason_codes.iter().map(ReasonCode::as_str).collect();
            writer.write_record(&[
                result.bank_trade_id.clone(),
                result.counterparty_trade_id.clone(),
                result.classification.as_str().to_string(),
                result.match_score.to_string(),
                result.decision.as_str().to_string(),
                codes.join(";"),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write as _;

    #[test]
    fn reads_trade_records_from_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "trade_id,source,trade_date,effective_date,maturity_date,notional,currency,counterparty_name,fixed_price,product_type,commodity_type,external_reference"
        )
        .unwrap();
        writeln!(
            file,
            "BANK-1,BANK,2025-03-04,,,11160.00,EUR,Merrill Lynch International London,44.85,Commodity Swap,,USI-77"
        )
        .unwrap();
        writeln!(file, "BANK-2,BANK,,,,,,,,,,").unwrap();

        let records = CsvStorage::read_trades(file.path().to_str().unwrap()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].trade_id, "BANK-1");
        assert_eq!(records[0].source, TradeSource::Bank);
        assert_eq!(records[0].notional, Some(dec!(11160.00)));
        assert_eq!(records[0].external_reference(), Some("USI-77"));
        assert_eq!(records[1].notional, None);
        assert_eq!(records[1].external_reference(), None);
    }

    #[test]
    fn unknown_source_tag_fails_with_row_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "trade_id,source,trade_date,effective_date,maturity_date,notional,currency,counterparty_name,fixed_price,product_type,commodity_type,external_reference"
        )
        .unwrap();
        writeln!(file, "T-1,BROKER,,,,,,,,,,").unwrap();

        let error = CsvStorage::read_trades(file.path().to_str().unwrap()).unwrap_err();
        assert!(error.to_string().contains("Row 2"));
    }

    #[test]
    fn writes_results_with_reason_codes() {
        use otc_recon_core::decision::{Classification, DecisionStatus};

        let results = vec![MatchResult {
            bank_trade_id: "B-1".to_string(),
            counterparty_trade_id: "C-1".to_string(),
            classification: Classification::Break,
            match_score: dec!(0.31),
            decision: DecisionStatus::Exception,
            reason_codes: [ReasonCode::CurrencyMismatch, ReasonCode::DateMismatch]
                .into_iter()
                .collect(),
            differences: Vec::new(),
            evaluated_at: "2025-03-05T09:00:00Z".parse().unwrap(),
        }];

        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        CsvStorage::write_results(&path, &results).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("BREAK"));
        // BTreeSet order follows the reason-code declaration order.
        assert!(written.contains("DATE_MISMATCH;CURRENCY_MISMATCH"));
    }
}
