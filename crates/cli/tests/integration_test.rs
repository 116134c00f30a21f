use chrono::{NaiveDate, Utc};
use otc_recon_core::config::{MatchingConfig, TriageConfig};
use otc_recon_core::decision::{Classification, DecisionStatus};
use otc_recon_core::record::{CanonicalTradeRecord, TradeSource};
use otc_recon_data::CsvStorage;
use otc_recon_matching::{engine, MatchEngine};
use otc_recon_report::{ReconReport, RunSummary};
use otc_recon_triage::TriageRouter;
use rust_decimal_macros::dec;
use std::io::Write as _;

fn record(
    trade_id: &str,
    source: TradeSource,
    trade_date: (i32, u32, u32),
    notional: rust_decimal::Decimal,
    currency: &str,
    counterparty: &str,
) -> CanonicalTradeRecord {
    let mut record = CanonicalTradeRecord::new(trade_id, source);
    record.trade_date = NaiveDate::from_ymd_opt(trade_date.0, trade_date.1, trade_date.2);
    record.notional = Some(notional);
    record.currency = Some(currency.to_string());
    record.counterparty_name = Some(counterparty.to_string());
    record
}

#[test]
fn full_pipeline_from_records_to_report() {
    let bank = vec![
        record(
            "BANK-1",
            TradeSource::Bank,
            (2025, 3, 4),
            dec!(11160.00),
            "EUR",
            "Merrill Lynch International London",
        ),
        record(
            "BANK-2",
            TradeSource::Bank,
            (2025, 3, 4),
            dec!(50000),
            "USD",
            "Goldman Sachs International",
        ),
    ];
    let counterparty = vec![
        record(
            "CPTY-1",
            TradeSource::Counterparty,
            (2025, 3, 3),
            dec!(11160),
            "EUR",
            "Merrill Lynch International",
        ),
        record(
            "CPTY-2",
            TradeSource::Counterparty,
            (2025, 3, 4),
            dec!(60000),
            "GBP",
            "Barclays Bank PLC",
        ),
    ];

    let pairs: Vec<_> = bank.into_iter().zip(counterparty).collect();
    let evaluated_at = Utc::now();

    let match_engine = MatchEngine::new(MatchingConfig::default());
    let results = match_engine.match_batch(&pairs, evaluated_at);

    assert_eq!(results[0].classification, Classification::Matched);
    assert_eq!(results[0].decision, DecisionStatus::AutoMatch);
    assert_eq!(results[1].decision, DecisionStatus::Exception);

    let router = TriageRouter::new(TriageConfig::default());
    let mut exceptions = Vec::new();
    for result in &results {
        if let Some(mut exception) = engine::exception_for(result) {
            router.triage(&mut exception, None);
            exceptions.push(exception);
        }
    }

    // The second pair disagrees on counterparty name, so rule 1 applies.
    assert_eq!(exceptions.len(), 1);
    let routing = exceptions[0].routing.unwrap();
    assert_eq!(routing.priority, 1);

    let summary = RunSummary::from_results(evaluated_at, &results, &exceptions);
    assert_eq!(summary.total_pairs, 2);
    assert_eq!(summary.matched, 1);

    let rendered = ReconReport::format(&summary);
    assert!(rendered.contains("RECONCILIATION RUN SUMMARY"));
    assert!(rendered.contains("SENIOR_OPS"));
}

#[test]
fn csv_ingest_feeds_the_engine() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "trade_id,source,trade_date,effective_date,maturity_date,notional,currency,counterparty_name,fixed_price,product_type,commodity_type,external_reference"
    )
    .unwrap();
    writeln!(
        file,
        "BANK-1,BANK,2025-03-04,,,11160.00,EUR,Merrill Lynch International London,44.85,,,"
    )
    .unwrap();

    let records = CsvStorage::read_trades(file.path().to_str().unwrap()).expect("read trades");
    assert_eq!(records.len(), 1);

    let counterparty = record(
        "CPTY-1",
        TradeSource::Counterparty,
        (2025, 3, 3),
        dec!(11160),
        "EUR",
        "Merrill Lynch International",
    );

    let match_engine = MatchEngine::new(MatchingConfig::default());
    let result = match_engine.match_pair(&records[0], &counterparty, Utc::now());
    assert_eq!(result.classification, Classification::Matched);
}
