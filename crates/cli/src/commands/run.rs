use super::{load_config, RunOutput};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use otc_recon_core::events::ReconEvent;
use otc_recon_core::record::{CanonicalTradeRecord, TradeSource};
use otc_recon_core::traits::{ExceptionStore, RecordStore};
use otc_recon_data::{
    CsvStorage, DatabaseClient, EventJournal, ExceptionRepository, MatchResultRepository,
    TradeRepository,
};
use otc_recon_matching::{engine, MatchEngine};
use otc_recon_report::{ReconReport, RunSummary};
use otc_recon_triage::TriageRouter;
use tracing::{info, warn};

pub struct RunArgs {
    pub bank: Option<String>,
    pub counterparty: Option<String>,
    pub from_database: bool,
    pub store: bool,
    pub output: Option<String>,
    pub results_csv: Option<String>,
    pub journal: Option<String>,
    pub profile: Option<String>,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = load_config(args.profile.as_deref())?;

    let (bank_records, counterparty_records) = if args.from_database {
        let db = DatabaseClient::new(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to connect to database")?;
        let trades = TradeRepository::new(db.pool().clone());
        (
            trades.fetch_partition(TradeSource::Bank).await?,
            trades.fetch_partition(TradeSource::Counterparty).await?,
        )
    } else {
        let (Some(bank_path), Some(counterparty_path)) = (&args.bank, &args.counterparty) else {
            bail!("either --from-database or both --bank and --counterparty are required");
        };
        (
            CsvStorage::read_trades(bank_path)?,
            CsvStorage::read_trades(counterparty_path)?,
        )
    };

    let pairs = pair_records(bank_records, counterparty_records);
    info!(pairs = pairs.len(), "evaluating candidate pairs");

    let evaluated_at = Utc::now();
    let match_engine = MatchEngine::new(config.matching.clone());
    let results = match_engine.match_batch(&pairs, evaluated_at);

    let router = TriageRouter::new(config.triage.clone());
    let mut exceptions = Vec::new();
    for result in &results {
        if let Some(mut exception) = engine::exception_for(result) {
            router.triage(&mut exception, None);
            exceptions.push(exception);
        }
    }

    if let Some(path) = &args.journal {
        let mut journal = EventJournal::open(path)?;
        for result in &results {
            journal.append(&engine::event_for(result))?;
        }
        for exception in &exceptions {
            journal.append(&ReconEvent::ExceptionRaised {
                exception_id: exception.exception_id,
                severity: exception.severity,
                destination: exception.routing.map(|r| r.destination),
                timestamp: exception.created_at,
            })?;
        }
        journal.flush()?;
    }

    if args.store {
        let db = DatabaseClient::new(&config.database.url, config.database.max_connections)
            .await
            .context("Failed to connect to database")?;
        db.ensure_schema().await?;

        let result_repo = MatchResultRepository::new(db.pool().clone());
        for result in &results {
            result_repo.insert(result).await?;
        }
        let exception_repo = ExceptionRepository::new(db.pool().clone());
        for exception in &exceptions {
            exception_repo.insert_exception(exception).await?;
        }
        info!(
            results = results.len(),
            exceptions = exceptions.len(),
            "run persisted"
        );
    }

    let summary = RunSummary::from_results(evaluated_at, &results, &exceptions);
    println!("{}", ReconReport::format(&summary));

    if let Some(path) = &args.results_csv {
        CsvStorage::write_results(path, &results)?;
    }

    if let Some(path) = &args.output {
        let run_output = RunOutput {
            summary,
            results,
            exceptions,
        };
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {path}"))?;
        serde_json::to_writer_pretty(file, &run_output)?;
        info!(path = %path, "run output written");
    }

    Ok(())
}

/// Pairs candidate records positionally. Confirmation exports are expected
/// to be row-aligned by the upstream extraction stage; an unpaired tail is
/// reported and skipped.
fn pair_records(
    bank: Vec<CanonicalTradeRecord>,
    counterparty: Vec<CanonicalTradeRecord>,
) -> Vec<(CanonicalTradeRecord, CanonicalTradeRecord)> {
    if bank.len() != counterparty.len() {
        warn!(
            bank = bank.len(),
            counterparty = counterparty.len(),
            "record counts differ, unpaired tail will be skipped"
        );
    }
    bank.into_iter().zip(counterparty).collect()
}
