use super::load_config;
use anyhow::{Context, Result};
use otc_recon_core::record::TradeSource;
use otc_recon_core::traits::RecordStore;
use otc_recon_data::{CsvStorage, DatabaseClient, TradeRepository};
use tracing::info;

pub async fn execute(source: &str, input: &str, profile: Option<&str>) -> Result<()> {
    let config = load_config(profile)?;
    let partition: TradeSource = source
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("--source must be bank or counterparty")?;

    let records = CsvStorage::read_trades(input)?;

    let db = DatabaseClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;
    db.ensure_schema().await?;

    let trades = TradeRepository::new(db.pool().clone());
    for record in &records {
        trades.insert_record(partition, record).await?;
    }

    info!(
        partition = %partition,
        count = records.len(),
        "confirmation export ingested"
    );
    println!("Ingested {} records into {partition}", records.len());

    Ok(())
}
