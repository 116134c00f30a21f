use super::{load_config, RunOutput};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use otc_recon_data::{DatabaseClient, MatchResultRepository};
use otc_recon_report::{ReconReport, RunSummary};

pub async fn execute(
    run_path: Option<&str>,
    latest: Option<i64>,
    profile: Option<&str>,
) -> Result<()> {
    if let Some(path) = run_path {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open run output: {path}"))?;
        let run_output: RunOutput =
            serde_json::from_reader(file).context("Malformed run output JSON")?;

        println!("{}", ReconReport::format(&run_output.summary));
        return Ok(());
    }

    let Some(limit) = latest else {
        bail!("either --run or --latest is required");
    };

    let config = load_config(profile)?;
    let db = DatabaseClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;

    let results = MatchResultRepository::new(db.pool().clone())
        .fetch_latest(limit)
        .await?;

    let evaluated_at = results
        .first()
        .map_or_else(Utc::now, |result| result.evaluated_at);
    let summary = RunSummary::from_results(evaluated_at, &results, &[]);
    println!("{}", ReconReport::format(&summary));

    Ok(())
}
