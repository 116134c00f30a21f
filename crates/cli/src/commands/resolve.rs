use super::load_config;
use anyhow::{Context, Result};
use chrono::Utc;
use otc_recon_core::events::ReconEvent;
use otc_recon_core::exception::RoutingDestination;
use otc_recon_data::{DatabaseClient, EventJournal, ExceptionRepository, PolicyEventRepository};
use otc_recon_triage::ResolutionTracker;
use std::sync::Arc;
use uuid::Uuid;

pub async fn assign(exception_id: &str, profile: Option<&str>) -> Result<()> {
    let config = load_config(profile)?;

    let exception_id: Uuid = exception_id
        .parse()
        .context("--exception-id must be a UUID")?;

    let db = DatabaseClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;

    let tracker = ResolutionTracker::new(
        Arc::new(ExceptionRepository::new(db.pool().clone())),
        Arc::new(PolicyEventRepository::new(db.pool().clone())),
    );

    tracker.assign(exception_id).await?;
    println!("Assigned {exception_id}");
    Ok(())
}

pub async fn execute(
    exception_id: &str,
    destination: &str,
    journal: Option<&str>,
    profile: Option<&str>,
) -> Result<()> {
    let config = load_config(profile)?;

    let exception_id: Uuid = exception_id
        .parse()
        .context("--exception-id must be a UUID")?;
    let destination: RoutingDestination = destination
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("--destination must be SENIOR_OPS, OPS_DESK, or AUTO_RESOLVE")?;

    let db = DatabaseClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;

    let tracker = ResolutionTracker::new(
        Arc::new(ExceptionRepository::new(db.pool().clone())),
        Arc::new(PolicyEventRepository::new(db.pool().clone())),
    );

    match tracker.resolve(exception_id, destination, Utc::now()).await? {
        Some(event) => {
            if let Some(path) = journal {
                let mut journal = EventJournal::open(path)?;
                journal.append(&ReconEvent::ExceptionResolved {
                    exception_id,
                    within_sla: event.within_sla,
                    timestamp: event.occurred_at,
                })?;
                journal.append(&ReconEvent::RewardRecorded {
                    exception_id,
                    reward: event.reward,
                    timestamp: event.occurred_at,
                })?;
                journal.flush()?;
            }
            println!(
                "Resolved {exception_id}: reward={} within_sla={}",
                event.reward, event.within_sla
            );
        }
        None => println!("Exception {exception_id} was already resolved; nothing applied."),
    }

    Ok(())
}
