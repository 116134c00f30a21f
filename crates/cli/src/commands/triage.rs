use super::load_config;
use anyhow::{Context, Result};
use otc_recon_core::exception::ResolutionStatus;
use otc_recon_core::traits::{ExceptionStore, PolicyEventStore};
use otc_recon_data::{DatabaseClient, ExceptionRepository, PolicyEventRepository};
use otc_recon_triage::{LearnedPolicy, TriageRouter};
use tracing::info;

pub async fn execute(profile: Option<&str>) -> Result<()> {
    let config = load_config(profile)?;

    let db = DatabaseClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;
    db.ensure_schema().await?;

    let exception_repo = ExceptionRepository::new(db.pool().clone());
    let policy_repo = PolicyEventRepository::new(db.pool().clone());

    let reward_events = policy_repo.fetch_rewards().await?;
    let policy = LearnedPolicy::from_events(&reward_events, &config.triage);
    info!(
        events = reward_events.len(),
        learned_routes = policy.has_routes(),
        "learned policy recomputed"
    );

    let router = TriageRouter::new(config.triage.clone());
    let mut pending = exception_repo
        .fetch_by_status(ResolutionStatus::Pending)
        .await?;

    if pending.is_empty() {
        println!("No pending exceptions.");
        return Ok(());
    }

    for exception in &mut pending {
        router.triage(exception, Some(&policy));
        exception_repo.update_exception(exception).await?;

        let routing = exception.routing.expect("routed above");
        println!(
            "{}  severity={} ({})  -> {}  priority={}  sla={}",
            exception.exception_id,
            exception.severity_score,
            exception.severity,
            routing.destination,
            routing.priority,
            routing.sla_deadline.format("%Y-%m-%d %H:%M UTC")
        );
    }

    println!("Routed {} exceptions.", pending.len());
    Ok(())
}
