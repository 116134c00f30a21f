pub mod ingest;
pub mod report;
pub mod resolve;
pub mod run;
pub mod triage;

use anyhow::Result;
use otc_recon_core::config::AppConfig;
use otc_recon_core::exception::ExceptionRecord;
use otc_recon_core::ConfigLoader;
use otc_recon_matching::MatchResult;
use otc_recon_report::RunSummary;
use serde::{Deserialize, Serialize};

/// Full output of one matching run, written by `run --output` and consumed
/// by `report`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub results: Vec<MatchResult>,
    pub exceptions: Vec<ExceptionRecord>,
}

pub fn load_config(profile: Option<&str>) -> Result<AppConfig> {
    match profile {
        Some(profile) => ConfigLoader::load_with_profile(profile),
        None => ConfigLoader::load(),
    }
}
