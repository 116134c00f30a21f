use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub triage: TriageConfig,
    pub database: DatabaseConfig,
}

/// Tolerances for the field comparators.
///
/// Classification thresholds and scoring weights are deliberately NOT here:
/// they are fixed constants so that a re-run over the same records is always
/// bit-identical regardless of deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Full-score band for date comparisons, in calendar days.
    pub date_tolerance_days: i64,
    /// Day difference at which a date score linearly decays to zero.
    pub date_zero_score_days: i64,
    /// Full-score band for notional comparisons, in percent (0.01 = 0.01%).
    pub notional_tolerance_pct: Decimal,
    /// Relative difference in percent at which the notional score reaches zero.
    pub notional_zero_score_pct: Decimal,
    /// Similarity at or above which a fuzzy text field counts as a full match.
    pub counterparty_match_threshold: Decimal,
    /// Extension-map attributes compared for reporting when present on both sides.
    pub compare_attributes: Vec<String>,
    /// Subset of `compare_attributes` that must parse as decimals.
    pub numeric_attributes: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            date_tolerance_days: 1,
            date_zero_score_days: 3,
            notional_tolerance_pct: Decimal::new(1, 2), // 0.01%
            notional_zero_score_pct: Decimal::new(2, 0), // 2%
            counterparty_match_threshold: Decimal::new(80, 2),
            compare_attributes: vec![
                "quantity".to_string(),
                "settlement_type".to_string(),
                "broker_reference".to_string(),
            ],
            numeric_attributes: vec!["quantity".to_string(), "strike_price".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Minimum resolved samples before the learned policy may suggest a route.
    pub min_policy_samples: usize,
    /// Absolute bound on the learned severity adjustment.
    pub policy_adjustment_bound: Decimal,
    pub critical_sla_hours: i64,
    pub high_sla_hours: i64,
    pub medium_sla_hours: i64,
    pub low_sla_hours: i64,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            min_policy_samples: 3,
            policy_adjustment_bound: Decimal::new(5, 2),
            critical_sla_hours: 2,
            high_sla_hours: 4,
            medium_sla_hours: 8,
            low_sla_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/otc_recon".to_string(),
            max_connections: 10,
        }
    }
}
