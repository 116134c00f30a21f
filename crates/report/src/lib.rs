//! Run-summary reporting.
//!
//! Aggregates one matching run into a `RunSummary` and renders it as a
//! banner-style text report for operations staff.

#![allow(clippy::format_push_string)]

use chrono::{DateTime, Utc};
use otc_recon_core::decision::{Classification, DecisionStatus};
use otc_recon_core::exception::{ExceptionRecord, RoutingDestination};
use otc_recon_core::reason::ReasonCode;
use otc_recon_matching::MatchResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One line of break detail in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakLine {
    pub bank_trade_id: String,
    pub counterparty_trade_id: String,
    pub classification: Classification,
    pub match_score: Decimal,
    pub reason_codes: BTreeSet<ReasonCode>,
}

/// Aggregated view of one matching run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub evaluated_at: DateTime<Utc>,
    pub total_pairs: usize,
    pub matched: usize,
    pub probable_matches: usize,
    pub review_required: usize,
    pub breaks: usize,
    pub data_errors: usize,
    pub auto_match_rate: Decimal,
    pub mean_match_score: Decimal,
    pub exceptions_by_destination: BTreeMap<RoutingDestination, usize>,
    pub break_lines: Vec<BreakLine>,
}

impl RunSummary {
    /// Builds a summary from the results of one batch and the exceptions it
    /// raised.
    #[must_use]
    pub fn from_results(
        evaluated_at: DateTime<Utc>,
        results: &[MatchResult],
        exceptions: &[ExceptionRecord],
    ) -> Self {
        let count_of = |classification: Classification| {
            results
                .iter()
                .filter(|r| r.classification == classification)
                .count()
        };

        let matched = count_of(Classification::Matched);
        let total_pairs = results.len();

        let auto_match_rate = if total_pairs == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(matched as u64) / Decimal::from(total_pairs as u64)).round_dp(4)
        };

        let scored: Vec<Decimal> = results
            .iter()
            .filter(|r| r.classification != Classification::DataError)
            .map(|r| r.match_score)
            .collect();
        let mean_match_score = if scored.is_empty() {
            Decimal::ZERO
        } else {
            (scored.iter().copied().sum::<Decimal>() / Decimal::from(scored.len() as u64))
                .round_dp(2)
        };

        let mut exceptions_by_destination: BTreeMap<RoutingDestination, usize> = BTreeMap::new();
        for exception in exceptions {
            if let Some(routing) = &exception.routing {
                *exceptions_by_destination
                    .entry(routing.destination)
                    .or_insert(0) += 1;
            }
        }

        let break_lines = results
            .iter()
            .filter(|r| r.decision == DecisionStatus::Exception)
            .map(|r| BreakLine {
                bank_trade_id: r.bank_trade_id.clone(),
                counterparty_trade_id: r.counterparty_trade_id.clone(),
                classification: r.classification,
                match_score: r.match_score,
                reason_codes: r.reason_codes.clone(),
            })
            .collect();

        Self {
            evaluated_at,
            total_pairs,
            matched,
            probable_matches: count_of(Classification::ProbableMatch),
            review_required: count_of(Classification::ReviewRequired),
            breaks: count_of(Classification::Break),
            data_errors: count_of(Classification::DataError),
            auto_match_rate,
            mean_match_score,
            exceptions_by_destination,
            break_lines,
        }
    }
}

pub struct ReconReport;

impl ReconReport {
    #[must_use]
    pub fn format(summary: &RunSummary) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                 RECONCILIATION RUN SUMMARY                    \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str(&format!(
            "Evaluated:             {}\n",
            summary.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("Candidate Pairs:       {}\n", summary.total_pairs));
        output.push('\n');

        output.push_str("Classification\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("Matched:               {}\n", summary.matched));
        output.push_str(&format!(
            "Probable Matches:      {}\n",
            summary.probable_matches
        ));
        output.push_str(&format!(
            "Review Required:       {}\n",
            summary.review_required
        ));
        output.push_str(&format!("Breaks:                {}\n", summary.breaks));
        output.push_str(&format!("Data Errors:           {}\n", summary.data_errors));
        output.push_str(&format!(
            "Auto-Match Rate:       {:.2}%\n",
            summary.auto_match_rate * Decimal::ONE_HUNDRED
        ));
        output.push_str(&format!(
            "Mean Match Score:      {}\n",
            summary.mean_match_score
        ));
        output.push('\n');

        if !summary.exceptions_by_destination.is_empty() {
            output.push_str("Exception Routing\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (destination, count) in &summary.exceptions_by_destination {
                output.push_str(&format!("{:<22} {}\n", format!("{destination}:"), count));
            }
            output.push('\n');
        }

        if !summary.break_lines.is_empty() {
            output.push_str("Unmatched Pairs\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for line in &summary.break_lines {
                let codes: Vec<&str> = line.reason_codes.iter().map(ReasonCode::as_str).collect();
                output.push_str(&format!(
                    "{} / {}  {}  score={}  [{}]\n",
                    line.bank_trade_id,
                    line.counterparty_trade_id,
                    line.classification,
                    line.match_score,
                    codes.join(", ")
                ));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");

        if summary.total_pairs == 0 {
            output.push_str("\nNo candidate pairs were evaluated in this run.\n\n");
        }

        output
    }
}
