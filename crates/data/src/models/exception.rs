//! Exception row model.

use anyhow::Result;
use chrono::{DateTime, Utc};
use otc_recon_core::exception::{ExceptionRecord, RoutingDecision};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExceptionRow {
    pub exception_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub source_event: String,
    pub trade_id: Option<String>,
    pub match_score: Option<Decimal>,
    pub reason_codes: JsonValue,
    pub severity_score: Decimal,
    pub severity: String,
    pub routing_destination: Option<String>,
    pub priority: Option<i16>,
    pub sla_deadline: Option<DateTime<Utc>>,
    pub resolution: String,
}

impl ExceptionRow {
    #[must_use]
    pub fn from_record(record: &ExceptionRecord) -> Self {
        Self {
            exception_id: record.exception_id,
            created_at: record.created_at,
            source_event: enum_str(&record.source_event),
            trade_id: record.trade_id.clone(),
            match_score: record.match_score,
            reason_codes: serde_json::to_value(&record.reason_codes)
                .unwrap_or(JsonValue::Null),
            severity_score: record.severity_score,
            severity: record.severity.as_str().to_string(),
            routing_destination: record
                .routing
                .map(|r| r.destination.as_str().to_string()),
            priority: record.routing.map(|r| i16::from(r.priority)),
            sla_deadline: record.routing.map(|r| r.sla_deadline),
            resolution: enum_str(&record.resolution),
        }
    }

    /// Reconstructs the exception record.
    ///
    /// # Errors
    /// Returns an error if any stored enum or JSON column is malformed.
    pub fn into_record(self) -> Result<ExceptionRecord> {
        let severity = serde_json::from_value(JsonValue::String(self.severity))?;

        let routing = match (self.routing_destination, self.priority, self.sla_deadline) {
            (Some(destination), Some(priority), Some(sla_deadline)) => Some(RoutingDecision {
                destination: serde_json::from_value(JsonValue::String(destination))?,
                severity,
                priority: u8::try_from(priority)?,
                sla_deadline,
            }),
            _ => None,
        };

        Ok(ExceptionRecord {
            exception_id: self.exception_id,
            created_at: self.created_at,
            source_event: serde_json::from_value(JsonValue::String(self.source_event))?,
            trade_id: self.trade_id,
            match_score: self.match_score,
            reason_codes: serde_json::from_value(self.reason_codes)?,
            severity_score: self.severity_score,
            severity,
            routing,
            resolution: serde_json::from_value(JsonValue::String(self.resolution))?,
        })
    }
}

fn enum_str<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(ToString::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use otc_recon_core::exception::{
        ExceptionSource, ResolutionStatus, RoutingDestination, SeverityTier,
    };
    use otc_recon_core::reason::ReasonCode;
    use rust_decimal_macros::dec;

    #[test]
    fn row_round_trips_a_routed_exception() {
        let mut record = ExceptionRecord::new(
            ExceptionSource::MatchBreak,
            Some("T-9".to_string()),
            Some(dec!(0.40)),
            [ReasonCode::NotionalMismatch].into_iter().collect(),
            "2025-03-05T10:00:00Z".parse().unwrap(),
        );
        record.apply_severity(dec!(0.48));
        record.apply_routing(RoutingDecision {
            destination: RoutingDestination::OpsDesk,
            severity: SeverityTier::Medium,
            priority: 3,
            sla_deadline: "2025-03-05T18:00:00Z".parse().unwrap(),
        });
        record.mark_assigned();

        let row = ExceptionRow::from_record(&record);
        let restored = row.into_record().unwrap();

        assert_eq!(restored.exception_id, record.exception_id);
        assert_eq!(restored.severity, SeverityTier::Medium);
        assert_eq!(restored.resolution, ResolutionStatus::Assigned);
        assert_eq!(
            restored.routing.unwrap().destination,
            RoutingDestination::OpsDesk
        );
    }

    #[test]
    fn unrouted_exception_round_trips_without_routing() {
        let record = ExceptionRecord::new(
            ExceptionSource::ProcessingFailure,
            None,
            None,
            [ReasonCode::ProcessingError].into_iter().collect(),
            "2025-03-05T10:00:00Z".parse().unwrap(),
        );

        let restored = ExceptionRow::from_record(&record).into_record().unwrap();
        assert!(restored.routing.is_none());
        assert_eq!(restored.resolution, ResolutionStatus::Pending);
    }
}
