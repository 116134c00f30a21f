//! Policy reward-event row model.

use anyhow::Result;
use chrono::{DateTime, Utc};
use otc_recon_core::events::RewardEvent;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PolicyEventRow {
    pub id: i32,
    pub exception_id: Uuid,
    pub reason_codes: JsonValue,
    pub routed_to: String,
    pub actual_destination: String,
    pub within_sla: bool,
    pub reward: Decimal,
    pub occurred_at: DateTime<Utc>,
}

impl PolicyEventRow {
    #[must_use]
    pub fn from_event(event: &RewardEvent) -> Self {
        Self {
            id: 0, // Assigned by the database.
            exception_id: event.exception_id,
            reason_codes: serde_json::to_value(&event.reason_codes).unwrap_or(JsonValue::Null),
            routed_to: event.routed_to.as_str().to_string(),
            actual_destination: event.actual_destination.as_str().to_string(),
            within_sla: event.within_sla,
            reward: event.reward,
            occurred_at: event.occurred_at,
        }
    }

    /// Reconstructs the reward event.
    ///
    /// # Errors
    /// Returns an error if any stored enum or JSON column is malformed.
    pub fn into_event(self) -> Result<RewardEvent> {
        Ok(RewardEvent {
            exception_id: self.exception_id,
            reason_codes: serde_json::from_value(self.reason_codes)?,
            routed_to: serde_json::from_value(JsonValue::String(self.routed_to))?,
            actual_destination: serde_json::from_value(JsonValue::String(
                self.actual_destination,
            ))?,
            within_sla: self.within_sla,
            reward: self.reward,
            occurred_at: self.occurred_at,
        })
    }
}
