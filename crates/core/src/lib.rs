pub mod config;
pub mod config_loader;
pub mod decision;
pub mod errors;
pub mod events;
pub mod exception;
pub mod reason;
pub mod record;
pub mod traits;

pub use config::{AppConfig, DatabaseConfig, MatchingConfig, TriageConfig};
pub use config_loader::ConfigLoader;
pub use decision::{Classification, DecisionStatus};
pub use errors::ComparisonError;
pub use events::{ReconEvent, RewardEvent};
pub use exception::{
    ExceptionRecord, ExceptionSource, ResolutionStatus, RoutingDecision, RoutingDestination,
    SeverityTier,
};
pub use reason::ReasonCode;
pub use record::{CanonicalTradeRecord, TradeSource, EXTERNAL_REFERENCE_KEY};
