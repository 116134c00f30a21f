pub mod classifier;
pub mod comparator;
pub mod engine;
pub mod integrity;
pub mod scorer;

pub use classifier::MatchClassifier;
pub use comparator::{FieldComparator, FieldComparison};
pub use engine::{event_for, exception_for, MatchEngine, MatchResult};
pub use integrity::{IntegrityChecker, PlacementViolation};
pub use scorer::{MatchScorer, WeightedComparisons, WeightedField};
