use thiserror::Error;

/// Raised by a field comparator for structurally invalid input.
///
/// Missing values are never an error (they score neutrally); this fires only
/// when a value is present but cannot be interpreted, and the caller must
/// short-circuit the pair to a `DATA_ERROR` classification.
#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("field `{field}` is not numeric: {value}")]
    InvalidNumeric { field: String, value: String },

    #[error("field `{field}` is not a valid date: {value}")]
    InvalidDate { field: String, value: String },

    #[error("field `{field}` has an unsupported value type")]
    UnsupportedValue { field: String },
}
