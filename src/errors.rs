use thiserror::Error;

/// Malformed query criteria. Always a caller defect, never caused by the data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown value {value:?} for {field}")]
    UnknownValue { field: &'static str, value: String },

    #[error("{field} must not be negative (got {value})")]
    NegativePagination { field: &'static str, value: i64 },

    #[error("{field} must be a finite number (got {value})")]
    InvalidNumber { field: &'static str, value: f64 },

    #[error("malformed criteria: {0}")]
    Malformed(String),
}

/// Result type for criteria parsing
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A materialized record that breaks a data model invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantError {
    #[error("property {id}: {field} {reason}")]
    Field {
        id: String,
        field: &'static str,
        reason: String,
    },

    #[error("duplicate property id {0:?}")]
    DuplicateId(String),
}

/// One rejected field of a property submission form.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every problem found in a submission, not just the first.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("submission rejected: {} invalid field(s)", .errors.len())]
pub struct SubmissionError {
    pub errors: Vec<FieldError>,
}

impl SubmissionError {
    /// Whether `field` was among the rejected fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}
