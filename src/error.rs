use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum McdmError {
    #[error("no alternatives supplied")]
    EmptyAlternatives,
    #[error("no criteria supplied")]
    EmptyCriteria,
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("alternative {alternative} has no score for criterion {criterion}")]
    MissingScore {
        alternative: String,
        criterion: String,
    },
    #[error(
        "score of alternative {alternative} on criterion {criterion} must be a finite non-negative number, got {value}"
    )]
    InvalidScore {
        alternative: String,
        criterion: String,
        value: f64,
    },
    #[error("weight of criterion {criterion} must be a finite non-negative number, got {value}")]
    InvalidWeight { criterion: String, value: f64 },
    #[error(
        "{method} needs at least {min_alternatives} alternatives and {min_criteria} criteria, got {alternatives} and {criteria}"
    )]
    InsufficientData {
        method: String,
        min_alternatives: usize,
        min_criteria: usize,
        alternatives: usize,
        criteria: usize,
    },
    #[error(
        "{method} method requires all values to be greater than zero. Please check your decision matrix ({})",
        .invalid_cells.join(", ")
    )]
    NonPositiveScore {
        method: String,
        invalid_cells: Vec<String>,
    },
    #[error("unsupported {kind} method: {name}")]
    UnsupportedMethod { kind: &'static str, name: String },
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("{method} requires parameter {name}")]
    MissingParameter { method: String, name: String },
    #[error("{name} must be {expected}x{expected}, got {rows}x{cols}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{method}: matrix (I - X) is singular, total-relation matrix cannot be computed")]
    SingularMatrix { method: String },
    #[error("{method}: weights must not all be zero")]
    AllZeroWeights { method: String },
    #[error("{method} computation did not complete: {reason}")]
    TaskFailed { method: String, reason: String },
}

impl McdmError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_parameter(method: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingParameter {
            method: method.into(),
            name: name.into(),
        }
    }

    /// Caller mistakes, as opposed to inputs the numeric core cannot process.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::SingularMatrix { .. } | Self::TaskFailed { .. })
    }
}
