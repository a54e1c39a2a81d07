use thiserror::Error;

/// Errors raised when a caller breaks an invariant of the ordering engine.
///
/// Missing workload or correlation data is not an error: the affected component falls back to a
/// documented default and logs a warning instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignerError {
    #[error("Missing weight for {0}")]
    MissingWeight(String),

    #[error("Unknown {kind} '{key}'")]
    UnknownKey { kind: &'static str, key: String },

    #[error("No statistics for table '{0}'")]
    MissingStatistics(String),

    #[error("Table '{0}' has no vertex in the dependency graph")]
    MissingVertex(String),

    #[error("Composite attribute needs at least two distinct bases, got {0}")]
    InvalidComposite(usize),
}

impl DesignerError {
    pub(crate) fn unknown<K: ToString>(kind: &'static str, key: &K) -> Self {
        DesignerError::UnknownKey {
            kind,
            key: key.to_string(),
        }
    }
}

pub type DesignResult<T> = Result<T, DesignerError>;
