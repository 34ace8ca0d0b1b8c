use thiserror::Error;

/// Failure taxonomy for engine operations.
///
/// `NotFound` and `Validation` are expected, recoverable outcomes surfaced
/// to the caller as-is. `Store` wraps an underlying persistence failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable machine-readable code for the output envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Store(_) => "store_error",
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
