use thiserror::Error;

/// Boxed cause from an opaque user-supplied row/reduce function.
pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error taxonomy. Every operator is a pure function of its inputs,
/// so nothing here is retryable; surfacing the error with no partial result
/// is the whole contract.
#[derive(Debug, Error)]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("type mismatch in column '{column}': declared {expected}, got {actual}")]
    Type {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("user function failed")]
    Eval {
        #[source]
        source: DynError,
    },

    #[error("internal invariant failed: {0}")]
    Invariant(String),
}

impl Error {
    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    pub fn eval(source: DynError) -> Self {
        Error::Eval { source }
    }
}
