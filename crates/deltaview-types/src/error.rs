use thiserror::Error;

/// Errors produced while decoding deltas.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A delta node matched none of the known wire shapes.
    #[error("unrecognized delta shape at {path}: {shape}")]
    UnrecognizedDelta { path: String, shape: String },

    /// A delta node lies deeper than the decoding depth limit.
    #[error("delta nested deeper than {max_depth} levels at {path}")]
    DepthExceeded { path: String, max_depth: usize },
}

/// Result alias for type-level operations.
pub type TypeResult<T> = Result<T, TypeError>;
