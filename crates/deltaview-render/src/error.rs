//! Error types for the render crate.
//!
//! The structural renderer itself is infallible. These errors come from the
//! surrounding pipeline: parsing input documents, strict delta decoding, and
//! loading configuration.

use std::fmt;

/// Which input document an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    From,
    To,
    Delta,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::From => "from",
            Self::To => "to",
            Self::Delta => "delta",
        };
        f.write_str(name)
    }
}

/// Errors that can occur around a render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// An input document is not valid JSON.
    #[error("failed to parse {side} document: {message}")]
    Parse { side: Side, message: String },

    /// Strict decoding rejected the delta.
    #[error("delta error: {0}")]
    Delta(#[from] deltaview_types::TypeError),

    /// The configuration is invalid or could not be decoded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading an input or configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for render results.
pub type RenderResult<T> = Result<T, RenderError>;
