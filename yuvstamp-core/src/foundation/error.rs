/// Convenience result type used across yuvstamp.
pub type YuvstampResult<T> = Result<T, YuvstampError>;

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum YuvstampError {
    /// Malformed or unsupported binary structure in an input file.
    #[error("format error: {0}")]
    Format(String),

    /// Invalid geometry, offset, or color model for the requested operation.
    #[error("argument error: {0}")]
    Argument(String),

    /// A file could not be opened, read, or written.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl YuvstampError {
    /// Build a [`YuvstampError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`YuvstampError::Argument`] value.
    pub fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }

    /// Build a [`YuvstampError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
