/// Result alias that carries the custom [`WaveViewError`] type.
pub type Result<T> = std::result::Result<T, WaveViewError>;

/// Common error type for the core crate.
///
/// Only construction and insertion requests surface errors. Lifecycle misuse
/// and timing anomalies are absorbed by the animation driver.
#[derive(Debug, thiserror::Error)]
pub enum WaveViewError {
    /// A wave or configuration value violates its invariants.
    #[error("invalid value: {0}")]
    Validation(String),
    /// A layer index does not address an existing position in the stack.
    #[error("layer index {index} is out of range for a stack of {len} waves")]
    IndexOutOfRange { index: usize, len: usize },
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration could not be parsed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl WaveViewError {
    /// Creates a validation error that wraps the provided message.
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    /// Returns `true` for errors caused by rejected input rather than IO.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::IndexOutOfRange { .. })
    }
}
