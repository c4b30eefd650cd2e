/// Errors raised while a renderer writes to its output handle.
///
/// These never escape a [`ProgressReporter`](crate::progress::ProgressReporter)
/// call. Renderers log them with `tracing` and carry on, since progress is
/// advisory and must not fail the operation it decorates.
#[derive(thiserror::Error, Debug)]
pub enum ProgressError {
    /// Writing or flushing the output handle failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON progress event could not be encoded.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors in progress configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias for results carrying a [`ProgressError`].
pub type Result<T> = std::result::Result<T, ProgressError>;
