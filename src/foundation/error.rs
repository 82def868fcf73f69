/// Crate-wide result alias.
pub type ReelResult<T> = Result<T, ReelError>;

/// Every failure mode of a render run.
///
/// None of these are recovered from: the driver aborts on the first error and the binary exits
/// with a non-zero code after tearing down the sink, renderer and script runtime.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// The script file is missing, unreadable, does not parse, or raised at top level.
    #[error("script load error: {0}")]
    ScriptLoad(String),

    /// A configuration global is missing, mistyped or out of range.
    #[error("config error: {0}")]
    Config(String),

    /// The per-frame callback (or a primitive it called) raised.
    #[error("render error: {0}")]
    Render(String),

    /// The encoder subprocess could not be started.
    #[error("encoder spawn error: {0}")]
    EncoderSpawn(String),

    /// Writing to (or finalizing) the encoder subprocess failed.
    #[error("encoder io error: {0}")]
    EncoderIo(String),

    /// Caller-supplied values violate an API contract.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error (filesystem, image encoding, ...).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::ScriptLoad`].
    pub fn script_load(msg: impl Into<String>) -> Self {
        Self::ScriptLoad(msg.into())
    }

    /// Build a [`ReelError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ReelError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::EncoderSpawn`].
    pub fn encoder_spawn(msg: impl Into<String>) -> Self {
        Self::EncoderSpawn(msg.into())
    }

    /// Build a [`ReelError::EncoderIo`].
    pub fn encoder_io(msg: impl Into<String>) -> Self {
        Self::EncoderIo(msg.into())
    }

    /// Build a [`ReelError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
