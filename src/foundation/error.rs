/// Convenience result type used across physclip.
pub type PhysclipResult<T> = Result<T, PhysclipError>;

/// Top-level error taxonomy.
///
/// Variants split into two groups, see [`PhysclipError::severity`]: recoverable ones discard the
/// current scenario attempt and retry it with fresh parameters, fatal ones stop the process.
#[derive(thiserror::Error, Debug)]
pub enum PhysclipError {
    /// The world rejected an actor.
    #[error("spawn error: {0}")]
    Spawn(String),

    /// Fewer than two distinct occlusion windows were found.
    #[error("insufficient occlusion windows: {0}")]
    InsufficientOcclusionWindows(String),

    /// No candidate tick satisfied the cross-run consistency check.
    #[error("no valid magic tick: {0}")]
    NoValidMagicTick(String),

    /// Two runs disagree on a frame that must be identical.
    #[error("frame mismatch: {0}")]
    FrameMismatch(String),

    /// A run invariant (overlap, lost actor) failed while simulating.
    #[error("invalid run: {0}")]
    InvalidRun(String),

    /// Telemetry bookkeeping produced series of different lengths.
    #[error("length mismatch: {0}")]
    LengthMismatch(String),

    /// Captured media could not be persisted.
    #[error("media save failure: {0}")]
    MediaSave(String),

    /// Invalid configuration, scene list or scene parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing JSON documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// A scene failed more often than the configured attempt budget.
    #[error("retries exhausted: {0}")]
    RetriesExhausted(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// How the director must react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Discard the attempt and retry with regenerated parameters.
    Recoverable,
    /// Stop generating.
    Fatal,
}

impl PhysclipError {
    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    pub fn insufficient_windows(msg: impl Into<String>) -> Self {
        Self::InsufficientOcclusionWindows(msg.into())
    }

    pub fn no_magic_tick(msg: impl Into<String>) -> Self {
        Self::NoValidMagicTick(msg.into())
    }

    pub fn frame_mismatch(msg: impl Into<String>) -> Self {
        Self::FrameMismatch(msg.into())
    }

    pub fn invalid_run(msg: impl Into<String>) -> Self {
        Self::InvalidRun(msg.into())
    }

    pub fn length_mismatch(msg: impl Into<String>) -> Self {
        Self::LengthMismatch(msg.into())
    }

    pub fn media_save(msg: impl Into<String>) -> Self {
        Self::MediaSave(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Classify the error for the director's retry loop.
    pub fn severity(&self) -> Severity {
        match self {
            Self::InsufficientOcclusionWindows(_)
            | Self::NoValidMagicTick(_)
            | Self::FrameMismatch(_)
            | Self::InvalidRun(_) => Severity::Recoverable,
            Self::Spawn(_)
            | Self::LengthMismatch(_)
            | Self::MediaSave(_)
            | Self::Validation(_)
            | Self::Serde(_)
            | Self::RetriesExhausted(_)
            | Self::Other(_) => Severity::Fatal,
        }
    }

    /// Shorthand for `severity() == Severity::Recoverable`.
    pub fn is_recoverable(&self) -> bool {
        self.severity() == Severity::Recoverable
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
