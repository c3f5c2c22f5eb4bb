//! Error types for keychord core.

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
}

/// A specialized Result type for timer operations.
pub type Result<T> = std::result::Result<T, TimerError>;
