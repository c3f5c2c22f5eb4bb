//! Error types for keychord.
//!
//! Matching itself never fails; only loading configuration does.

use std::path::PathBuf;

/// Result type alias for keychord operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading hotkey configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The TOML could not be parsed into a configuration.
    #[error("Invalid hotkey config: {0}")]
    Parse(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read hotkey config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
