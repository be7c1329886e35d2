//! Error types for input sources.

use std::io;
use std::path::PathBuf;

/// Errors raised while reading input sources.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Failed to read from stdin.
    #[error("Failed to read stdin: {0}")]
    StdinFailed(#[source] io::Error),

    /// An app settings file could not be read.
    #[error("Failed to read settings file {}: {source}", .path.display())]
    SettingsUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An app settings document is not a flat key/value map.
    #[error("Invalid app settings: {0}")]
    SettingsInvalid(String),
}
