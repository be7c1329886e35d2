//! Errors raised while assembling an [`AppRunner`](crate::AppRunner).

use argot::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A handler was registered for a path with no matching command.
    #[error("no command matches handler path '{0}'")]
    UnknownCommand(String),
}
