//! Board Errors

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced to callers of the board interface
///
/// Commands on a container without a board are not errors: getters return
/// `None` and mutating commands do nothing.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The command name is not recognized
    #[error("Unknown board command: {0}")]
    UnknownCommand(String),

    /// The command was recognized but its argument is malformed
    #[error("Invalid argument {argument:?} for board command {command}")]
    InvalidArgument {
        /// Command name
        command: String,
        /// Offending argument
        argument: String,
    },

    /// The board configuration was rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}
