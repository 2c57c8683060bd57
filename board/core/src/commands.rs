//! Board Commands
//!
//! The operations a host can issue on an attached board, as one enum. Text
//! commands parse into it:
//!
//! | Text             | Command                                  |
//! |------------------|------------------------------------------|
//! | `current`        | [`BoardCommand::Current`]                |
//! | `next`           | [`BoardCommand::Next`]                   |
//! | `stop`           | `Stop { temporary_only: false }`         |
//! | `stop temporary` | `Stop { temporary_only: true }`          |
//! | `start`          | [`BoardCommand::Start`]                  |
//! | `flip`           | `Flip { target: None }`                  |
//! | `flip <index>`   | `Flip { target: Some(index) }`           |
//! | `detach`         | [`BoardCommand::Detach`]                 |

use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

/// An operation on an attached board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardCommand {
    /// Message on display
    Current,
    /// Message the next flip targets
    Next,
    /// Cancel the repeat timer and abort any flip
    Stop {
        /// Keep auto-repeat enabled
        temporary_only: bool,
    },
    /// Re-enable auto-repeat
    Start,
    /// Flip now, optionally to a specific message
    Flip {
        /// Message index to flip to
        target: Option<usize>,
    },
    /// Stop and remove the board
    Detach,
}

impl BoardCommand {
    /// Command name as used in text form
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Next => "next",
            Self::Stop { .. } => "stop",
            Self::Start => "start",
            Self::Flip { .. } => "flip",
            Self::Detach => "detach",
        }
    }
}

impl fmt::Display for BoardCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop {
                temporary_only: true,
            } => write!(f, "stop temporary"),
            Self::Flip {
                target: Some(target),
            } => write!(f, "flip {target}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for BoardCommand {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(BoardError::InvalidArgument {
                command: name,
                argument: extra.to_string(),
            });
        }

        let invalid = |argument: &str| BoardError::InvalidArgument {
            command: name.clone(),
            argument: argument.to_string(),
        };

        match (name.as_str(), argument) {
            ("current", None) => Ok(Self::Current),
            ("next", None) => Ok(Self::Next),
            ("stop", None) => Ok(Self::Stop {
                temporary_only: false,
            }),
            ("stop", Some(arg)) => match arg.to_lowercase().as_str() {
                "temporary" | "true" => Ok(Self::Stop {
                    temporary_only: true,
                }),
                "false" => Ok(Self::Stop {
                    temporary_only: false,
                }),
                _ => Err(invalid(arg)),
            },
            ("start", None) => Ok(Self::Start),
            ("flip", None) => Ok(Self::Flip { target: None }),
            ("flip", Some(arg)) => arg
                .parse()
                .map(|target| Self::Flip {
                    target: Some(target),
                })
                .map_err(|_| invalid(arg)),
            ("detach", None) => Ok(Self::Detach),
            ("current" | "next" | "start" | "detach", Some(arg)) => Err(invalid(arg)),
            _ => Err(BoardError::UnknownCommand(s.trim().to_string())),
        }
    }
}

/// Result of a successfully executed command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutput {
    /// Getter result; `None` when no board is attached
    Message(Option<String>),
    /// Mutation performed (or ignored on a detached container)
    Done,
}

impl CommandOutput {
    /// The message carried by a getter result
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(message) => message.as_deref(),
            Self::Done => None,
        }
    }
}
