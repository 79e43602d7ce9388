//! Error types for parsing and dispatch failures.
//!
//! Every failure the parser can report is a [`CommandError`] variant. Each
//! variant carries the name of the command being parsed when one was
//! selected, so callers can render that command's usage next to the message.

use thiserror::Error;

use crate::value::ScalarKind;

/// Broad classification of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A token could not be converted to its parameter's type.
    Coercion,
    /// A named option is not declared and the command has no open keyword bag.
    UnknownOption,
    /// A required slot remained empty after reconciliation.
    MissingRequiredArgument,
    /// Bare tokens were left over, or a marker appeared twice.
    TooManyArguments,
    /// No command could be selected.
    NoCommandSpecified,
}

/// Errors surfaced while selecting a command and parsing its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// An option value could not be coerced.
    #[error("{name} value {value:?} must be {expected}")]
    Coercion {
        command: String,
        name: String,
        value: String,
        expected: ScalarKind,
    },

    /// An undeclared named option was supplied.
    #[error("unknown option --{name}")]
    UnknownOption { command: String, name: String },

    /// A required parameter was not given.
    #[error("required argument '{name}' not given")]
    MissingRequiredArgument { command: String, name: String },

    /// Bare tokens remained after every slot was filled.
    #[error("too many arguments to {command}: {}", .extra.join(" "))]
    TooManyArguments { command: String, extra: Vec<String> },

    /// The end-of-options marker appeared more than once.
    #[error("'--' may only be given once to {command}")]
    RepeatedEndOfOptions { command: String },

    /// The standard-input marker appeared more than once.
    #[error("'-' (standard input) may only be given once to {command}")]
    RepeatedStdinMarker { command: String },

    /// No command name was given and there is no default command.
    #[error("no command specified")]
    NoCommandSpecified,
}

impl CommandError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Coercion { .. } => ErrorKind::Coercion,
            Self::UnknownOption { .. } => ErrorKind::UnknownOption,
            Self::MissingRequiredArgument { .. } => ErrorKind::MissingRequiredArgument,
            Self::TooManyArguments { .. }
            | Self::RepeatedEndOfOptions { .. }
            | Self::RepeatedStdinMarker { .. } => ErrorKind::TooManyArguments,
            Self::NoCommandSpecified => ErrorKind::NoCommandSpecified,
        }
    }

    /// Returns the command being parsed when the error occurred.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Coercion { command, .. }
            | Self::UnknownOption { command, .. }
            | Self::MissingRequiredArgument { command, .. }
            | Self::TooManyArguments { command, .. }
            | Self::RepeatedEndOfOptions { command }
            | Self::RepeatedStdinMarker { command } => Some(command.as_str()),
            Self::NoCommandSpecified => None,
        }
    }

    /// Creates a coercion error.
    pub fn coercion(
        command: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        expected: ScalarKind,
    ) -> Self {
        Self::Coercion {
            command: command.into(),
            name: name.into(),
            value: value.into(),
            expected,
        }
    }

    /// Creates an unknown option error.
    pub fn unknown_option(command: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownOption {
            command: command.into(),
            name: name.into(),
        }
    }

    /// Creates a missing required argument error.
    pub fn missing_required(command: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingRequiredArgument {
            command: command.into(),
            name: name.into(),
        }
    }

    /// Creates a too many arguments error.
    pub fn too_many_arguments(command: impl Into<String>, extra: Vec<String>) -> Self {
        Self::TooManyArguments {
            command: command.into(),
            extra,
        }
    }
}

/// A command handler reported failure.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`crate::Registry::run`].
#[derive(Debug, Error)]
pub enum RunError {
    /// Selection or parsing failed before the handler ran.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The selected handler returned an error.
    #[error("command '{command}' failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: HandlerError,
    },
}

impl RunError {
    /// Returns the command involved, when known.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Command(error) => error.command(),
            Self::Handler { command, .. } => Some(command.as_str()),
        }
    }
}
