//! Errors raised while resolving, parsing or running commands.

use thiserror::Error;

/// Errors that can occur between a keystroke and a finished command.
///
/// `NoSuchCommand`, `NoSuchOptionOrArgument`, `KeyNotMapped` and `Notify` are
/// user-facing: report them and carry on. The rest point at a defect or a
/// failing collaborator and should be logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The command name is not in the registry.
    #[error("There is no such command: {0}")]
    NoSuchCommand(String),
    /// A token matched no argument and no positional option was left.
    #[error("No such option or argument: {0:?}")]
    NoSuchOptionOrArgument(String),
    /// The full key sequence has no binding.
    #[error("No such keybind: {0:?}.")]
    KeyNotMapped(String),
    /// Non-fatal message a command wants shown to the user.
    #[error("{0}")]
    Notify(String),
    /// An argument action rejected its input.
    #[error("invalid value {value:?} for {argument}: {reason}")]
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
    /// Code asked for an argument the command never declared.
    #[error("no argument/option defined: {0:?}")]
    UnknownArgument(String),
    /// The command was built without a handle it needs.
    #[error("command needs {0}, but none was provided")]
    MissingContext(&'static str),
    /// The backend collaborator failed.
    #[error("backend error: {0}")]
    Backend(String),
}

impl CommandError {
    /// Shorthand for a notify condition.
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify(message.into())
    }

    /// Whether this is an expected, user-facing condition rather than a defect.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NoSuchCommand(_)
                | Self::NoSuchOptionOrArgument(_)
                | Self::KeyNotMapped(_)
                | Self::Notify(_)
                | Self::InvalidValue { .. }
        )
    }

    pub fn is_notify(&self) -> bool {
        matches!(self, Self::Notify(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            CommandError::NoSuchCommand("frobnicate".into()).to_string(),
            "There is no such command: frobnicate"
        );
        assert_eq!(
            CommandError::KeyNotMapped("gz".into()).to_string(),
            "No such keybind: \"gz\"."
        );
        assert_eq!(
            CommandError::NoSuchOptionOrArgument("x=1".into()).to_string(),
            "No such option or argument: \"x=1\""
        );
    }

    #[test]
    fn defects_are_not_user_facing() {
        assert!(CommandError::notify("hi").is_user_facing());
        assert!(CommandError::notify("hi").is_notify());
        assert!(!CommandError::UnknownArgument("x".into()).is_user_facing());
        assert!(!CommandError::MissingContext("a buffer").is_user_facing());
        assert!(!CommandError::Backend("boom".into()).is_notify());
    }
}
