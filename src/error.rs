//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ParseError: malformed update-proposal lines
//! - PinError: version bumps that break a name-encoded pin
//! - CommandError: external commands the workflow cannot proceed without
//!
//! All of these are ordinary values; nothing in the core raises an
//! unrecoverable abort. Escalation to a process-ending failure happens at
//! the binary boundary.

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Update-proposal parsing errors
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Pin compatibility errors
    #[error(transparent)]
    Pin(#[from] PinError),

    /// External command errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors related to update-proposal parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A proposal line did not split into exactly three tokens
    #[error("Unable to parse update: {line}")]
    MalformedLine { line: String },
}

/// Errors related to name-encoded version pins
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PinError {
    /// The new version does not satisfy the pin the old version satisfied
    #[error("'{attr_path}' pins a version that {new_version} does not match")]
    Violation {
        attr_path: String,
        new_version: String,
    },
}

/// Errors related to external command execution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A command required by the workflow failed
    #[error("command `{command}` failed: {reason}")]
    Failed { command: String, reason: String },
}

impl ParseError {
    /// Creates a new MalformedLine error
    pub fn malformed_line(line: impl Into<String>) -> Self {
        ParseError::MalformedLine { line: line.into() }
    }
}

impl PinError {
    /// Creates a new Violation error
    pub fn violation(attr_path: impl Into<String>, new_version: impl Into<String>) -> Self {
        PinError::Violation {
            attr_path: attr_path.into(),
            new_version: new_version.into(),
        }
    }
}

impl CommandError {
    /// Creates a new Failed error
    pub fn failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        CommandError::Failed {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = ParseError::malformed_line("pkg 1.0");
        assert_eq!(format!("{}", err), "Unable to parse update: pkg 1.0");
    }

    #[test]
    fn test_pin_error_message() {
        let err = PinError::violation("owncloud90", "9.1.3");
        let msg = format!("{}", err);
        assert!(msg.contains("owncloud90"));
        assert!(msg.contains("9.1.3"));
    }

    #[test]
    fn test_command_error_message() {
        let err = CommandError::failed("git push", "Exit code: 128");
        let msg = format!("{}", err);
        assert!(msg.contains("git push"));
        assert!(msg.contains("Exit code: 128"));
    }

    #[test]
    fn test_app_error_from_parse_error() {
        let app_err: AppError = ParseError::malformed_line("pkg").into();
        assert_eq!(format!("{}", app_err), "Unable to parse update: pkg");
    }

    #[test]
    fn test_app_error_from_pin_error() {
        let app_err: AppError = PinError::violation("libgit2_0_25", "0.26.0").into();
        assert!(format!("{}", app_err).contains("libgit2_0_25"));
    }

    #[test]
    fn test_app_error_from_command_error() {
        let app_err: AppError = CommandError::failed("gh pr create", "Exit code: 1").into();
        assert!(format!("{}", app_err).contains("gh pr create"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ParseError::malformed_line("x");
        assert!(format!("{:?}", err).contains("MalformedLine"));
    }
}
