//! Error types for conversion operations

use std::fmt;

/// Errors that can occur while reading, converting or writing a project
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Source file missing
    NotFound(String),
    /// The authoring application holds the project lock
    LockConflict(String),
    /// Malformed input
    ParseError(String),
    /// No reader or writer for the given file
    UnsupportedFormat(String),
    /// I/O failure while writing; the previous file has been restored
    WriteError(String),
}

impl FormatError {
    /// Message with the failure sentinel, as reported to the user.
    pub fn status_message(&self) -> String {
        format!("{}{self}", crate::FAILURE_MARKER)
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::NotFound(path) => write!(f, "File not found: \"{path}\"."),
            FormatError::LockConflict(_) => {
                write!(f, "yWriter seems to be open. Please close first.")
            }
            FormatError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            FormatError::UnsupportedFormat(msg) => write!(f, "File type is not supported: {msg}"),
            FormatError::WriteError(msg) => write!(f, "Cannot write file: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_has_sentinel() {
        let err = FormatError::NotFound("a.yw7".into());
        assert_eq!(err.status_message(), "!File not found: \"a.yw7\".");
        assert!(FormatError::LockConflict("a.yw7".into())
            .status_message()
            .starts_with('!'));
    }
}
