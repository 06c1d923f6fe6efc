//! Error types for pq-bind.

use thiserror::Error;

use crate::failure::{Failure, FailureKind};

/// Result type for pq-bind operations.
pub type Result<T> = core::result::Result<T, Error>;

/// PostgreSQL error/notice fields, as sent in an ErrorResponse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorFields {
    /// Severity: ERROR, FATAL, PANIC, WARNING, NOTICE, DEBUG, INFO, LOG
    pub severity: Option<String>,
    /// Non-localized severity (same as severity but never translated)
    pub severity_non_localized: Option<String>,
    /// SQLSTATE error code (5 characters)
    pub code: Option<String>,
    /// Primary error message
    pub message: Option<String>,
    /// Detailed error explanation
    pub detail: Option<String>,
    /// Suggestion for fixing the error
    pub hint: Option<String>,
    /// Cursor position in query string (1-based), kept as sent
    pub position: Option<String>,
    /// Position in internal query
    pub internal_position: Option<u32>,
    /// Failed internal command text
    pub internal_query: Option<String>,
    /// Context/stack trace
    pub where_: Option<String>,
    /// Schema name
    pub schema: Option<String>,
    /// Table name
    pub table: Option<String>,
    /// Column name
    pub column: Option<String>,
    /// Data type name
    pub data_type: Option<String>,
    /// Constraint name
    pub constraint: Option<String>,
    /// Source file name
    pub file: Option<String>,
    /// Source line number
    pub line: Option<u32>,
    /// Source routine name
    pub routine: Option<String>,
}

impl ErrorFields {
    /// Severity, preferring the non-localized form.
    pub fn severity(&self) -> Option<&str> {
        self.severity_non_localized
            .as_deref()
            .or(self.severity.as_deref())
    }
}

impl std::fmt::Display for ErrorFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(severity) = &self.severity {
            write!(f, "{}: ", severity)?;
        }
        if let Some(message) = &self.message {
            write!(f, "{}", message)?;
        }
        if let Some(code) = &self.code {
            write!(f, " (SQLSTATE {})", code)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, "\nDETAIL: {}", detail)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\nHINT: {}", hint)?;
        }
        Ok(())
    }
}

/// Error type for pq-bind.
#[derive(Debug, Error)]
pub enum Error {
    /// Classified server failure
    #[error("PostgreSQL error: {0}")]
    Server(#[from] Failure),

    /// Column index outside the result's fields.
    ///
    /// This is a caller bug, not a server condition.
    #[error("PostgreSQL error: index out of range: {index} (fields: {fields})")]
    IndexOutOfRange { index: usize, fields: usize },

    /// Bind attempted before the first row or after the cursor was exhausted
    #[error("No current row")]
    NoCurrentRow,

    /// Cell text could not be converted to the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Protocol error (malformed message payload)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid usage (e.g., bad option value)
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),
}

impl Error {
    /// Returns true if the error indicates the connection is broken and cannot be reused.
    pub fn is_connection_broken(&self) -> bool {
        match self {
            Error::Server(failure) => failure.is_a(FailureKind::BrokenConnection),
            _ => false,
        }
    }

    /// Get the SQLSTATE code if this is a server error.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Error::Server(failure) => failure.sqlstate(),
            _ => None,
        }
    }

    /// Get the classified failure if this is a server error.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Error::Server(failure) => Some(failure),
            _ => None,
        }
    }
}

impl<Src: std::fmt::Debug, Dst: std::fmt::Debug + ?Sized>
    From<zerocopy::error::CastError<Src, Dst>> for Error
{
    fn from(err: zerocopy::error::CastError<Src, Dst>) -> Self {
        Error::Protocol(format!("zerocopy cast error: {err:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_accessors() {
        let failure = Failure::new(FailureKind::TooManyConnections, "sorry, too many clients");
        let err = Error::from(failure);
        assert!(err.is_connection_broken());
        assert_eq!(
            err.failure().map(Failure::kind),
            Some(FailureKind::TooManyConnections)
        );
    }

    #[test]
    fn test_index_out_of_range_is_local() {
        let err = Error::IndexOutOfRange {
            index: 3,
            fields: 2,
        };
        assert!(!err.is_connection_broken());
        assert!(err.failure().is_none());
        assert_eq!(
            err.to_string(),
            "PostgreSQL error: index out of range: 3 (fields: 2)"
        );
    }

    #[test]
    fn test_error_fields_display() {
        let fields = ErrorFields {
            severity: Some("ERROR".into()),
            code: Some("42P01".into()),
            message: Some("relation \"nope\" does not exist".into()),
            hint: Some("check the name".into()),
            ..Default::default()
        };
        assert_eq!(
            fields.to_string(),
            "ERROR: relation \"nope\" does not exist (SQLSTATE 42P01)\nHINT: check the name"
        );
    }
}
