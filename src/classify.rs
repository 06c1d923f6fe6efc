//! SQLSTATE classification.
//!
//! [`classify`] turns a raw server error into a [`Failure`] by looking only at
//! strings that were already retrieved. It never touches the connection or a
//! result handle.

use crate::error::ErrorFields;
use crate::failure::{Failure, FailureKind};

/// Connection status at the time the error was retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnStatus {
    /// Connection usable
    #[default]
    Ok,
    /// Connection is gone and cannot be reused
    Bad,
    /// Anything else (e.g. still in startup)
    Other,
}

impl ConnStatus {
    /// FATAL and PANIC errors terminate the backend session.
    pub fn from_severity(severity: Option<&str>) -> Self {
        match severity {
            Some("FATAL") | Some("PANIC") => ConnStatus::Bad,
            _ => ConnStatus::Ok,
        }
    }
}

/// Raw error signal handed over by the execution layer.
pub trait RawError {
    /// Status of the connection the error came from.
    fn status(&self) -> ConnStatus;

    /// Five-character SQLSTATE, if the server sent one.
    fn sqlstate(&self) -> Option<&str>;

    /// Human-readable message.
    fn message(&self) -> &str;

    /// Query whose execution failed.
    fn offending_query(&self) -> Option<&str> {
        None
    }

    /// Error position as reported by the server (1-based, textual).
    fn error_position(&self) -> Option<&str> {
        None
    }
}

/// Owned raw error built from an ErrorResponse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerFailure {
    pub fields: ErrorFields,
    pub query: Option<String>,
    pub status: ConnStatus,
}

impl ServerFailure {
    /// Wrap server error fields; the status is derived from the severity.
    pub fn new(fields: ErrorFields) -> Self {
        let status = ConnStatus::from_severity(fields.severity());
        Self {
            fields,
            query: None,
            status,
        }
    }

    /// Attach the query that was being executed.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Override the derived connection status.
    pub fn with_status(mut self, status: ConnStatus) -> Self {
        self.status = status;
        self
    }

    /// Classify this error.
    pub fn classify(&self) -> Failure {
        classify(self)
    }
}

impl RawError for ServerFailure {
    fn status(&self) -> ConnStatus {
        self.status
    }

    fn sqlstate(&self) -> Option<&str> {
        self.fields.code.as_deref()
    }

    fn message(&self) -> &str {
        self.fields.message.as_deref().unwrap_or_default()
    }

    fn offending_query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    fn error_position(&self) -> Option<&str> {
        self.fields.position.as_deref()
    }
}

/// Classify already-parsed error fields without building a [`ServerFailure`].
pub fn classify_fields(fields: &ErrorFields, query: Option<&str>, status: ConnStatus) -> Failure {
    struct Borrowed<'a> {
        fields: &'a ErrorFields,
        query: Option<&'a str>,
        status: ConnStatus,
    }

    impl RawError for Borrowed<'_> {
        fn status(&self) -> ConnStatus {
            self.status
        }
        fn sqlstate(&self) -> Option<&str> {
            self.fields.code.as_deref()
        }
        fn message(&self) -> &str {
            self.fields.message.as_deref().unwrap_or_default()
        }
        fn offending_query(&self) -> Option<&str> {
            self.query
        }
        fn error_position(&self) -> Option<&str> {
            self.fields.position.as_deref()
        }
    }

    classify(&Borrowed {
        fields,
        query,
        status,
    })
}

/// Map a raw error to exactly one failure kind.
///
/// - no (or malformed) code: `Failure`, or `BrokenConnection` when the
///   connection status is bad
/// - known class: the most specific kind, falling back to the class
///   representative for unknown conditions
/// - unknown class: `SqlError`
pub fn classify<E: RawError + ?Sized>(err: &E) -> Failure {
    let message = err.message();

    let Some(code) = err.sqlstate().filter(|c| is_well_formed(c)) else {
        let kind = match err.status() {
            ConnStatus::Bad => FailureKind::BrokenConnection,
            ConnStatus::Ok | ConnStatus::Other => FailureKind::Failure,
        };
        tracing::trace!(kind = kind.name(), "classified error without SQLSTATE");
        let mut failure = Failure::new(kind, message);
        if let Some(code) = err.sqlstate().filter(|c| !c.is_empty()) {
            failure = failure.with_sqlstate(code);
        }
        return failure;
    };

    let kind = kind_for_sqlstate(code);
    tracing::trace!(sqlstate = code, kind = kind.name(), "classified error");

    let mut failure = Failure::new(kind, message).with_sqlstate(code);
    if let Some(query) = err.offending_query() {
        failure = failure.with_query(query);
    }
    if kind.is_syntax_error() {
        // Unparsable positions leave the position unknown.
        if let Some(position) = err.error_position().and_then(|p| p.trim().parse().ok()) {
            failure = failure.with_position(position);
        }
    }
    failure
}

/// Failure kind for a well-formed SQLSTATE.
pub fn kind_for_sqlstate(code: &str) -> FailureKind {
    let bytes = code.as_bytes();
    let (Some(class), Some(condition)) = (bytes.get(..2), bytes.get(2..5)) else {
        return FailureKind::Failure;
    };

    match (class, condition) {
        (b"08", _) => FailureKind::BrokenConnection,
        (b"0A", _) => FailureKind::FeatureNotSupported,
        (b"22", _) => FailureKind::DataException,
        (b"23", b"001") => FailureKind::RestrictViolation,
        (b"23", b"502") => FailureKind::NotNullViolation,
        (b"23", b"503") => FailureKind::ForeignKeyViolation,
        (b"23", b"505") => FailureKind::UniqueViolation,
        (b"23", b"514") => FailureKind::CheckViolation,
        (b"23", _) => FailureKind::IntegrityConstraintViolation,
        (b"24", _) => FailureKind::InvalidCursorState,
        (b"26", _) => FailureKind::InvalidSqlStatementName,
        (b"34", _) => FailureKind::InvalidCursorName,
        (b"40", b"003") => FailureKind::InDoubtError,
        (b"42", b"501") => FailureKind::InsufficientPrivilege,
        (b"42", b"703") => FailureKind::UndefinedColumn,
        (b"42", b"883") => FailureKind::UndefinedFunction,
        (b"42", b"P01") => FailureKind::UndefinedTable,
        (b"42", _) => FailureKind::SyntaxError,
        (b"53", b"100") => FailureKind::DiskFull,
        (b"53", b"200") => FailureKind::OutOfMemory,
        (b"53", b"300") => FailureKind::TooManyConnections,
        (b"53", _) => FailureKind::InsufficientResources,
        (b"P0", b"001") => FailureKind::PlpgsqlRaise,
        (b"P0", b"002") => FailureKind::PlpgsqlNoDataFound,
        (b"P0", b"003") => FailureKind::PlpgsqlTooManyRows,
        (b"P0", _) => FailureKind::PlpgsqlError,
        _ => FailureKind::SqlError,
    }
}

fn is_well_formed(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
