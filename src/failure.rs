//! Typed failure taxonomy for server-reported errors.
//!
//! The kinds roughly follow the two-level layout of PostgreSQL's SQLSTATE
//! appendix. Each kind names its parent, so callers can match whole
//! categories with [`FailureKind::is_a`] instead of comparing codes:
//!
//! ```text
//! Failure
//! ├── BrokenConnection
//! │   └── TooManyConnections
//! ├── InDoubtError
//! └── SqlError
//!     ├── FeatureNotSupported
//!     ├── DataException
//!     ├── IntegrityConstraintViolation
//!     │   └── Restrict / NotNull / ForeignKey / Unique / Check
//!     ├── InvalidCursorState, InvalidCursorName, InvalidSqlStatementName
//!     ├── SyntaxError
//!     │   └── UndefinedColumn / UndefinedFunction / UndefinedTable
//!     ├── InsufficientPrivilege
//!     ├── InsufficientResources
//!     │   └── DiskFull / OutOfMemory
//!     └── PlpgsqlError
//!         └── PlpgsqlRaise / PlpgsqlNoDataFound / PlpgsqlTooManyRows
//! ```
//!
//! `TooManyConnections` sits under `BrokenConnection` rather than
//! `InsufficientResources`, and "statement completion unknown" has its own
//! `InDoubtError` kind directly under the root.

use std::fmt;

/// Category of a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Root of the taxonomy; also used when no SQLSTATE is available.
    Failure,
    /// Lost or failed backend connection.
    BrokenConnection,
    /// Failed statement. Carries the offending query.
    SqlError,
    /// The outcome of the statement is unknown (e.g. commit interrupted).
    InDoubtError,

    FeatureNotSupported,
    DataException,

    IntegrityConstraintViolation,
    RestrictViolation,
    NotNullViolation,
    ForeignKeyViolation,
    UniqueViolation,
    CheckViolation,

    InvalidCursorState,
    InvalidSqlStatementName,
    InvalidCursorName,

    /// Syntax or access rule violation. Carries an approximate error position.
    SyntaxError,
    UndefinedColumn,
    UndefinedFunction,
    UndefinedTable,

    InsufficientPrivilege,

    /// Resource shortage on the server.
    InsufficientResources,
    DiskFull,
    OutOfMemory,

    TooManyConnections,

    /// Error raised from a PL/pgSQL procedure.
    PlpgsqlError,
    PlpgsqlRaise,
    PlpgsqlNoDataFound,
    PlpgsqlTooManyRows,
}

impl FailureKind {
    /// Every kind, root first.
    pub const ALL: [FailureKind; 28] = [
        FailureKind::Failure,
        FailureKind::BrokenConnection,
        FailureKind::SqlError,
        FailureKind::InDoubtError,
        FailureKind::FeatureNotSupported,
        FailureKind::DataException,
        FailureKind::IntegrityConstraintViolation,
        FailureKind::RestrictViolation,
        FailureKind::NotNullViolation,
        FailureKind::ForeignKeyViolation,
        FailureKind::UniqueViolation,
        FailureKind::CheckViolation,
        FailureKind::InvalidCursorState,
        FailureKind::InvalidSqlStatementName,
        FailureKind::InvalidCursorName,
        FailureKind::SyntaxError,
        FailureKind::UndefinedColumn,
        FailureKind::UndefinedFunction,
        FailureKind::UndefinedTable,
        FailureKind::InsufficientPrivilege,
        FailureKind::InsufficientResources,
        FailureKind::DiskFull,
        FailureKind::OutOfMemory,
        FailureKind::TooManyConnections,
        FailureKind::PlpgsqlError,
        FailureKind::PlpgsqlRaise,
        FailureKind::PlpgsqlNoDataFound,
        FailureKind::PlpgsqlTooManyRows,
    ];

    /// The direct parent kind, or `None` for the root.
    pub fn parent(self) -> Option<FailureKind> {
        use FailureKind::*;
        match self {
            Failure => None,
            BrokenConnection | SqlError | InDoubtError => Some(Failure),
            FeatureNotSupported
            | DataException
            | IntegrityConstraintViolation
            | InvalidCursorState
            | InvalidSqlStatementName
            | InvalidCursorName
            | SyntaxError
            | InsufficientPrivilege
            | InsufficientResources
            | PlpgsqlError => Some(SqlError),
            RestrictViolation | NotNullViolation | ForeignKeyViolation | UniqueViolation
            | CheckViolation => Some(IntegrityConstraintViolation),
            UndefinedColumn | UndefinedFunction | UndefinedTable => Some(SyntaxError),
            DiskFull | OutOfMemory => Some(InsufficientResources),
            TooManyConnections => Some(BrokenConnection),
            PlpgsqlRaise | PlpgsqlNoDataFound | PlpgsqlTooManyRows => Some(PlpgsqlError),
        }
    }

    /// Returns true if `self` is `ancestor` or descends from it.
    ///
    /// Every kind is a [`FailureKind::Failure`].
    pub fn is_a(self, ancestor: FailureKind) -> bool {
        let mut kind = Some(self);
        while let Some(k) = kind {
            if k == ancestor {
                return true;
            }
            kind = k.parent();
        }
        false
    }

    /// Returns true for statement-level kinds, which carry the offending query.
    pub fn is_sql_error(self) -> bool {
        self.is_a(FailureKind::SqlError)
    }

    /// Returns true for the syntax error family, which carries an error position.
    pub fn is_syntax_error(self) -> bool {
        self.is_a(FailureKind::SyntaxError)
    }

    /// Snake-case name of the kind.
    pub fn name(self) -> &'static str {
        use FailureKind::*;
        match self {
            Failure => "failure",
            BrokenConnection => "broken_connection",
            SqlError => "sql_error",
            InDoubtError => "in_doubt_error",
            FeatureNotSupported => "feature_not_supported",
            DataException => "data_exception",
            IntegrityConstraintViolation => "integrity_constraint_violation",
            RestrictViolation => "restrict_violation",
            NotNullViolation => "not_null_violation",
            ForeignKeyViolation => "foreign_key_violation",
            UniqueViolation => "unique_violation",
            CheckViolation => "check_violation",
            InvalidCursorState => "invalid_cursor_state",
            InvalidSqlStatementName => "invalid_sql_statement_name",
            InvalidCursorName => "invalid_cursor_name",
            SyntaxError => "syntax_error",
            UndefinedColumn => "undefined_column",
            UndefinedFunction => "undefined_function",
            UndefinedTable => "undefined_table",
            InsufficientPrivilege => "insufficient_privilege",
            InsufficientResources => "insufficient_resources",
            DiskFull => "disk_full",
            OutOfMemory => "out_of_memory",
            TooManyConnections => "too_many_connections",
            PlpgsqlError => "plpgsql_error",
            PlpgsqlRaise => "plpgsql_raise",
            PlpgsqlNoDataFound => "plpgsql_no_data_found",
            PlpgsqlTooManyRows => "plpgsql_too_many_rows",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified server failure.
///
/// Built by [`crate::classify::classify`]. The query is only ever set for
/// [`FailureKind::SqlError`] descendants, the position only for the
/// [`FailureKind::SyntaxError`] family.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}{}", sqlstate_suffix(.sqlstate))]
pub struct Failure {
    kind: FailureKind,
    message: String,
    query: Option<String>,
    position: Option<u32>,
    sqlstate: Option<String>,
}

impl Failure {
    /// Create a failure of the given kind with no query attached.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            query: None,
            position: None,
            sqlstate: None,
        }
    }

    /// Attach the query that triggered the failure.
    ///
    /// Ignored for kinds outside the `SqlError` branch.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        if self.kind.is_sql_error() {
            self.query = Some(query.into());
        }
        self
    }

    /// Attach the error position reported by the server.
    ///
    /// Ignored for kinds outside the `SyntaxError` family.
    pub fn with_position(mut self, position: u32) -> Self {
        if self.kind.is_syntax_error() {
            self.position = Some(position);
        }
        self
    }

    pub(crate) fn with_sqlstate(mut self, code: &str) -> Self {
        self.sqlstate = Some(code.to_string());
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Shorthand for `self.kind().is_a(ancestor)`.
    pub fn is_a(&self, ancestor: FailureKind) -> bool {
        self.kind.is_a(ancestor)
    }

    /// Server-provided human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The query whose execution triggered the failure.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Approximate 1-based character offset of the error, or -1 if unknown.
    pub fn error_position(&self) -> i32 {
        self.position
            .and_then(|p| i32::try_from(p).ok())
            .unwrap_or(-1)
    }

    /// SQLSTATE the failure was classified from, if any.
    pub fn sqlstate(&self) -> Option<&str> {
        self.sqlstate.as_deref()
    }
}

fn sqlstate_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|code| format!(" (SQLSTATE {code})"))
        .unwrap_or_default()
}
