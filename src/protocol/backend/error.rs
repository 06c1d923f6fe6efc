//! Error and notice response messages.

use crate::classify::ServerFailure;
use crate::error::{ErrorFields, Result};
use crate::protocol::codec::read_cstr;

/// Error field type codes from PostgreSQL protocol.
pub mod field_type {
    /// Severity (localized)
    pub const SEVERITY: u8 = b'S';
    /// Severity (non-localized, PostgreSQL 9.6+)
    pub const SEVERITY_NON_LOCALIZED: u8 = b'V';
    /// SQLSTATE code
    pub const CODE: u8 = b'C';
    /// Message
    pub const MESSAGE: u8 = b'M';
    /// Detail
    pub const DETAIL: u8 = b'D';
    /// Hint
    pub const HINT: u8 = b'H';
    /// Position in query
    pub const POSITION: u8 = b'P';
    /// Internal position
    pub const INTERNAL_POSITION: u8 = b'p';
    /// Internal query
    pub const INTERNAL_QUERY: u8 = b'q';
    /// Where (context)
    pub const WHERE: u8 = b'W';
    /// Schema name
    pub const SCHEMA: u8 = b's';
    /// Table name
    pub const TABLE: u8 = b't';
    /// Column name
    pub const COLUMN: u8 = b'c';
    /// Data type name
    pub const DATA_TYPE: u8 = b'd';
    /// Constraint name
    pub const CONSTRAINT: u8 = b'n';
    /// File name
    pub const FILE: u8 = b'F';
    /// Line number
    pub const LINE: u8 = b'L';
    /// Routine name
    pub const ROUTINE: u8 = b'R';
}

/// Parse error/notice fields from payload.
fn parse_fields(payload: &[u8]) -> Result<ErrorFields> {
    let mut fields = ErrorFields::default();
    let mut data = payload;

    while let Some((&field_type, rest)) = data.split_first() {
        if field_type == 0 {
            break;
        }

        let (value, rest) = read_cstr(rest)?;
        data = rest;

        let slot = match field_type {
            field_type::SEVERITY => &mut fields.severity,
            field_type::SEVERITY_NON_LOCALIZED => &mut fields.severity_non_localized,
            field_type::CODE => &mut fields.code,
            field_type::MESSAGE => &mut fields.message,
            field_type::DETAIL => &mut fields.detail,
            field_type::HINT => &mut fields.hint,
            field_type::POSITION => &mut fields.position,
            field_type::INTERNAL_QUERY => &mut fields.internal_query,
            field_type::WHERE => &mut fields.where_,
            field_type::SCHEMA => &mut fields.schema,
            field_type::TABLE => &mut fields.table,
            field_type::COLUMN => &mut fields.column,
            field_type::DATA_TYPE => &mut fields.data_type,
            field_type::CONSTRAINT => &mut fields.constraint,
            field_type::FILE => &mut fields.file,
            field_type::ROUTINE => &mut fields.routine,
            field_type::INTERNAL_POSITION => {
                fields.internal_position = value.parse().ok();
                continue;
            }
            field_type::LINE => {
                fields.line = value.parse().ok();
                continue;
            }
            _ => {
                // Unknown field type - ignore
                tracing::debug!("Unknown error field type: {}", field_type as char);
                continue;
            }
        };
        *slot = Some(value.to_string());
    }

    Ok(fields)
}

/// ErrorResponse message - fatal error from server.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// Parsed error fields
    pub fields: ErrorFields,
}

impl ErrorResponse {
    /// Parse an ErrorResponse message from payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            fields: parse_fields(payload)?,
        })
    }

    /// Convert into a raw failure, ready to classify.
    pub fn into_raw(self) -> ServerFailure {
        ServerFailure::new(self.fields)
    }

    /// Get the SQLSTATE code.
    pub fn code(&self) -> Option<&str> {
        self.fields.code.as_deref()
    }

    /// Get the primary message.
    pub fn message(&self) -> Option<&str> {
        self.fields.message.as_deref()
    }

    /// Get the severity.
    pub fn severity(&self) -> Option<&str> {
        self.fields.severity()
    }
}

/// NoticeResponse message - non-fatal warning/info from server.
#[derive(Debug, Clone)]
pub struct NoticeResponse {
    /// Parsed notice fields
    pub fields: ErrorFields,
}

impl NoticeResponse {
    /// Parse a NoticeResponse message from payload bytes.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        Ok(Self {
            fields: parse_fields(payload)?,
        })
    }
}
