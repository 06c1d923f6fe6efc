//! Typed result binding and SQLSTATE failure classification for PostgreSQL.
//!
//! Two pieces sit between a PostgreSQL client and an embedded-SQL layer:
//!
//! - **Result cursor**: [`BindResult`] walks a completed result held in a
//!   [`PreparedHandle`] row by row and converts text-format cells into typed,
//!   null-aware values.
//! - **Failure classifier**: [`classify`] maps a server error's SQLSTATE to a
//!   [`Failure`] whose [`FailureKind`] can be matched by category.
//!
//! The [`protocol`], [`handler`] and [`reader`] modules build both inputs from
//! raw backend messages.
//!
//! # Example
//!
//! ```
//! use pq_bind::{ConnStatus, ErrorFields, FailureKind, classify_fields};
//!
//! let fields = ErrorFields {
//!     code: Some("23505".into()),
//!     message: Some("duplicate key value violates unique constraint".into()),
//!     ..Default::default()
//! };
//! let failure = classify_fields(&fields, Some("INSERT INTO t VALUES (1)"), ConnStatus::Ok);
//!
//! assert_eq!(failure.kind(), FailureKind::UniqueViolation);
//! assert!(failure.is_a(FailureKind::IntegrityConstraintViolation));
//! assert_eq!(failure.query(), Some("INSERT INTO t VALUES (1)"));
//! ```

pub mod classify;
pub mod conversion;
pub mod cursor;
pub mod error;
pub mod failure;
pub mod handle;
pub mod handler;
pub mod opts;
pub mod protocol;
pub mod reader;
pub mod result;

pub use classify::{ConnStatus, RawError, ServerFailure, classify, classify_fields};
pub use cursor::{BindResult, BoundValue, TextCell};
pub use error::{Error, ErrorFields, Result};
pub use failure::{Failure, FailureKind};
pub use handle::{PreparedHandle, RowState};
pub use handler::{ResultCollector, TextHandler};
pub use opts::Opts;
pub use reader::TextResultReader;
pub use result::{Column, ResultSet, TextResult};
