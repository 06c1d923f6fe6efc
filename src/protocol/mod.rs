//! PostgreSQL wire protocol pieces needed to build result sets and raw errors.
//!
//! - `backend`: the server messages that carry rows and errors
//! - `codec`: low-level encoding/decoding primitives
//! - `types`: common protocol types (FormatCode, Oid)

pub mod backend;
pub mod codec;
pub mod types;

pub use types::{FormatCode, Oid};
