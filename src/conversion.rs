//! Text-format decoding of scalar cells.
//!
//! Result cells arrive in PostgreSQL's text format. NULL cells are never
//! handed to these decoders; the cursor reports them through the null flag.

use crate::error::{Error, Result};

/// Trait for decoding a non-NULL text-format cell.
pub trait FromText: Sized + Default {
    /// Decode from text format bytes.
    fn from_text(bytes: &[u8]) -> Result<Self>;
}

fn as_str(bytes: &[u8]) -> Result<&str> {
    simdutf8::compat::from_utf8(bytes).map_err(|e| Error::Decode(format!("invalid UTF-8: {}", e)))
}

impl FromText for bool {
    fn from_text(bytes: &[u8]) -> Result<Self> {
        match bytes.trim_ascii() {
            b"t" | b"true" | b"TRUE" | b"T" | b"1" | b"y" | b"yes" | b"on" => Ok(true),
            b"f" | b"false" | b"FALSE" | b"F" | b"0" | b"n" | b"no" | b"off" => Ok(false),
            _ => Err(Error::Decode(format!(
                "invalid boolean: {:?}",
                String::from_utf8_lossy(bytes)
            ))),
        }
    }
}

impl FromText for i64 {
    fn from_text(bytes: &[u8]) -> Result<Self> {
        as_str(bytes.trim_ascii())?
            .parse()
            .map_err(|e| Error::Decode(format!("invalid i64: {}", e)))
    }
}

impl FromText for f64 {
    fn from_text(bytes: &[u8]) -> Result<Self> {
        // float8out spells the specials as NaN / Infinity / -Infinity.
        match bytes.trim_ascii() {
            b"NaN" => Ok(f64::NAN),
            b"Infinity" => Ok(f64::INFINITY),
            b"-Infinity" => Ok(f64::NEG_INFINITY),
            s => as_str(s)?
                .parse()
                .map_err(|e| Error::Decode(format!("invalid f64: {}", e))),
        }
    }
}
