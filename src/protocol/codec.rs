//! PostgreSQL wire protocol encoding and decoding primitives.
//!
//! PostgreSQL uses big-endian (network byte order) for all integers.

use zerocopy::FromBytes;
use zerocopy::byteorder::big_endian::{I32 as I32BE, U16 as U16BE};

use crate::error::{Error, Result};

/// Read 2-byte big-endian unsigned integer.
#[inline]
pub fn read_u16(data: &[u8]) -> Result<(u16, &[u8])> {
    let (head, rest) = data.split_at_checked(2).ok_or_else(|| {
        Error::Protocol(format!("read_u16: buffer too short: {} < 2", data.len()))
    })?;
    let value = U16BE::ref_from_bytes(head)?.get();
    Ok((value, rest))
}

/// Read 4-byte big-endian signed integer.
#[inline]
pub fn read_i32(data: &[u8]) -> Result<(i32, &[u8])> {
    let (head, rest) = data.split_at_checked(4).ok_or_else(|| {
        Error::Protocol(format!("read_i32: buffer too short: {} < 4", data.len()))
    })?;
    let value = I32BE::ref_from_bytes(head)?.get();
    Ok((value, rest))
}

/// Read fixed-length bytes.
#[inline]
pub fn read_bytes(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    data.split_at_checked(len).ok_or_else(|| {
        Error::Protocol(format!(
            "read_bytes: buffer too short: {} < {}",
            data.len(),
            len
        ))
    })
}

/// Read null-terminated string (PostgreSQL String type).
/// Returns the string bytes (without the null terminator) and remaining data.
#[inline]
pub fn read_cstring(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let pos = memchr::memchr(0, data)
        .ok_or_else(|| Error::Protocol("read_cstring: no null terminator found".into()))?;
    let (bytes, rest) = data.split_at(pos);
    Ok((bytes, rest.get(1..).unwrap_or_default()))
}

/// Read null-terminated string as &str.
#[inline]
pub fn read_cstr(data: &[u8]) -> Result<(&str, &[u8])> {
    let (bytes, rest) = read_cstring(data)?;
    let s = simdutf8::compat::from_utf8(bytes)
        .map_err(|e| Error::Protocol(format!("read_cstr: invalid UTF-8: {e}")))?;
    Ok((s, rest))
}

/// Write 1-byte unsigned integer.
#[inline]
pub fn write_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

/// Write 2-byte big-endian signed integer.
#[inline]
pub fn write_i16(out: &mut Vec<u8>, value: i16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write 2-byte big-endian unsigned integer.
#[inline]
pub fn write_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write 4-byte big-endian signed integer.
#[inline]
pub fn write_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write 4-byte big-endian unsigned integer.
#[inline]
pub fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write null-terminated string from &str.
#[inline]
pub fn write_cstr(out: &mut Vec<u8>, s: &str) {
    out.extend_from_slice(s.as_bytes());
    out.push(0);
}

/// Write a length-prefixed column value; `None` writes the NULL marker (-1).
#[inline]
pub fn write_value(out: &mut Vec<u8>, value: Option<&[u8]>) -> Result<()> {
    match value {
        None => write_i32(out, -1),
        Some(bytes) => {
            let len = i32::try_from(bytes.len())
                .map_err(|_| Error::Protocol(format!("value too long: {}", bytes.len())))?;
            write_i32(out, len);
            out.extend_from_slice(bytes);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cstr_roundtrip() {
        let mut buf = Vec::new();
        write_cstr(&mut buf, "hello");
        write_u8(&mut buf, 7);
        let (s, rest) = read_cstr(&buf).unwrap();
        assert_eq!(s, "hello");
        assert_eq!(rest, &[7]);
    }

    #[test]
    fn test_cstr_missing_terminator() {
        assert!(read_cstr(b"abc").is_err());
    }

    #[test]
    fn test_short_buffers() {
        assert!(read_u16(&[1]).is_err());
        assert!(read_i32(&[0, 0, 1]).is_err());
        assert!(read_bytes(&[1, 2], 3).is_err());
    }

    #[test]
    fn test_null_value() {
        let mut buf = Vec::new();
        write_value(&mut buf, None).unwrap();
        assert_eq!(read_i32(&buf).unwrap().0, -1);
    }
}
