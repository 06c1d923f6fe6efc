//! Query-related backend messages.

use std::mem::size_of;

use zerocopy::byteorder::big_endian::{I16 as I16BE, I32 as I32BE, U16 as U16BE, U32 as U32BE};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::error::{Error, Result};
use crate::protocol::codec::{read_bytes, read_cstr, read_i32, read_u16};
use crate::protocol::types::{FormatCode, Oid};

/// Fixed-size tail of a field description (18 bytes).
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
#[repr(C, packed)]
pub struct FieldDescriptionTail {
    /// Table OID (0 if not a table column)
    pub table_oid: U32BE,
    /// Column attribute number (0 if not a table column)
    pub column_id: I16BE,
    /// Data type OID
    pub type_oid: U32BE,
    /// Type size (-1 for variable, -2 for null-terminated)
    pub type_size: I16BE,
    /// Type modifier (type-specific)
    pub type_modifier: I32BE,
    /// Format code (0=text, 1=binary)
    pub format: U16BE,
}

/// Field description within a RowDescription.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescription<'a> {
    /// Field name
    pub name: &'a str,
    /// Fixed-size metadata
    pub tail: &'a FieldDescriptionTail,
}

impl FieldDescription<'_> {
    /// Data type OID
    pub fn type_oid(&self) -> Oid {
        self.tail.type_oid.get()
    }

    /// Format code (0=text, 1=binary)
    pub fn format(&self) -> FormatCode {
        FormatCode::from_u16(self.tail.format.get())
    }
}

/// RowDescription message - describes the columns in a result set.
#[derive(Debug)]
pub struct RowDescription<'a> {
    fields: Vec<FieldDescription<'a>>,
}

impl<'a> RowDescription<'a> {
    /// Parse a RowDescription message from payload bytes.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        const TAIL_SIZE: usize = size_of::<FieldDescriptionTail>();

        let (num_fields, mut data) = read_u16(payload)?;
        let mut fields = Vec::with_capacity(usize::from(num_fields));

        for _ in 0..num_fields {
            let (name, rest) = read_cstr(data)?;
            let (tail, rest) = read_bytes(rest, TAIL_SIZE)?;
            let tail = FieldDescriptionTail::ref_from_bytes(tail)?;
            fields.push(FieldDescription { name, tail });
            data = rest;
        }

        Ok(Self { fields })
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get field descriptions.
    pub fn fields(&self) -> &[FieldDescription<'a>] {
        &self.fields
    }

    /// Iterate over field descriptions.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescription<'a>> {
        self.fields.iter()
    }
}

/// DataRow message - contains a single row of data.
#[derive(Debug, Clone, Copy)]
pub struct DataRow<'a> {
    num_columns: u16,
    columns_data: &'a [u8],
}

impl<'a> DataRow<'a> {
    /// Parse a DataRow message from payload bytes.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let (num_columns, columns_data) = read_u16(payload)?;
        Ok(Self {
            num_columns,
            columns_data,
        })
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        usize::from(self.num_columns)
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.num_columns == 0
    }

    /// Iterate over column values.
    ///
    /// Each item is `Option<&[u8]>` where `None` represents NULL. A truncated
    /// payload yields one `Err` and then ends.
    pub fn iter(&self) -> DataRowIter<'a> {
        DataRowIter {
            remaining: self.columns_data,
            left: self.num_columns,
        }
    }
}

/// Iterator over column values in a DataRow.
#[derive(Debug, Clone)]
pub struct DataRowIter<'a> {
    remaining: &'a [u8],
    left: u16,
}

impl<'a> DataRowIter<'a> {
    fn read_value(&mut self) -> Result<Option<&'a [u8]>> {
        let (len, rest) = read_i32(self.remaining)?;
        if len == -1 {
            self.remaining = rest;
            return Ok(None);
        }
        let len = usize::try_from(len)
            .map_err(|_| Error::Protocol(format!("DataRow: invalid value length {len}")))?;
        let (value, rest) = read_bytes(rest, len)?;
        self.remaining = rest;
        Ok(Some(value))
    }
}

impl<'a> Iterator for DataRowIter<'a> {
    type Item = Result<Option<&'a [u8]>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.left == 0 {
            return None;
        }
        self.left -= 1;
        let value = self.read_value();
        if value.is_err() {
            self.left = 0;
        }
        Some(value)
    }
}

/// CommandComplete message - indicates successful completion of a command.
#[derive(Debug, Clone, Copy)]
pub struct CommandComplete<'a> {
    /// Command tag (e.g., "SELECT 5", "INSERT 0 1", "UPDATE 10")
    pub tag: &'a str,
}

impl<'a> CommandComplete<'a> {
    /// Parse a CommandComplete message from payload bytes.
    pub fn parse(payload: &'a [u8]) -> Result<Self> {
        let (tag, _) = read_cstr(payload)?;
        Ok(Self { tag })
    }

    /// Number of rows affected, from the last word of the tag.
    ///
    /// `None` for commands without a count (e.g. "CREATE TABLE").
    pub fn rows_affected(&self) -> Option<u64> {
        let mut words = self.tag.split_whitespace();
        let command = words.next()?;
        if !matches!(
            command,
            "SELECT" | "INSERT" | "UPDATE" | "DELETE" | "MERGE" | "COPY" | "MOVE" | "FETCH"
        ) {
            return None;
        }
        words.last()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::{
        write_cstr, write_i16, write_i32, write_u16, write_u32, write_value,
    };

    fn description(names: &[(&str, Oid)]) -> Vec<u8> {
        let mut buf = Vec::new();
        write_u16(&mut buf, names.len() as u16);
        for (name, oid) in names {
            write_cstr(&mut buf, name);
            write_u32(&mut buf, 0);
            write_i16(&mut buf, 0);
            write_u32(&mut buf, *oid);
            write_i16(&mut buf, -1);
            write_i32(&mut buf, -1);
            write_u16(&mut buf, 0);
        }
        buf
    }

    #[test]
    fn test_row_description() {
        let buf = description(&[("id", 20), ("name", 25)]);
        let desc = RowDescription::parse(&buf).unwrap();
        assert_eq!(desc.len(), 2);
        assert_eq!(desc.fields()[0].name, "id");
        assert_eq!(desc.fields()[0].type_oid(), 20);
        assert_eq!(desc.fields()[1].format(), FormatCode::Text);
    }

    #[test]
    fn test_row_description_truncated() {
        let buf = description(&[("id", 20)]);
        assert!(RowDescription::parse(&buf[..buf.len() - 1]).is_err());
        assert!(RowDescription::parse(&[0]).is_err());
    }

    #[test]
    fn test_data_row() {
        let mut buf = Vec::new();
        write_u16(&mut buf, 3);
        write_value(&mut buf, Some(&b"42"[..])).unwrap();
        write_value(&mut buf, None).unwrap();
        write_value(&mut buf, Some(&b""[..])).unwrap();

        let row = DataRow::parse(&buf).unwrap();
        assert_eq!(row.len(), 3);
        let values: Vec<_> = row.iter().collect::<Result<_>>().unwrap();
        assert_eq!(values, vec![Some(&b"42"[..]), None, Some(&b""[..])]);
    }

    #[test]
    fn test_data_row_truncated() {
        let mut buf = Vec::new();
        write_u16(&mut buf, 2);
        write_value(&mut buf, Some(&b"42"[..])).unwrap();
        write_i32(&mut buf, 10);
        buf.extend_from_slice(b"abc");

        let row = DataRow::parse(&buf).unwrap();
        let mut iter = row.iter();
        assert_eq!(iter.next().unwrap().unwrap(), Some(&b"42"[..]));
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_rows_affected() {
        let tag = |tag| CommandComplete { tag };
        assert_eq!(tag("SELECT 5").rows_affected(), Some(5));
        assert_eq!(tag("INSERT 0 1").rows_affected(), Some(1));
        assert_eq!(tag("UPDATE 10").rows_affected(), Some(10));
        assert_eq!(tag("CREATE TABLE").rows_affected(), None);
    }
}
