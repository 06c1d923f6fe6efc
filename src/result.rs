//! Completed result sets.
//!
//! [`ResultSet`] is the read-only view the cursor needs from a finished query.
//! [`TextResult`] is an owned implementation buffered from DataRow messages.

use std::ops::Range;

use crate::error::Result;
use crate::protocol::backend::query::{DataRow, RowDescription};

/// Read access to a completed tabular result.
///
/// Out-of-range cells read as NULL with empty text, the way libpq answers for
/// a missing tuple or field.
pub trait ResultSet {
    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Number of columns.
    fn field_count(&self) -> usize;

    /// Raw text of a cell. Empty for NULL.
    fn cell_text(&self, row: usize, col: usize) -> &[u8];

    /// Byte length of a cell's text.
    fn cell_length(&self, row: usize, col: usize) -> usize {
        self.cell_text(row, col).len()
    }

    /// Whether a cell is NULL.
    fn cell_is_null(&self, row: usize, col: usize) -> bool;
}

impl<R: ResultSet + ?Sized> ResultSet for &R {
    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn cell_text(&self, row: usize, col: usize) -> &[u8] {
        (**self).cell_text(row, col)
    }

    fn cell_length(&self, row: usize, col: usize) -> usize {
        (**self).cell_length(row, col)
    }

    fn cell_is_null(&self, row: usize, col: usize) -> bool {
        (**self).cell_is_null(row, col)
    }
}

/// Column metadata kept from the RowDescription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub type_oid: u32,
}

/// Owned text-format result.
///
/// Cells are stored as received; binary-format columns are not decoded. All
/// cell bytes live in one buffer; each cell is a range into it, or `None`
/// for NULL.
#[derive(Debug, Clone, Default)]
pub struct TextResult {
    columns: Vec<Column>,
    data: Vec<u8>,
    cells: Vec<Option<Range<usize>>>,
    rows: usize,
}

impl TextResult {
    /// Create an empty result with the given columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Default::default()
        }
    }

    /// Create an empty result from a RowDescription.
    pub fn from_description(desc: &RowDescription<'_>) -> Self {
        Self::new(
            desc.iter()
                .map(|f| Column {
                    name: f.name.to_string(),
                    type_oid: f.type_oid(),
                })
                .collect(),
        )
    }

    /// Column metadata.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Append a row from a DataRow message.
    ///
    /// Missing trailing columns are stored as NULL; extra columns are ignored.
    pub fn push_data_row(&mut self, row: DataRow<'_>) -> Result<()> {
        let width = self.columns.len();
        let mut values = row.iter();
        for _ in 0..width {
            let cell = values.next().transpose()?.flatten();
            self.push_cell(cell);
        }
        self.rows += 1;
        Ok(())
    }

    /// Append a row of optional cell texts.
    pub fn push_row<'a, I>(&mut self, row: I)
    where
        I: IntoIterator<Item = Option<&'a [u8]>>,
    {
        let width = self.columns.len();
        let mut values = row.into_iter();
        for _ in 0..width {
            self.push_cell(values.next().flatten());
        }
        self.rows += 1;
    }

    fn push_cell(&mut self, cell: Option<&[u8]>) {
        let range = cell.map(|bytes| {
            let start = self.data.len();
            self.data.extend_from_slice(bytes);
            start..self.data.len()
        });
        self.cells.push(range);
    }

    fn cell(&self, row: usize, col: usize) -> Option<&Range<usize>> {
        if col >= self.columns.len() {
            return None;
        }
        let idx = row.checked_mul(self.columns.len())?.checked_add(col)?;
        self.cells.get(idx)?.as_ref()
    }
}

impl ResultSet for TextResult {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn cell_text(&self, row: usize, col: usize) -> &[u8] {
        self.cell(row, col)
            .and_then(|range| self.data.get(range.clone()))
            .unwrap_or_default()
    }

    fn cell_is_null(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(n: usize) -> Vec<Column> {
        (0..n)
            .map(|i| Column {
                name: format!("c{i}"),
                type_oid: 25,
            })
            .collect()
    }

    #[test]
    fn test_push_row() {
        let mut result = TextResult::new(columns(2));
        result.push_row([Some(&b"a"[..]), None]);
        result.push_row([Some(&b""[..]), Some(&b"bcd"[..])]);

        assert_eq!(result.row_count(), 2);
        assert_eq!(result.field_count(), 2);
        assert_eq!(result.cell_text(0, 0), b"a");
        assert!(result.cell_is_null(0, 1));
        assert!(!result.cell_is_null(1, 0));
        assert_eq!(result.cell_length(1, 0), 0);
        assert_eq!(result.cell_text(1, 1), b"bcd");
    }

    #[test]
    fn test_short_row_padded_with_null() {
        let mut result = TextResult::new(columns(3));
        result.push_row([Some(&b"x"[..])]);
        assert!(result.cell_is_null(0, 1));
        assert!(result.cell_is_null(0, 2));
    }

    #[test]
    fn test_out_of_range_reads_null() {
        let mut result = TextResult::new(columns(1));
        result.push_row([Some(&b"x"[..])]);
        assert!(result.cell_is_null(0, 1));
        assert!(result.cell_is_null(1, 0));
        assert_eq!(result.cell_text(5, 5), b"");
    }
}
