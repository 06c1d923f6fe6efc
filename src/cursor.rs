//! Forward-only typed cursor over a prepared result handle.
//!
//! ```
//! use pq_bind::{BindResult, Column, PreparedHandle, TextResult};
//!
//! let mut result = TextResult::new(vec![Column { name: "n".into(), type_oid: 20 }]);
//! result.push_row([Some(&b"1"[..])]);
//! result.push_row([Some(&b"2"[..])]);
//!
//! let mut handle = PreparedHandle::new(result);
//! let mut cursor = BindResult::new(&mut handle);
//! let mut sum = 0;
//! while cursor.next() {
//!     sum += cursor.bind_integral(0)?.value;
//! }
//! assert_eq!(sum, 3);
//! # Ok::<(), pq_bind::Error>(())
//! ```

use crate::conversion::FromText;
use crate::error::{Error, Result};
use crate::handle::{PreparedHandle, RowState};
use crate::result::ResultSet;

/// A bound scalar together with its null flag.
///
/// NULL cells carry `T::default()` as value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundValue<T> {
    pub value: T,
    pub is_null: bool,
}

impl<T> BoundValue<T> {
    /// `None` for NULL.
    pub fn into_option(self) -> Option<T> {
        if self.is_null { None } else { Some(self.value) }
    }
}

/// Raw text of a cell on the current row.
///
/// Borrows the cursor, so it cannot be held across [`BindResult::next`].
/// Copy it out if it needs to live longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextCell<'c> {
    bytes: &'c [u8],
    len: usize,
}

impl<'c> TextCell<'c> {
    pub fn as_bytes(&self) -> &'c [u8] {
        self.bytes
    }

    /// Byte length reported by the result.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The text as `&str`.
    pub fn as_str(&self) -> Result<&'c str> {
        simdutf8::compat::from_utf8(self.bytes)
            .map_err(|e| Error::Decode(format!("invalid UTF-8: {}", e)))
    }
}

/// Row cursor with type-directed binds by 0-based column index.
///
/// `next()` must be called before the first bind. Once it returns `false` the
/// cursor stays exhausted.
#[derive(Debug)]
pub struct BindResult<'h, R> {
    handle: &'h mut PreparedHandle<R>,
}

impl<'h, R: ResultSet> BindResult<'h, R> {
    /// Open a cursor over the handle.
    pub fn new(handle: &'h mut PreparedHandle<R>) -> Self {
        handle.open();
        if handle.debug {
            tracing::debug!(
                rows = ?handle.total_rows(),
                fields = ?handle.fields(),
                "constructing bind result"
            );
        }
        Self { handle }
    }

    /// Advance to the next row. Returns `false` once no rows are left.
    #[expect(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if self.handle.debug {
            tracing::debug!(state = ?self.handle.state(), "accessing next row");
        }

        let total = self.handle.total_rows().unwrap_or_default();
        let next = match self.handle.state() {
            RowState::Unstarted if total > 0 => RowState::OnRow(0),
            RowState::OnRow(row) if row + 1 < total => RowState::OnRow(row + 1),
            RowState::Unstarted | RowState::OnRow(_) | RowState::Exhausted => RowState::Exhausted,
        };
        self.handle.set_state(next);
        matches!(next, RowState::OnRow(_))
    }

    /// Index of the current row, if any.
    pub fn row(&self) -> Option<usize> {
        match self.handle.state() {
            RowState::OnRow(row) => Some(row),
            RowState::Unstarted | RowState::Exhausted => None,
        }
    }

    /// Number of fields in the result.
    pub fn field_count(&self) -> usize {
        self.handle.fields().unwrap_or_default()
    }

    /// Bind a boolean column.
    pub fn bind_boolean(&self, index: usize) -> Result<BoundValue<bool>> {
        self.trace("boolean", index);
        self.bind(index)
    }

    /// Bind a floating point column.
    pub fn bind_floating_point(&self, index: usize) -> Result<BoundValue<f64>> {
        self.trace("floating_point", index);
        self.bind(index)
    }

    /// Bind an integral column.
    pub fn bind_integral(&self, index: usize) -> Result<BoundValue<i64>> {
        self.trace("integral", index);
        self.bind(index)
    }

    /// Borrow the raw text of a column.
    ///
    /// No null flag: NULL cells read as empty text. Use
    /// [`is_null`](Self::is_null) when the distinction matters.
    pub fn bind_text(&self, index: usize) -> Result<TextCell<'_>> {
        self.trace("text", index);
        let row = self.check(index)?;
        let result = self.handle.result();
        Ok(TextCell {
            bytes: result.cell_text(row, index),
            len: result.cell_length(row, index),
        })
    }

    /// Whether a column on the current row is NULL.
    pub fn is_null(&self, index: usize) -> Result<bool> {
        let row = self.check(index)?;
        Ok(self.handle.result().cell_is_null(row, index))
    }

    fn bind<T: FromText>(&self, index: usize) -> Result<BoundValue<T>> {
        let row = self.check(index)?;
        let result = self.handle.result();
        if result.cell_is_null(row, index) {
            return Ok(BoundValue {
                value: T::default(),
                is_null: true,
            });
        }
        Ok(BoundValue {
            value: T::from_text(result.cell_text(row, index))?,
            is_null: false,
        })
    }

    /// Bounds check, returning the current row.
    ///
    /// Unless `strict_bounds` is set, `index == field_count` passes: callers
    /// have historically relied on that, and the cell simply reads as NULL.
    fn check(&self, index: usize) -> Result<usize> {
        let fields = self.field_count();
        let out_of_range = if self.handle.strict_bounds {
            index >= fields
        } else {
            index > fields
        };
        if out_of_range {
            return Err(Error::IndexOutOfRange { index, fields });
        }
        self.row().ok_or(Error::NoCurrentRow)
    }

    fn trace(&self, kind: &'static str, index: usize) {
        if self.handle.debug {
            tracing::debug!(kind, index, "binding result");
        }
    }
}
