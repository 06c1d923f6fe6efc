//! Prepared result handle.
//!
//! The handle owns a completed result together with the cursor position over
//! it. Row and field counts are read from the result once, when a cursor is
//! opened, and cached.

use crate::opts::Opts;
use crate::result::ResultSet;

/// Position of the cursor within the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    /// `next()` has not been called yet.
    #[default]
    Unstarted,
    /// On the row with this 0-based index.
    OnRow(usize),
    /// Past the last row. Terminal.
    Exhausted,
}

/// A completed result plus cursor state.
///
/// Not meant to be shared: a [`BindResult`](crate::cursor::BindResult) holds
/// it mutably for as long as it iterates.
#[derive(Debug)]
pub struct PreparedHandle<R> {
    result: R,
    total_rows: Option<usize>,
    fields: Option<usize>,
    state: RowState,
    pub debug: bool,
    pub strict_bounds: bool,
}

impl<R: ResultSet> PreparedHandle<R> {
    /// Wrap a result with default options.
    pub fn new(result: R) -> Self {
        Self {
            result,
            total_rows: None,
            fields: None,
            state: RowState::Unstarted,
            debug: false,
            strict_bounds: false,
        }
    }

    /// Wrap a result with the given options.
    pub fn with_opts(result: R, opts: &Opts) -> Self {
        let mut handle = Self::new(result);
        handle.debug = opts.debug;
        handle.strict_bounds = opts.strict_bounds;
        handle
    }

    /// Read and cache the row and field counts. Idempotent.
    pub(crate) fn open(&mut self) {
        if self.total_rows.is_none() {
            self.total_rows = Some(self.result.row_count());
        }
        if self.fields.is_none() {
            self.fields = Some(self.result.field_count());
        }
    }

    /// Cached row count, `None` until a cursor was opened.
    pub fn total_rows(&self) -> Option<usize> {
        self.total_rows
    }

    /// Cached field count, `None` until a cursor was opened.
    pub fn fields(&self) -> Option<usize> {
        self.fields
    }

    pub fn state(&self) -> RowState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: RowState) {
        self.state = state;
    }

    pub fn result(&self) -> &R {
        &self.result
    }

    pub fn into_result(self) -> R {
        self.result
    }
}
