//! Result handlers.

use crate::error::Result;
use crate::handle::PreparedHandle;
use crate::opts::Opts;
use crate::protocol::backend::query::{CommandComplete, DataRow, RowDescription};
use crate::result::TextResult;

/// Handler for text-format query results.
///
/// Callback patterns by statement type:
/// - SELECT with rows: `result_start` → `row*` → `result_end`
/// - SELECT with 0 rows: `result_start` → `result_end`
/// - INSERT/UPDATE/DELETE: `result_end` only (with affected row count)
///
/// For multi-statement queries like `"SELECT 1; UPDATE foo SET x=1"`:
/// ```text
/// result_start → row* → result_end   // SELECT 1
/// result_end                          // UPDATE
/// ```
pub trait TextHandler {
    /// Called when a result set begins.
    fn result_start(&mut self, cols: RowDescription<'_>) -> Result<()> {
        let _ = cols;
        Ok(())
    }

    /// Called for each data row.
    fn row(&mut self, cols: RowDescription<'_>, row: DataRow<'_>) -> Result<()>;

    /// Called when a result set ends.
    fn result_end(&mut self, complete: CommandComplete<'_>) -> Result<()> {
        let _ = complete;
        Ok(())
    }
}

/// Handler that buffers each result set into a [`TextResult`].
#[derive(Debug, Default)]
pub struct ResultCollector {
    current: Option<TextResult>,
    results: Vec<TextResult>,
    rows_affected: Option<u64>,
}

impl ResultCollector {
    /// Create a new collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed result sets, in order.
    pub fn results(&self) -> &[TextResult] {
        &self.results
    }

    /// Row count from the last CommandComplete, if it had one.
    pub fn rows_affected(&self) -> Option<u64> {
        self.rows_affected
    }

    /// Take the last completed result set.
    ///
    /// Statements without rows (INSERT, DDL, ...) yield an empty result, so
    /// the cursor over it reports no rows.
    pub fn into_result(mut self) -> TextResult {
        self.results.pop().unwrap_or_default()
    }

    /// Take the last completed result set as a handle ready for a cursor.
    pub fn into_handle(self, opts: &Opts) -> PreparedHandle<TextResult> {
        PreparedHandle::with_opts(self.into_result(), opts)
    }
}

impl TextHandler for ResultCollector {
    fn result_start(&mut self, cols: RowDescription<'_>) -> Result<()> {
        self.current = Some(TextResult::from_description(&cols));
        Ok(())
    }

    fn row(&mut self, cols: RowDescription<'_>, row: DataRow<'_>) -> Result<()> {
        self.current
            .get_or_insert_with(|| TextResult::from_description(&cols))
            .push_data_row(row)
    }

    fn result_end(&mut self, complete: CommandComplete<'_>) -> Result<()> {
        self.rows_affected = complete.rows_affected();
        self.results.push(self.current.take().unwrap_or_default());
        Ok(())
    }
}
