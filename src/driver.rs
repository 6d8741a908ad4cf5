//! The seam between the mapper and a SQL driver.

use crate::{codec::Parameter, error::Result};
use chrono::{NaiveDate, NaiveDateTime};

/// A database connection able to compile and run parameterized SQL.
pub trait Connection {
    /// Handle to a compiled statement.
    type Statement;

    fn prepare(&mut self, sql: &str) -> Result<Self::Statement>;

    /// Runs an update. `params[n]` is bound at position `n + 1`.
    fn execute(&mut self, statement: &Self::Statement, params: &[Parameter]) -> Result<usize>;

    /// Runs a query, handing each row of the cursor to `row` in order.
    fn query(
        &mut self,
        statement: &Self::Statement,
        params: &[Parameter],
        row: &mut dyn FnMut(&dyn ResultRow) -> Result<()>,
    ) -> Result<()>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Positional, typed access to the current row of a cursor.
///
/// Columns are 0-based. Every getter returns `None` for SQL `NULL`.
pub trait ResultRow {
    fn get_int(&self, index: usize) -> Result<Option<i32>>;
    fn get_float(&self, index: usize) -> Result<Option<f32>>;
    fn get_double(&self, index: usize) -> Result<Option<f64>>;
    fn get_bool(&self, index: usize) -> Result<Option<bool>>;
    fn get_text(&self, index: usize) -> Result<Option<String>>;
    fn get_timestamp(&self, index: usize) -> Result<Option<NaiveDateTime>>;
    fn get_date(&self, index: usize) -> Result<Option<NaiveDate>>;
}
