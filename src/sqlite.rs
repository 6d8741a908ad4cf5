use crate::{
    codec::Parameter,
    driver::{Connection, ResultRow},
    error::Result,
    mapper::Mapper,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{
    params_from_iter,
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::{debug, info};

/// Prepared statements a fresh connection keeps before it has to grow.
pub const INITIAL_STATEMENT_CAPACITY: usize = 16;

/// SQLite mapper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub db_path: String,
}

impl SqliteConfig {
    /// Create a new SQLite config for the database at `db_path`
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }
}

impl Mapper<SqliteConnection> {
    /// Open the database described by `config` and map records over it.
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        info!(path = %config.db_path, "opening sqlite database");
        let connection = rusqlite::Connection::open(&config.db_path)?;
        Ok(Mapper::new(SqliteConnection::new(connection)))
    }
}

/// A rusqlite connection whose prepared statement cache grows with the
/// statements compiled on it, so none of them is ever evicted.
///
/// Dereferences to the underlying [`rusqlite::Connection`] for schema setup
/// and other work outside the mapper.
#[derive(Debug)]
pub struct SqliteConnection {
    inner: rusqlite::Connection,
    compiled: usize,
    capacity: usize,
}

impl SqliteConnection {
    pub fn new(inner: rusqlite::Connection) -> Self {
        inner.set_prepared_statement_cache_capacity(INITIAL_STATEMENT_CAPACITY);
        Self {
            inner,
            compiled: 0,
            capacity: INITIAL_STATEMENT_CAPACITY,
        }
    }

    /// Number of statements compiled through [`Connection::prepare`].
    pub fn compiled(&self) -> usize {
        self.compiled
    }

    /// Current capacity of the prepared statement cache.
    pub fn statement_capacity(&self) -> usize {
        self.capacity
    }

    // must run before the new statement enters the cache, which evicts on insert
    fn reserve(&mut self) {
        if self.compiled < self.capacity {
            return;
        }
        self.capacity *= 2;
        debug!(capacity = self.capacity, "growing prepared statement cache");
        self.inner.set_prepared_statement_cache_capacity(self.capacity);
    }
}

impl Deref for SqliteConnection {
    type Target = rusqlite::Connection;

    fn deref(&self) -> &rusqlite::Connection {
        &self.inner
    }
}

/// A statement compiled into the connection's prepared statement cache.
#[derive(Debug, Clone)]
pub struct SqliteStatement {
    sql: String,
}

impl SqliteStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Connection for SqliteConnection {
    type Statement = SqliteStatement;

    fn prepare(&mut self, sql: &str) -> Result<SqliteStatement> {
        self.reserve();
        // compiles now so bad SQL fails here, then stays in the connection's cache
        self.inner.prepare_cached(sql)?;
        self.compiled += 1;
        Ok(SqliteStatement {
            sql: sql.to_string(),
        })
    }

    fn execute(&mut self, statement: &SqliteStatement, params: &[Parameter]) -> Result<usize> {
        let mut stmt = self.inner.prepare_cached(&statement.sql)?;
        Ok(stmt.execute(params_from_iter(params))?)
    }

    fn query(
        &mut self,
        statement: &SqliteStatement,
        params: &[Parameter],
        each: &mut dyn FnMut(&dyn ResultRow) -> Result<()>,
    ) -> Result<()> {
        let mut stmt = self.inner.prepare_cached(&statement.sql)?;

        let mut rows = stmt.query(params_from_iter(params))?;
        while let Some(row) = rows.next()? {
            each(row)?;
        }
        Ok(())
    }

    fn close(self) -> Result<()> {
        self.inner.close().map_err(|(_, err)| err.into())
    }
}

impl ToSql for Parameter {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Parameter::Int(v) => v.to_sql(),
            Parameter::Float(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(f64::from(*v)))),
            Parameter::Double(v) => v.to_sql(),
            Parameter::Bool(v) => v.to_sql(),
            Parameter::Text(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Parameter::Timestamp(v) => v.to_sql(),
            Parameter::Date(v) => v.to_sql(),
            Parameter::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
        }
    }
}

impl ResultRow for Row<'_> {
    fn get_int(&self, index: usize) -> Result<Option<i32>> {
        Ok(self.get(index)?)
    }

    // SQLite stores REAL as f64 only
    fn get_float(&self, index: usize) -> Result<Option<f32>> {
        Ok(self.get::<_, Option<f64>>(index)?.map(|v| v as f32))
    }

    fn get_double(&self, index: usize) -> Result<Option<f64>> {
        Ok(self.get(index)?)
    }

    fn get_bool(&self, index: usize) -> Result<Option<bool>> {
        Ok(self.get(index)?)
    }

    fn get_text(&self, index: usize) -> Result<Option<String>> {
        Ok(self.get(index)?)
    }

    fn get_timestamp(&self, index: usize) -> Result<Option<NaiveDateTime>> {
        Ok(self.get(index)?)
    }

    fn get_date(&self, index: usize) -> Result<Option<NaiveDate>> {
        Ok(self.get(index)?)
    }
}
