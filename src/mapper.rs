//! Writes and reads records through cached statements.

use crate::{
    cache::{CompiledStatement, StatementCache},
    codec::{from_result_column, to_parameter, Parameter},
    descriptor::{MappingDescriptor, Record},
    driver::{Connection, ResultRow},
    error::{Error, Result},
    sqlite::SqliteConnection,
    value::Value,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Writes and reads records over a single owned connection.
///
/// The mapper owns its connection and the statements compiled on it. Both are
/// released together when the mapper is closed or dropped.
pub struct Mapper<C: Connection = SqliteConnection> {
    statements: StatementCache<C::Statement>,
    connection: C,
}

impl<C: Connection> Mapper<C> {
    pub fn new(connection: C) -> Self {
        Self {
            statements: StatementCache::new(),
            connection,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn statements(&self) -> &StatementCache<C::Statement> {
        &self.statements
    }

    pub fn insert_statement<T: Record>(&mut self) -> Result<Arc<CompiledStatement<C::Statement>>> {
        self.statements.insert::<T, C>(&mut self.connection)
    }

    pub fn select_statement<T: Record>(
        &mut self,
        suffix: &str,
    ) -> Result<Arc<CompiledStatement<C::Statement>>> {
        self.statements.select::<T, C>(&mut self.connection, suffix)
    }

    /// Inserts `record` as a new row, skipping read-only fields.
    ///
    /// Returns the number of affected rows reported by the driver.
    pub fn write<T: Record>(&mut self, record: &T) -> Result<usize> {
        let statement = self.insert_statement::<T>()?;
        let descriptor = statement.descriptor();

        let params = descriptor
            .insert_fields()
            .map(|field| {
                let value = record.get(field.name).ok_or(Error::Binding {
                    type_name: descriptor.type_name,
                    field: field.name,
                    source: None,
                })?;
                to_parameter(value)
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(sql = statement.sql(), params = params.len(), "executing insert");
        self.connection.execute(statement.handle(), &params)
    }

    /// Selects the records matching `suffix`, which is appended verbatim after
    /// `FROM <table>` and may hold `?` placeholders for `params`.
    pub fn select<T: Record>(&mut self, suffix: &str, params: &[Value]) -> Result<Vec<T>> {
        let statement = self.select_statement::<T>(suffix)?;
        let descriptor = statement.descriptor();

        let params = params
            .iter()
            .cloned()
            .map(to_parameter)
            .collect::<Result<Vec<Parameter>>>()?;

        trace!(sql = statement.sql(), params = params.len(), "executing query");
        let mut records = Vec::new();
        self.connection.query(
            statement.handle(),
            &params,
            &mut |row: &dyn ResultRow| -> Result<()> {
                records.push(populate::<T>(descriptor, row)?);
                Ok(())
            },
        )?;

        Ok(records)
    }

    pub fn select_all<T: Record>(&mut self) -> Result<Vec<T>> {
        self.select("", &[])
    }

    /// Selects the record whose `id` column equals `id`.
    ///
    /// More than one match is reported as [`Error::MultipleMatches`].
    pub fn select_by_id<T: Record>(&mut self, id: i32) -> Result<Option<T>> {
        let mut records = self.select::<T>("WHERE id = ?", &[Value::Int(id)])?;
        match records.len() {
            0 | 1 => Ok(records.pop()),
            count => Err(Error::MultipleMatches {
                type_name: std::any::type_name::<T>(),
                id,
                count,
            }),
        }
    }

    /// Drops every compiled statement, then closes the connection.
    pub fn close(self) -> Result<()> {
        let Mapper {
            statements,
            connection,
        } = self;

        debug!(statements = statements.len(), "closing mapper");
        drop(statements);
        connection.close()
    }
}

/// Builds a record from a row whose columns follow the descriptor's field order.
fn populate<T: Record>(descriptor: &MappingDescriptor, row: &dyn ResultRow) -> Result<T> {
    let mut record = T::instantiate().ok_or(Error::Instantiation {
        type_name: descriptor.type_name,
    })?;

    for (index, field) in descriptor.fields.iter().enumerate() {
        let value = from_result_column(&field.ty, row, index)?;
        record
            .set(field.name, value)
            .map_err(|source| Error::Binding {
                type_name: descriptor.type_name,
                field: field.name,
                source: Some(source),
            })?;
    }

    Ok(record)
}
