//! Compiled INSERT and SELECT statements, built once per key.

use crate::{
    descriptor::{resolve, MappingDescriptor, Record},
    driver::Connection,
    error::Result,
};
use std::{any::TypeId, collections::HashMap, sync::Arc};
use tracing::debug;

/// A prepared statement together with the SQL and the descriptor it was built from.
#[derive(Debug)]
pub struct CompiledStatement<S> {
    handle: S,
    sql: String,
    descriptor: Arc<MappingDescriptor>,
}

impl<S> CompiledStatement<S> {
    pub fn handle(&self) -> &S {
        &self.handle
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The descriptor whose field order matches this statement's columns.
    pub fn descriptor(&self) -> &MappingDescriptor {
        &self.descriptor
    }
}

/// Statements keyed by record type (INSERT) or by record type and verbatim
/// query suffix (SELECT).
///
/// Entries are never evicted; the cache lives as long as its connection.
pub struct StatementCache<S> {
    descriptors: HashMap<TypeId, Arc<MappingDescriptor>>,
    inserts: HashMap<TypeId, Arc<CompiledStatement<S>>>,
    selects: HashMap<TypeId, HashMap<String, Arc<CompiledStatement<S>>>>,
}

impl<S> Default for StatementCache<S> {
    fn default() -> Self {
        Self {
            descriptors: HashMap::new(),
            inserts: HashMap::new(),
            selects: HashMap::new(),
        }
    }
}

impl<S> StatementCache<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of compiled statements held.
    pub fn len(&self) -> usize {
        self.inserts.len() + self.selects.values().map(HashMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The resolved descriptor of `T`, resolved on first use.
    pub fn descriptor<T: Record>(&mut self) -> Result<Arc<MappingDescriptor>> {
        let key = TypeId::of::<T>();
        if let Some(descriptor) = self.descriptors.get(&key) {
            return Ok(descriptor.clone());
        }

        let descriptor = Arc::new(resolve::<T>()?);
        self.descriptors.insert(key, descriptor.clone());
        Ok(descriptor)
    }

    pub fn insert<T, C>(&mut self, conn: &mut C) -> Result<Arc<CompiledStatement<S>>>
    where
        T: Record,
        C: Connection<Statement = S>,
    {
        let key = TypeId::of::<T>();
        if let Some(statement) = self.inserts.get(&key) {
            return Ok(statement.clone());
        }

        let descriptor = self.descriptor::<T>()?;
        let columns = descriptor.insert_columns();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            descriptor.table,
            columns.join(", "),
            vec!["?"; columns.len()].join(", ")
        );

        debug!(record = descriptor.type_name, %sql, "compiling insert statement");
        let statement = Arc::new(compile(conn, sql, descriptor)?);
        self.inserts.insert(key, statement.clone());
        Ok(statement)
    }

    pub fn select<T, C>(&mut self, conn: &mut C, suffix: &str) -> Result<Arc<CompiledStatement<S>>>
    where
        T: Record,
        C: Connection<Statement = S>,
    {
        let key = TypeId::of::<T>();
        if let Some(statement) = self.selects.get(&key).and_then(|s| s.get(suffix)) {
            return Ok(statement.clone());
        }

        let descriptor = self.descriptor::<T>()?;
        let sql = format!(
            "SELECT {} FROM {} {}",
            descriptor.columns().join(", "),
            descriptor.table,
            suffix
        );

        debug!(record = descriptor.type_name, suffix, %sql, "compiling select statement");
        let statement = Arc::new(compile(conn, sql, descriptor)?);
        self.selects
            .entry(key)
            .or_default()
            .insert(suffix.to_string(), statement.clone());
        Ok(statement)
    }
}

fn compile<C: Connection>(
    conn: &mut C,
    sql: String,
    descriptor: Arc<MappingDescriptor>,
) -> Result<CompiledStatement<C::Statement>> {
    let handle = conn.prepare(&sql)?;
    Ok(CompiledStatement {
        handle,
        sql,
        descriptor,
    })
}
