//! Mapping descriptors and the resolver that validates them.

use crate::{
    error::{Error, FieldError, Result},
    value::{FieldType, SqlType, Value},
};
use std::collections::HashSet;

/// Metadata for one mapped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub column: &'static str,
    pub ty: FieldType,
    pub read_only: bool,
    pub primary_key: bool,
}

impl FieldDescriptor {
    /// A field stored in the column of the same name.
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            column: name,
            ty,
            read_only: false,
            primary_key: false,
        }
    }

    /// A field whose type is taken from the Rust type backing it.
    pub fn of<T: SqlType>(name: &'static str) -> Self {
        Self::new(name, T::FIELD_TYPE)
    }

    pub fn column(mut self, column: &'static str) -> Self {
        self.column = column;
        self
    }

    /// Exclude the field from INSERT statements. It is still selected.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Table name and ordered fields of a record type.
///
/// Field order is the column order of every statement built for the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDescriptor {
    pub table: &'static str,
    pub fields: Vec<FieldDescriptor>,
    pub type_name: &'static str,
}

impl MappingDescriptor {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: Vec::new(),
            type_name: "",
        }
    }

    /// A descriptor with no table designation; resolving it fails.
    pub fn unmapped() -> Self {
        Self::new("")
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields written by INSERT, in declaration order.
    pub fn insert_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| !field.read_only)
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.column).collect()
    }

    pub fn insert_columns(&self) -> Vec<&'static str> {
        self.insert_fields().map(|field| field.column).collect()
    }

    pub fn primary_key(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.primary_key)
    }
}

/// A type whose instances are stored as rows of a table.
pub trait Record: Sized + 'static {
    /// The table and fields backing this type.
    fn descriptor() -> MappingDescriptor;

    /// A zero-valued instance to populate from a row, or `None` when the
    /// type cannot be constructed that way.
    fn instantiate() -> Option<Self>;

    /// Reads a field by name. `None` means the field cannot be read.
    fn get(&self, field: &str) -> Option<Value>;

    fn set(&mut self, field: &str, value: Value) -> Result<(), FieldError>;
}

/// Resolves and validates the mapping of `T`.
pub fn resolve<T: Record>() -> Result<MappingDescriptor> {
    let type_name = std::any::type_name::<T>();
    let mut descriptor = T::descriptor();
    descriptor.type_name = type_name;

    if descriptor.table.trim().is_empty() {
        return Err(Error::not_mappable(type_name, "no table designation"));
    }

    if descriptor.fields.is_empty() {
        return Err(Error::not_mappable(type_name, "no mapped fields"));
    }

    let mut seen = HashSet::new();
    for field in &descriptor.fields {
        if !seen.insert(field.name) {
            return Err(Error::not_mappable(
                type_name,
                format!("field `{}` is mapped twice", field.name),
            ));
        }
    }

    Ok(descriptor)
}
