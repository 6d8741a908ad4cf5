//! Conversion between native values and SQL parameters or result columns.
//!
//! Parameters dispatch on the runtime kind of the value. Result columns
//! dispatch on the declared type of the receiving field, which is what lets a
//! primitive field read `NULL` as zero while a nullable one reads it as
//! [`Value::Null`].

use crate::{
    driver::ResultRow,
    error::{Error, Result},
    value::{FieldType, Value},
};
use chrono::{NaiveDate, NaiveDateTime};

/// A typed value ready to be bound to a statement placeholder.
///
/// Each variant corresponds to exactly one bind call of the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    Text(String),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    Null,
}

pub fn to_parameter(value: Value) -> Result<Parameter> {
    let param = match value {
        Value::Int(v) => Parameter::Int(v),
        Value::Float(v) => Parameter::Float(v),
        Value::Double(v) => Parameter::Double(v),
        Value::Bool(v) => Parameter::Bool(v),
        Value::Text(v) => Parameter::Text(v),
        Value::Timestamp(v) => Parameter::Timestamp(v),
        Value::Date(v) => Parameter::Date(v),
        Value::Null => Parameter::Null,
        Value::Other(ty) => return Err(Error::UnsupportedType(ty)),
    };
    Ok(param)
}

pub fn from_result_column(ty: &FieldType, row: &dyn ResultRow, index: usize) -> Result<Value> {
    let value = match ty {
        FieldType::Int => Value::Int(row.get_int(index)?.unwrap_or_default()),
        FieldType::Float => Value::Float(row.get_float(index)?.unwrap_or_default()),
        FieldType::Double => Value::Double(row.get_double(index)?.unwrap_or_default()),
        FieldType::Bool => Value::Bool(row.get_bool(index)?.unwrap_or_default()),
        FieldType::NullableInt => row.get_int(index)?.into(),
        FieldType::NullableFloat => row.get_float(index)?.into(),
        FieldType::NullableDouble => row.get_double(index)?.into(),
        FieldType::NullableBool => row.get_bool(index)?.into(),
        FieldType::Text => row.get_text(index)?.into(),
        FieldType::Timestamp => row.get_timestamp(index)?.into(),
        FieldType::Date => row.get_date(index)?.into(),
        FieldType::Other(ty) => return Err(Error::UnsupportedType(*ty)),
    };
    Ok(value)
}
