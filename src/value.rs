use crate::error::FieldError;
use chrono::{NaiveDate, NaiveDateTime};

/// A native field value, as read off or written onto a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    Text(String),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    /// An optional field holding no value.
    Null,
    /// A value of a Rust type with no SQL representation, named by type.
    Other(&'static str),
}

/// The declared type of a mapped field.
///
/// Primitive kinds read SQL `NULL` as their zero value. Nullable kinds and the
/// object kinds (`Text`, `Timestamp`, `Date`) read it as [`Value::Null`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int,
    Float,
    Double,
    Bool,
    NullableInt,
    NullableFloat,
    NullableDouble,
    NullableBool,
    Text,
    Timestamp,
    Date,
    Other(&'static str),
}

impl FieldType {
    pub fn is_nullable(&self) -> bool {
        !matches!(
            self,
            FieldType::Int | FieldType::Float | FieldType::Double | FieldType::Bool
        )
    }
}

/// Rust types that can back a mapped field.
pub trait SqlType {
    const FIELD_TYPE: FieldType;
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

macro_rules! impl_value_conversions {
    ($ty:ty, $variant:ident, $field_type:ident, $nullable:ident, $lit:literal) => {
        impl SqlType for $ty {
            const FIELD_TYPE: FieldType = FieldType::$field_type;
        }

        impl SqlType for Option<$ty> {
            const FIELD_TYPE: FieldType = FieldType::$nullable;
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }

        impl From<Option<$ty>> for Value {
            fn from(value: Option<$ty>) -> Self {
                value.map_or(Value::Null, Value::$variant)
            }
        }

        impl TryFrom<Value> for $ty {
            type Error = FieldError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(v) => Ok(v),
                    found => Err(FieldError::Mismatch {
                        expected: $lit,
                        found,
                    }),
                }
            }
        }

        impl TryFrom<Value> for Option<$ty> {
            type Error = FieldError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    Value::$variant(v) => Ok(Some(v)),
                    Value::Null => Ok(None),
                    found => Err(FieldError::Mismatch {
                        expected: concat!("Option<", $lit, ">"),
                        found,
                    }),
                }
            }
        }
    };
}

impl_value_conversions!(i32, Int, Int, NullableInt, "i32");
impl_value_conversions!(f32, Float, Float, NullableFloat, "f32");
impl_value_conversions!(f64, Double, Double, NullableDouble, "f64");
impl_value_conversions!(bool, Bool, Bool, NullableBool, "bool");
impl_value_conversions!(String, Text, Text, Text, "String");
impl_value_conversions!(NaiveDateTime, Timestamp, Timestamp, Timestamp, "NaiveDateTime");
impl_value_conversions!(NaiveDate, Date, Date, Date, "NaiveDate");
