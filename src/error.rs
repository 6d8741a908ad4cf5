use crate::value::Value;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while mapping records to and from SQL.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{type_name} is not mappable: {reason}")]
    NotMappable {
        type_name: &'static str,
        reason: String,
    },

    #[error("{0} is not supported")]
    UnsupportedType(&'static str),

    #[error("could not bind field `{field}` of {type_name}")]
    Binding {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: Option<FieldError>,
    },

    #[error("failed to instantiate {type_name}")]
    Instantiation { type_name: &'static str },

    #[error("multiple ({count}) instances of {type_name} with id = {id}")]
    MultipleMatches {
        type_name: &'static str,
        id: i32,
        count: usize,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// An error from a driver other than the bundled SQLite one.
    #[error(transparent)]
    Driver(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Driver(err.into())
    }

    pub(crate) fn not_mappable(type_name: &'static str, reason: impl Into<String>) -> Self {
        Error::NotMappable {
            type_name,
            reason: reason.into(),
        }
    }
}

/// Raised by a record when a field cannot take a value.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no field named `{0}`")]
    UnknownField(String),

    #[error("expected {expected}, found {found:?}")]
    Mismatch {
        expected: &'static str,
        found: Value,
    },
}
