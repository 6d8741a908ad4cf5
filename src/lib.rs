//! Maps record types to rows of SQL tables.
//!
//! # Intention
//!
//! - Derive INSERT and SELECT statements from a record's [`MappingDescriptor`].
//! - Compile each statement once per connection and reuse it.
//! - Convert between native field [`Value`]s and SQL parameters or columns.
//!
//! # Architectural Boundaries
//!
//! - The SQL driver sits behind [`driver::Connection`]; SQLite is bundled.
//! - Transactions, schema management and pooling stay with the caller.
//! - Descriptors are declared by the record type; nothing is introspected.

pub mod cache;
pub mod codec;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod mapper;
pub mod sqlite;
pub mod value;

pub use cache::{CompiledStatement, StatementCache};
pub use codec::Parameter;
pub use descriptor::{resolve, FieldDescriptor, MappingDescriptor, Record};
pub use error::{Error, FieldError, Result};
pub use mapper::Mapper;
pub use sqlite::{SqliteConfig, SqliteConnection, SqliteStatement};
pub use value::{FieldType, SqlType, Value};
