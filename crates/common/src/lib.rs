//! Common crate
//!
//! Schema model, row records and the error taxonomy shared by every Sluice crate.
//!
//! # Example
//! ```rust
//! use sluice_common::{ColumnDescriptor, Error};
//! let column = ColumnDescriptor::new("id", "BIGINT", false);
//! assert_eq!(column.source_type_name, "BIGINT");
//! let err = Error::Query("unknown column".to_string());
//! assert_eq!(err.kind(), "query");
//! ```

pub mod error;
pub mod record;
pub mod schema;

pub use error::{Error, Result};
pub use record::RowRecord;
pub use schema::{
    ColumnDescriptor, EncodingHint, FieldSchema, LogicalType, SchemaDescriptor, StorageType,
};
