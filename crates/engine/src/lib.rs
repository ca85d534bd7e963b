//! Engine crate
//!
//! Infers an output schema from result column metadata and streams rows from a
//! [`ResultCursor`] into an [`OutputSink`], one row at a time.
//!
//! # Example
//! ```rust
//! use sluice_common::{ColumnDescriptor, StorageType};
//! use sluice_engine::infer_schema;
//!
//! let columns = vec![
//!     ColumnDescriptor::new("id", "BIGINT", false),
//!     ColumnDescriptor::new("name", "VARCHAR", true),
//! ];
//! let schema = infer_schema("users", &columns);
//! assert_eq!(schema.fields[0].storage_type, StorageType::Int64);
//! assert!(schema.fields[1].nullable);
//! ```

pub mod inferencer;
pub mod sink;
pub mod source;
pub mod streamer;

pub use inferencer::{infer_field, infer_schema, lookup, TypeMapping};
pub use sink::{FileSummary, OutputSink, RowWriter};
pub use source::{RawRow, ResultCursor};
pub use streamer::{until_cancelled, RowStreamer, StreamState};
