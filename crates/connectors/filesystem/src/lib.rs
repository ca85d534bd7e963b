//! Filesystem connector
//!
//! Writes converted rows to local Parquet files.

pub mod parquet;

pub use crate::parquet::{ParquetSink, ParquetWriter};
