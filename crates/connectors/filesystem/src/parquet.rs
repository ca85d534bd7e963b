use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    ArrayBuilder, ArrayRef, BinaryBuilder, Float64Builder, Int32Builder, Int64Builder,
    StringBuilder,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::schema::types::ColumnPath;
use sluice_common::{Error, FieldSchema, LogicalType, Result, RowRecord, SchemaDescriptor, StorageType};
use sluice_engine::{FileSummary, OutputSink, RowWriter};
use tracing::{debug, info, warn};

pub const DEFAULT_BATCH_SIZE: usize = 1024;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 64 * 1024;

/// Opens Parquet files for a [`SchemaDescriptor`].
///
/// Duplicate field names are rejected at open time: the positional record
/// would be written fine, but the resulting file could not be read by name.
#[derive(Debug, Clone)]
pub struct ParquetSink {
    batch_size: usize,
    row_group_size: usize,
    compression: Compression,
}

impl Default for ParquetSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ParquetSink {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            compression: Compression::SNAPPY,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_row_group_size(mut self, row_group_size: usize) -> Self {
        self.row_group_size = row_group_size.max(1);
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn writer_properties(&self, schema: &SchemaDescriptor) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_created_by(format!("sluice version {}", env!("CARGO_PKG_VERSION")))
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_dictionary_enabled(false);
        for field in schema.fields.iter().filter(|f| f.is_dictionary_encoded()) {
            builder = builder.set_column_dictionary_enabled(ColumnPath::from(field.name.as_str()), true);
        }
        builder.build()
    }
}

fn arrow_type(field: &FieldSchema) -> DataType {
    match (field.storage_type, field.logical_type) {
        (StorageType::Int32, _) => DataType::Int32,
        (StorageType::Int64, _) => DataType::Int64,
        (StorageType::Double, _) => DataType::Float64,
        (StorageType::ByteArray, Some(LogicalType::Utf8)) => DataType::Utf8,
        (StorageType::ByteArray, None) => DataType::Binary,
    }
}

/// Arrow schema equivalent of `schema`, nullability included.
pub fn arrow_schema(schema: &SchemaDescriptor) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields
        .iter()
        .map(|f| Field::new(f.name.as_str(), arrow_type(f), f.nullable))
        .collect();
    Arc::new(Schema::new(fields))
}

impl OutputSink for ParquetSink {
    type Writer = ParquetWriter;

    fn open(&self, schema: &SchemaDescriptor, path: &Path) -> Result<ParquetWriter> {
        if schema.is_empty() {
            return Err(Error::open(path, "schema has no columns"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = schema.field_names().find(|name| !seen.insert(*name)) {
            return Err(Error::open(path, format!("duplicate column name '{}'", dup)));
        }

        let arrow_schema = arrow_schema(schema);
        let file = File::create(path).map_err(|e| Error::open(path, e))?;
        let handle = file.try_clone().map_err(|e| Error::open(path, e))?;
        let writer = ArrowWriter::try_new(file, arrow_schema.clone(), Some(self.writer_properties(schema)))
            .map_err(|e| Error::open(path, e))?;

        info!(path = %path.display(), columns = schema.len(), "Opened Parquet output");

        Ok(ParquetWriter {
            path: path.to_path_buf(),
            fields: schema.fields.clone(),
            arrow_schema,
            columns: schema.fields.iter().map(|f| ColumnBuffer::new(f, self.batch_size)).collect(),
            writer,
            handle,
            batch_size: self.batch_size,
            buffered: 0,
            rows: 0,
        })
    }
}

/// A cell parsed for the storage type of its column.
#[derive(Debug)]
enum Cell<'a> {
    Null,
    Int32(i32),
    Int64(i64),
    Double(f64),
    Text(&'a str),
}

/// Per-column Arrow builder for the rows of the current batch.
enum ColumnBuffer {
    Int32(Int32Builder),
    Int64(Int64Builder),
    Double(Float64Builder),
    Utf8(StringBuilder),
    Binary(BinaryBuilder),
}

impl ColumnBuffer {
    fn new(field: &FieldSchema, capacity: usize) -> Self {
        match arrow_type(field) {
            DataType::Int32 => ColumnBuffer::Int32(Int32Builder::with_capacity(capacity)),
            DataType::Int64 => ColumnBuffer::Int64(Int64Builder::with_capacity(capacity)),
            DataType::Float64 => ColumnBuffer::Double(Float64Builder::with_capacity(capacity)),
            DataType::Utf8 => ColumnBuffer::Utf8(StringBuilder::with_capacity(capacity, capacity * 16)),
            _ => ColumnBuffer::Binary(BinaryBuilder::with_capacity(capacity, capacity * 16)),
        }
    }

    /// Parses a cell for this column without touching the builder.
    fn parse<'a>(&self, value: Option<&'a str>) -> std::result::Result<Cell<'a>, String> {
        let Some(v) = value else {
            return Ok(Cell::Null);
        };
        let cell = match self {
            ColumnBuffer::Int32(_) => {
                Cell::Int32(v.parse::<i32>().map_err(|e| format!("'{}' is not an INT32: {}", v, e))?)
            }
            ColumnBuffer::Int64(_) => {
                Cell::Int64(v.parse::<i64>().map_err(|e| format!("'{}' is not an INT64: {}", v, e))?)
            }
            ColumnBuffer::Double(_) => {
                Cell::Double(v.parse::<f64>().map_err(|e| format!("'{}' is not a DOUBLE: {}", v, e))?)
            }
            ColumnBuffer::Utf8(_) | ColumnBuffer::Binary(_) => Cell::Text(v),
        };
        Ok(cell)
    }

    /// Appends a cell produced by [`ColumnBuffer::parse`] on this column.
    fn append(&mut self, cell: Cell<'_>) {
        match (self, cell) {
            (ColumnBuffer::Int32(b), Cell::Null) => b.append_null(),
            (ColumnBuffer::Int64(b), Cell::Null) => b.append_null(),
            (ColumnBuffer::Double(b), Cell::Null) => b.append_null(),
            (ColumnBuffer::Utf8(b), Cell::Null) => b.append_null(),
            (ColumnBuffer::Binary(b), Cell::Null) => b.append_null(),
            (ColumnBuffer::Int32(b), Cell::Int32(v)) => b.append_value(v),
            (ColumnBuffer::Int64(b), Cell::Int64(v)) => b.append_value(v),
            (ColumnBuffer::Double(b), Cell::Double(v)) => b.append_value(v),
            (ColumnBuffer::Utf8(b), Cell::Text(v)) => b.append_value(v),
            (ColumnBuffer::Binary(b), Cell::Text(v)) => b.append_value(v.as_bytes()),
            (_, cell) => unreachable!("{:?} was not parsed for this column", cell),
        }
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnBuffer::Int32(b) => Arc::new(b.finish()),
            ColumnBuffer::Int64(b) => Arc::new(b.finish()),
            ColumnBuffer::Double(b) => Arc::new(b.finish()),
            ColumnBuffer::Utf8(b) => Arc::new(b.finish()),
            ColumnBuffer::Binary(b) => Arc::new(b.finish()),
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnBuffer::Int32(b) => b.len(),
            ColumnBuffer::Int64(b) => b.len(),
            ColumnBuffer::Double(b) => b.len(),
            ColumnBuffer::Utf8(b) => b.len(),
            ColumnBuffer::Binary(b) => b.len(),
        }
    }
}

/// An open Parquet file.
///
/// Rows are buffered per column and handed to the Arrow writer every
/// `batch_size` rows. A rejected record is not buffered, and the writer stays
/// usable.
pub struct ParquetWriter {
    path: PathBuf,
    fields: Vec<FieldSchema>,
    arrow_schema: SchemaRef,
    columns: Vec<ColumnBuffer>,
    writer: ArrowWriter<File>,
    // Second handle on the output file, synced and closed after the footer.
    handle: File,
    batch_size: usize,
    buffered: usize,
    rows: u64,
}

impl ParquetWriter {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush_batch(&mut self) -> Result<()> {
        if self.buffered == 0 {
            return Ok(());
        }
        debug_assert!(self.columns.iter().all(|c| c.len() == self.buffered));
        let arrays: Vec<ArrayRef> = self.columns.iter_mut().map(ColumnBuffer::finish).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(self.buffered));
        let batch = RecordBatch::try_new_with_options(self.arrow_schema.clone(), arrays, &options)
            .map_err(|e| Error::write(self.rows, "*", e))?;
        self.writer.write(&batch).map_err(|e| Error::write(self.rows, "*", e))?;
        debug!(rows = self.buffered, total = self.rows, "Flushed batch");
        self.buffered = 0;
        Ok(())
    }

    fn finish_file(mut self) -> Result<FileSummary> {
        self.flush_batch().map_err(|e| Error::finalize(&self.path, e))?;
        let metadata = self.writer.close().map_err(|e| Error::finalize(&self.path, e))?;
        self.handle.sync_all().map_err(|e| Error::finalize(&self.path, e))?;
        drop(self.handle);
        Ok(FileSummary { path: self.path, rows: self.rows, row_groups: metadata.row_groups.len() })
    }

    fn remove_partial(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), "Could not remove partial output: {}", e);
        }
    }
}

impl RowWriter for ParquetWriter {
    fn write(&mut self, record: &RowRecord) -> Result<()> {
        let row = self.rows;
        if record.len() != self.fields.len() {
            return Err(Error::write(
                row,
                "*",
                format!("record has {} cells, schema has {} fields", record.len(), self.fields.len()),
            ));
        }
        // Every cell is checked before any builder grows, so a rejected
        // record leaves the batch as it was.
        let mut cells = Vec::with_capacity(self.fields.len());
        for ((field, column), (name, value)) in self.fields.iter().zip(&self.columns).zip(record.iter()) {
            if name != field.name {
                return Err(Error::write(row, &field.name, format!("record cell is named '{}'", name)));
            }
            if value.is_none() && !field.nullable {
                return Err(Error::write(row, &field.name, "NULL in a required column"));
            }
            cells.push(column.parse(value).map_err(|reason| Error::write(row, &field.name, reason))?);
        }
        for (column, cell) in self.columns.iter_mut().zip(cells) {
            column.append(cell);
        }
        self.rows += 1;
        self.buffered += 1;
        if self.buffered >= self.batch_size {
            self.flush_batch()?;
        }
        Ok(())
    }

    fn finalize(self) -> Result<FileSummary> {
        let path = self.path.clone();
        let result = self.finish_file();
        if result.is_err() {
            Self::remove_partial(&path);
        }
        result
    }

    fn abort(self) {
        let path = self.path.clone();
        drop(self.writer);
        drop(self.handle);
        Self::remove_partial(&path);
        debug!(path = %path.display(), rows = self.rows, "Aborted Parquet output");
    }
}
