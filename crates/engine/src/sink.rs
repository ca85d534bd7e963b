use std::path::{Path, PathBuf};

use sluice_common::{Result, RowRecord, SchemaDescriptor};

/// What a finished output file holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub rows: u64,
    pub row_groups: usize,
}

/// Creates writers for a columnar output format.
pub trait OutputSink {
    type Writer: RowWriter;

    /// Create or truncate the file at `path` and prepare it for `schema`.
    fn open(&self, schema: &SchemaDescriptor, path: &Path) -> Result<Self::Writer>;
}

/// An open output file accepting one record at a time.
pub trait RowWriter {
    fn write(&mut self, record: &RowRecord) -> Result<()>;

    /// Flush buffered rows, write the footer and close the file handle.
    fn finalize(self) -> Result<FileSummary>;

    /// Close the file handle without finalizing. The partial file is removed
    /// where possible.
    fn abort(self);
}
