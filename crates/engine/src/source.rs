use sluice_common::{ColumnDescriptor, Result};

/// Raw cells of one row, in column order. `None` is SQL NULL.
pub type RawRow = Vec<Option<Vec<u8>>>;

/// A forward-only handle over one query result.
///
/// Rows cannot be re-read once pulled.
#[async_trait::async_trait]
pub trait ResultCursor: Send {
    /// Column metadata, available before the first row is pulled.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Pull the next row, or `None` once the result is exhausted.
    async fn next_row(&mut self) -> Result<Option<RawRow>>;

    /// Surface any error that only shows up after the last row, such as a
    /// connection dropped while the server was still sending the result.
    async fn finish(&mut self) -> Result<()>;
}
