//! Sluice
//!
//! Runs one export: connect to MySQL, execute the query, infer the Parquet
//! schema from the result columns and stream every row into the output file.
//!
//! The destination is written in place. When a conversion fails the partial
//! file is removed where possible, but an interrupted process can still leave
//! an unusable file behind.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

use std::path::{Path, PathBuf};

use sluice_common::Result;
use sluice_connector_filesystem::ParquetSink;
use sluice_connector_mysql::{connect, MySqlCursor};
use sluice_engine::{infer_schema, until_cancelled, ResultCursor, RowStreamer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use crate::cli::Args;
pub use crate::config::Settings;
pub use crate::error::AppError;

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub path: PathBuf,
    pub rows: u64,
    pub row_groups: usize,
    pub columns: usize,
}

/// Converts an already open cursor into a Parquet file at `path`.
pub async fn export<C: ResultCursor>(
    cursor: C,
    output_name: &str,
    sink: &ParquetSink,
    path: &Path,
    cancel: CancellationToken,
) -> Result<ConversionSummary> {
    let schema = infer_schema(output_name, cursor.columns());
    let columns = schema.len();
    debug!(schema = %schema.to_message_type(), "Inferred schema");

    let summary = RowStreamer::new(cursor, schema).with_cancel_token(cancel).run(sink, path).await?;
    Ok(ConversionSummary { path: summary.path, rows: summary.rows, row_groups: summary.row_groups, columns })
}

/// Runs the whole export described by `settings`.
///
/// Cancelling `cancel` stops the export at whatever await point it is in,
/// including connecting and waiting for the query's first result set.
pub async fn run(settings: &Settings, cancel: CancellationToken) -> Result<ConversionSummary> {
    let path = settings.output_path();
    let mut conn = until_cancelled(Some(&cancel), 0, connect(&settings.mysql_config())).await?;

    let result = async {
        let cursor = until_cancelled(Some(&cancel), 0, MySqlCursor::open(&mut conn, &settings.query)).await?;
        export(cursor, &settings.output_name(), &settings.sink(), &path, cancel.clone()).await
    }
    .await;

    match &result {
        Ok(summary) => {
            info!(
                path = %summary.path.display(),
                rows = summary.rows,
                columns = summary.columns,
                row_groups = summary.row_groups,
                "Export complete"
            );
            if let Err(e) = conn.disconnect().await {
                warn!("Failed to close MySQL connection cleanly: {}", e);
            }
        }
        // Dropping the connection abandons whatever the server is still sending.
        Err(_) => drop(conn),
    }
    result
}
