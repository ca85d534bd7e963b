use mysql_async::prelude::Queryable;
use mysql_async::{Conn, QueryResult, TextProtocol};
use sluice_common::{ColumnDescriptor, Error, Result};
use sluice_engine::{RawRow, ResultCursor};
use tracing::{debug, info};

use crate::config::MySqlConfig;
use crate::types::{describe_column, render_value};

/// Opens a connection to the configured server.
pub async fn connect(config: &MySqlConfig) -> Result<Conn> {
    info!(host = %config.host, port = config.port, user = %config.user, database = %config.database, "Connecting to MySQL");
    let conn = Conn::new(config.opts()).await.map_err(|e| {
        Error::Connection(format!("failed to connect to MySQL {}:{}: {}", config.host, config.port, e))
    })?;
    debug!(server_version = ?conn.server_version(), "Connected to MySQL");
    Ok(conn)
}

fn query_error(err: mysql_async::Error) -> Error {
    match err {
        mysql_async::Error::Io(e) => Error::Connection(e.to_string()),
        other => Error::Query(other.to_string()),
    }
}

/// Forward-only cursor over the first result set of a text-protocol query.
///
/// The query may start with session statements such as
/// `SET TRANSACTION ISOLATION LEVEL READ UNCOMMITTED;`. Result sets without
/// columns are skipped, and the first one with columns is the one streamed.
pub struct MySqlCursor<'c> {
    result: QueryResult<'c, 'static, TextProtocol>,
    columns: Vec<ColumnDescriptor>,
    rows_read: u64,
}

impl<'c> MySqlCursor<'c> {
    pub async fn open(conn: &'c mut Conn, query: &str) -> Result<MySqlCursor<'c>> {
        debug!(query, "Executing query");
        let mut result = conn.query_iter(query.to_string()).await.map_err(query_error)?;

        while result.columns_ref().is_empty() && !result.is_empty() {
            // Ends the column-less set and moves on to the next one.
            result.next().await.map_err(query_error)?;
        }
        if result.columns_ref().is_empty() {
            return Err(Error::Query("query did not return a result set".to_string()));
        }

        let columns: Vec<ColumnDescriptor> = result.columns_ref().iter().map(describe_column).collect();
        debug!(columns = columns.len(), "Query returned result set");
        Ok(MySqlCursor { result, columns, rows_read: 0 })
    }

    fn fetch_error(&self, err: mysql_async::Error) -> Error {
        Error::Fetch { rows_read: self.rows_read, reason: err.to_string() }
    }
}

#[async_trait::async_trait]
impl<'c> ResultCursor for MySqlCursor<'c> {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<Option<RawRow>> {
        let row = match self.result.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(None),
            Err(e) => return Err(self.fetch_error(e)),
        };
        self.rows_read += 1;
        let cells = (0..row.len()).map(|i| row.as_ref(i).and_then(render_value)).collect();
        Ok(Some(cells))
    }

    async fn finish(&mut self) -> Result<()> {
        // Drains any trailing statements; their failures surface only here.
        while !self.result.is_empty() {
            if let Err(e) = self.result.next().await {
                return Err(self.fetch_error(e));
            }
        }
        Ok(())
    }
}
