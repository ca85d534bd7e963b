use clap::Parser;

/// Export the result of a MySQL query to a Parquet file.
///
/// The query may start with session statements, for example:
/// `SET TRANSACTION ISOLATION LEVEL READ UNCOMMITTED; SELECT * FROM users;`
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (TOML). Defaults to $SLUICE_CONFIG_PATH when set.
    #[arg(short, long)]
    pub config: Option<String>,

    /// User for login.
    #[arg(long)]
    pub user: Option<String>,

    /// Server host.
    #[arg(long)]
    pub host: Option<String>,

    /// Server port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Password to use when connecting to the server.
    #[arg(long)]
    pub password: Option<String>,

    /// Database to use.
    #[arg(long)]
    pub database: Option<String>,

    /// SQL to execute.
    #[arg(long)]
    pub query: Option<String>,

    /// Output file name, without the .parquet extension.
    #[arg(long)]
    pub parquet: Option<String>,

    /// Rows buffered before they are handed to the Parquet writer.
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Maximum rows per Parquet row group.
    #[arg(long)]
    pub row_group_size: Option<u32>,

    /// Compression codec: snappy, zstd, gzip or none.
    #[arg(long)]
    pub compression: Option<String>,

    /// Log level for Sluice crates (overridden by RUST_LOG).
    #[arg(long)]
    pub log_level: Option<String>,
}
