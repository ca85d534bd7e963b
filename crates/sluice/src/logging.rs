use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const CRATES: [&str; 4] = ["sluice", "sluice_engine", "sluice_connector_mysql", "sluice_connector_filesystem"];

/// Filter used when `RUST_LOG` is not set: `level` for Sluice crates, `warn`
/// for everything else.
pub fn default_filter(level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(CRATES.iter().map(|krate| format!("{}={}", krate, level)));
    directives.join(",")
}

/// Installs the global subscriber. Logs go to stderr.
pub fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(level)).map_err(|e| AppError::Logging(e.to_string()))?,
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}
