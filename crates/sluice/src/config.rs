use std::path::PathBuf;

use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use serde::Deserialize;
use sluice_connector_filesystem::ParquetSink;
use sluice_connector_mysql::MySqlConfig;

use crate::cli::Args;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionSetting {
    #[default]
    Snappy,
    Zstd,
    Gzip,
    None,
}

impl From<CompressionSetting> for Compression {
    fn from(setting: CompressionSetting) -> Self {
        match setting {
            CompressionSetting::Snappy => Compression::SNAPPY,
            CompressionSetting::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionSetting::Gzip => Compression::GZIP(GzipLevel::default()),
            CompressionSetting::None => Compression::UNCOMPRESSED,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    pub password: String,
    pub database: String,
    pub query: String,
    pub parquet: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
    #[serde(default)]
    pub compression: CompressionSetting,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    sluice_connector_mysql::config::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    sluice_connector_mysql::config::DEFAULT_PORT
}

fn default_user() -> String {
    sluice_connector_mysql::config::DEFAULT_USER.to_string()
}

fn default_batch_size() -> usize {
    sluice_connector_filesystem::parquet::DEFAULT_BATCH_SIZE
}

fn default_row_group_size() -> usize {
    sluice_connector_filesystem::parquet::DEFAULT_ROW_GROUP_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Layers the settings file, `SLUICE__*` environment variables and the
    /// command line, in increasing order of precedence.
    pub fn load(args: &Args) -> Result<Self, config::ConfigError> {
        let config_path = args.config.clone().or_else(|| std::env::var("SLUICE_CONFIG_PATH").ok());

        let mut builder = config::Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(&path).required(true));
        }
        let s = builder
            .add_source(config::Environment::with_prefix("SLUICE").separator("__"))
            .set_override_option("host", args.host.clone())?
            .set_override_option("port", args.port.map(i64::from))?
            .set_override_option("user", args.user.clone())?
            .set_override_option("password", args.password.clone())?
            .set_override_option("database", args.database.clone())?
            .set_override_option("query", args.query.clone())?
            .set_override_option("parquet", args.parquet.clone())?
            .set_override_option("batch_size", args.batch_size.map(i64::from))?
            .set_override_option("row_group_size", args.row_group_size.map(i64::from))?
            .set_override_option("compression", args.compression.clone())?
            .set_override_option("log_level", args.log_level.clone())?
            .build()?;
        let settings: Settings = s.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        for (key, value) in [
            ("password", &self.password),
            ("database", &self.database),
            ("query", &self.query),
            ("parquet", &self.parquet),
        ] {
            if value.trim().is_empty() {
                return Err(config::ConfigError::Message(format!("`{}` must not be empty", key)));
            }
        }
        if self.batch_size == 0 || self.row_group_size == 0 {
            return Err(config::ConfigError::Message(
                "`batch_size` and `row_group_size` must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.parquet", self.parquet))
    }

    /// Name recorded as the schema's message name: the last path component.
    pub fn output_name(&self) -> String {
        PathBuf::from(&self.parquet)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.parquet.clone())
    }

    pub fn mysql_config(&self) -> MySqlConfig {
        MySqlConfig {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        }
    }

    pub fn sink(&self) -> ParquetSink {
        ParquetSink::new()
            .with_batch_size(self.batch_size)
            .with_row_group_size(self.row_group_size)
            .with_compression(self.compression.into())
    }
}
