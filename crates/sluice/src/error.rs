use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Convert(#[from] sluice_common::Error),
}

impl AppError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Logging(_) => 1,
            AppError::Convert(sluice_common::Error::Cancelled { .. }) => 130,
            AppError::Convert(_) => 2,
        }
    }
}
