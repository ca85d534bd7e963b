use std::process::ExitCode;

use clap::Parser;
use sluice::{logging, AppError, Args, Settings};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

async fn try_main(args: Args) -> Result<(), AppError> {
    let settings = Settings::load(&args)?;
    logging::init_logging(&settings.log_level)?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, aborting export");
            trigger.cancel();
        }
    });

    sluice::run(&settings, cancel).await?;
    Ok(())
}

// One cursor and one output file: a single-threaded runtime is all we need.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    match try_main(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                AppError::Convert(inner) => error!(kind = inner.kind(), "{}", e),
                // Logging may not be up yet.
                _ => eprintln!("sluice: {}", e),
            }
            ExitCode::from(e.exit_code())
        }
    }
}
