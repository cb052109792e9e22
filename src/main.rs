use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use mistral_ocr_lib::bootstrap::{init_tracing_subscriber, resolve_config, wire_dependencies};
use mistral_ocr_lib::cli::{self, Cli};
use ocr_core::ports::AppDirsPort;
use ocr_platform::DirsAppDirsAdapter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> anyhow::Result<ExitCode> {
    let dirs = DirsAppDirsAdapter::new().get_app_dirs()?;

    // Must run before any use case so their spans are recorded.
    init_tracing_subscriber(&dirs.log_dir())?;

    let config = resolve_config(args.config, &dirs)?;
    let usecases = wire_dependencies(&config)?;

    cli::run(args.command, &usecases).await
}
