use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use s3_smoke::runner;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Uploads the configured file to S3, fetches it back, then deletes it.
#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "S3_SMOKE_CONFIG", default_value = "config.yaml")]
    config: PathBuf,
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    runner::run(&opts.config, runner::connect_s3).await?;
    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(?e, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(run(opts)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
