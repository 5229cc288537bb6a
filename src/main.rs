use clap::Parser;
use cli::Args;
use deployment::DeploymentContext;
use interactive::run_interactive_session;
use tracing_error::ErrorLayer;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub mod artifacts;
pub mod serde_utils;

mod cli;
mod config;
mod deployment;
mod interactive;
mod report;

async fn start() -> eyre::Result<()> {
    let args = Args::parse();
    let cmd = run_interactive_session(args).await?;

    let context = DeploymentContext::new(cmd);

    context.run(&mut std::io::stdout()).await
}

/// Maps the outcome of a run to the process exit code, logging any failure
fn finish(result: eyre::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(report) => {
            tracing::error!("{:?}", report);
            1
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let indicatif_layer = IndicatifLayer::new();

    let filter = EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(indicatif_layer.get_stderr_writer())
                .with_filter(filter),
        )
        .with(indicatif_layer)
        .with(ErrorLayer::default())
        .init();

    std::process::exit(finish(start().await))
}
