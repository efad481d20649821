use blockgate_core::{config::RootConfig, Driver as _};
use miette::{Context, IntoDiagnostic};
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct Args {}

#[tokio::main]
pub async fn run(config: RootConfig, _args: &Args) -> miette::Result<()> {
    crate::common::setup_tracing(&config.logging)?;

    let chain = crate::common::connect_chain(&config)?;
    let exit = crate::common::hook_exit_token();

    info!(node = %config.chain.url, "starting rest gateway");

    blockgate_rest::Driver::run(config.serve, chain, exit)
        .await
        .into_diagnostic()
        .context("serving rest api")?;

    info!("rest gateway stopped");

    Ok(())
}
