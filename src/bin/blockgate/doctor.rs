use blockgate_core::{config::RootConfig, ChainClient};
use miette::{Context, IntoDiagnostic};
use tracing::info;

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Also resolve this block height and print its hash
    #[arg(long)]
    pub height: Option<u64>,
}

#[tokio::main]
pub async fn run(config: RootConfig, args: &Args) -> miette::Result<()> {
    crate::common::setup_tracing(&config.logging)?;

    let chain = crate::common::connect_chain(&config)?;

    let node = chain
        .node_version()
        .await
        .into_diagnostic()
        .context("querying node version")?;

    info!(
        client = %node.client_impl_name,
        version = %node.client_version,
        chain = %node.chain,
        "node reachable"
    );

    let (finalized, best) = futures_util::try_join!(chain.finalized_head(), chain.header(None))
        .into_diagnostic()
        .context("querying chain tip")?;

    let finalized_header = chain
        .header(Some(finalized))
        .await
        .into_diagnostic()
        .context("querying finalized header")?;

    info!(
        finalized_height = finalized_header.number,
        finalized_hash = %finalized,
        best_height = best.number,
        "chain tip"
    );

    let runtime = chain
        .runtime_version(finalized)
        .await
        .into_diagnostic()
        .context("querying runtime version")?;

    info!(spec = %runtime.spec_name, version = runtime.spec_version, "runtime");

    if let Some(height) = args.height {
        let hash = chain
            .block_hash(height)
            .await
            .into_diagnostic()
            .with_context(|| format!("resolving block #{height}"))?;

        info!(height, %hash, "block resolved");
    }

    Ok(())
}
