use blockgate_core::{config::LoggingConfig, CancelToken};
use blockgate_substrate::SubstrateClient;
use miette::{Context as _, IntoDiagnostic};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::{filter::Targets, prelude::*};

use blockgate_core::config::RootConfig;

pub fn setup_tracing(config: &LoggingConfig) -> miette::Result<()> {
    let level = config.max_level;

    // matches every workspace crate by prefix
    let mut filter = Targets::new().with_target("blockgate", level);

    if config.include_http {
        filter = filter.with_target("tower_http", level);
    }

    if config.include_rpc {
        filter = filter.with_target("reqwest", level).with_target("hyper_util", level);
    }

    tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .finish()
        .with(filter)
        .try_init()
        .into_diagnostic()
        .context("initializing tracing")?;

    Ok(())
}

pub fn connect_chain(config: &RootConfig) -> miette::Result<SubstrateClient> {
    SubstrateClient::new(&config.chain)
        .into_diagnostic()
        .context("building chain client")
}

#[derive(Clone)]
pub struct ExitToken(pub CancellationToken);

impl CancelToken for ExitToken {
    async fn cancelled(&self) {
        self.0.cancelled().await
    }
}

pub fn hook_exit_token() -> ExitToken {
    let cancel = CancellationToken::new();

    let cancel2 = cancel.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "failed to listen for exit signal");
        } else {
            warn!("exit signal detected");
        }

        debug!("notifying exit");
        cancel2.cancel();
    });

    ExitToken(cancel)
}
