use blockgate_core::config::RootConfig;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

mod common;
mod daemon;
mod doctor;

#[derive(Debug, Subcommand)]
enum Command {
    /// Serves the REST API in front of the configured chain node
    Daemon(daemon::Args),
    /// Checks that the configured chain node is reachable and sane
    Doctor(doctor::Args),
}

#[derive(Debug, Parser)]
#[clap(name = "Blockgate")]
#[clap(bin_name = "blockgate")]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

fn load_config(explicit_file: &Option<std::path::PathBuf>) -> Result<RootConfig, config::ConfigError> {
    let mut s = config::Config::builder();

    // our base config will always be in /etc/blockgate
    s = s.add_source(config::File::with_name("/etc/blockgate/daemon.toml").required(false));

    // but we can override it by having a file in the working dir
    s = s.add_source(config::File::with_name("blockgate.toml").required(false));

    // if an explicit file was passed, then we load it as mandatory
    if let Some(explicit) = explicit_file.as_ref().and_then(|x| x.to_str()) {
        s = s.add_source(config::File::with_name(explicit).required(true));
    }

    // finally, we use env vars to make some last-step overrides
    s = s.add_source(config::Environment::with_prefix("BLOCKGATE").separator("_"));

    s.build()?.try_deserialize()
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let config = load_config(&args.config).into_diagnostic()?;

    match args.command {
        Command::Daemon(x) => daemon::run(config, &x)?,
        Command::Doctor(x) => doctor::run(config, &x)?,
    };

    Ok(())
}
