//! geoblock - ban whole countries with ipset and iptables
//!
//! Downloads per-country zone files and drops their traffic in the inbound chain.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use geoblock::cli::{parse_error_exit_code, Action, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(parse_error_exit_code(&e));
        }
    };

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.action()? {
        Action::Ban(countries) => {
            geoblock::commands::ban::run(&countries, &cli.config, !cli.quiet).await
        }
        Action::Unban(countries) => geoblock::commands::unban::run(&countries, &cli.config).await,
    }
}
