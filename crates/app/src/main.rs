//! ycs3 binary.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ycs3::Cli;
use ycs3_infrastructure::Ycs3Services;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = cli.load_settings()?;
    let services = Ycs3Services::from_settings(settings)?;

    tracing::debug!("ycs3 v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout().lock();
    ycs3::execute(&cli.command, &services, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}
