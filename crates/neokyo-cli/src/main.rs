mod display;
mod persist;
mod repl;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use neokyo_core::load_config_or_default;

#[derive(Debug, Parser)]
#[command(name = "neokyo")]
#[command(about = "Interactive product checker for neokyo.com listings")]
struct Cli {
    /// YAML config file layered over the built-in defaults.
    #[arg(long, default_value = "config.yml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config_or_default(&cli.config);

    let default_level = if config.debug.verbose_mode { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    repl::run(config).await
}
