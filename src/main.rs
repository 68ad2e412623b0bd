use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kindred::config::KindredConfig;
use kindred::docs;
use kindred::shell::Shell;
use kindred::storage::Store;

#[derive(Parser)]
#[command(
    name = "kindred",
    version,
    about = "Relational AI companion prototype and documentation server"
)]
struct Cli {
    /// Port to serve the documentation site on
    #[arg(long)]
    port: Option<u16>,

    /// Path to a config file (defaults to ~/.kindred/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => KindredConfig::load_from(path)?,
        None => KindredConfig::load()?,
    };
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Initialize tracing with the configured log level, on stderr.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = Arc::new(Store::open(config.resolved_db_path())?);
    let shell = Shell::build(&config, store);

    // Greet a first-ever session once the server is up.
    shell.conversation.welcome();

    docs::serve(&config, shell).await
}
