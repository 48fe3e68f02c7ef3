use clap::Parser;
use tracing_subscriber::EnvFilter;

use doc_transport::{run, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            // Configuration failures land here before any transfer is attempted.
            tracing::error!(error = %e, "Run aborted");
            eprintln!("[ERROR] {e:#}");
            std::process::exit(1);
        }
    }
}
