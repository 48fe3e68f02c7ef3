pub mod config;
pub mod download;
pub mod error;
pub mod files;
pub mod gateway;
pub mod load_config;
pub mod orchestrate;
pub mod registry;
pub mod sp_gateway;
pub mod timing;
pub mod upload;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use load_config::{apply_documents_override, load_config};
use orchestrate::Orchestrator;
use sp_gateway::SpGateway;
use timing::TokioSleeper;

#[derive(Parser)]
#[clap(
    name = "doc-transport",
    version,
    about = "Move reports and feed files between a marketplace platform and local folders"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process the configured document list once, or repeatedly in continuous mode
    Run {
        /// Path to the JSON config file
        #[clap(long)]
        config: PathBuf,
        /// Alternate documents JSON file; replaces the configured list and
        /// forces a single cycle
        #[clap(long)]
        documents: Option<PathBuf>,
    },
}

/// Async CLI entrypoint, extracted from main() for integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run { config, documents } => {
            let mut config = load_config(config)?;
            if let Some(documents_path) = documents {
                apply_documents_override(&mut config, documents_path)?;
            }

            let gateway = SpGateway::new(config.credentials.clone());
            let shutdown = Arc::new(AtomicBool::new(false));
            install_shutdown_handler(shutdown.clone());

            let orchestrator = Orchestrator::new(&config, &gateway, &TokioSleeper);
            let reports = orchestrator.run(&shutdown).await;

            let failures: usize = reports.iter().map(|r| r.failures()).sum();
            println!(
                "Processing complete: {} cycle(s), {} failed transfer(s).",
                reports.len(),
                failures
            );
            Ok(())
        }
    }
}

/// Ctrl-C only requests termination; the orchestrator honours it at the next
/// cycle boundary so no file is abandoned mid-relocation.
fn install_shutdown_handler(shutdown: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received; will stop after the current cycle");
            shutdown.store(true, Ordering::SeqCst);
        }
    });
}
