//! Batch orchestrator: one pass over the configured document list per cycle,
//! repeated indefinitely in continuous mode.
//!
//! Entries run strictly sequentially on one logical thread. A failing entry
//! never aborts the cycle, and an entry's download failure never skips its
//! upload. Termination in continuous mode is cooperative at the inter-cycle
//! sleep boundary only: the shutdown flag is checked between cycles, never
//! mid-cycle, so partially processed files stay exactly where the executor
//! left them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{error, info};

use crate::config::RunConfig;
use crate::download::download_report;
use crate::error::TransferOutcome;
use crate::gateway::TransferGateway;
use crate::registry::Direction;
use crate::timing::Sleeper;
use crate::upload::{upload_feed, PollPolicy};

/// Outcome of one operation of one document entry within a cycle.
#[derive(Debug)]
pub struct EntryReport {
    pub document_type: String,
    pub direction: Direction,
    pub outcome: TransferOutcome,
}

/// Everything that happened in one full pass over the document list.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub entries: Vec<EntryReport>,
}

impl CycleReport {
    pub fn successes(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.entries.len() - self.successes()
    }
}

pub struct Orchestrator<'a, G, S> {
    config: &'a RunConfig,
    gateway: &'a G,
    sleeper: &'a S,
    policy: PollPolicy,
}

impl<'a, G, S> Orchestrator<'a, G, S>
where
    G: TransferGateway,
    S: Sleeper,
{
    pub fn new(config: &'a RunConfig, gateway: &'a G, sleeper: &'a S) -> Self {
        Orchestrator {
            config,
            gateway,
            sleeper,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one full pass over the configured documents.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for entry in &self.config.documents {
            if let Some(download_type) = entry.download_type.as_deref() {
                let outcome = download_report(self.gateway, entry).await;
                log_outcome(download_type, Direction::Download, &outcome);
                report.entries.push(EntryReport {
                    document_type: download_type.to_string(),
                    direction: Direction::Download,
                    outcome,
                });
            }

            if let Some(upload_type) = entry.upload_type.as_deref() {
                let outcome =
                    upload_feed(self.gateway, self.sleeper, &self.policy, entry).await;
                log_outcome(upload_type, Direction::Upload, &outcome);
                report.entries.push(EntryReport {
                    document_type: upload_type.to_string(),
                    direction: Direction::Upload,
                    outcome,
                });
            }
        }

        report
    }

    /// Run cycles until done: exactly one when not continuous, otherwise
    /// until the shutdown flag is observed at a sleep boundary.
    pub async fn run(&self, shutdown: &AtomicBool) -> Vec<CycleReport> {
        let mut reports = Vec::new();
        loop {
            info!(cycle = reports.len() + 1, "Processing documents");
            let report = self.run_cycle().await;
            info!(
                cycle = reports.len() + 1,
                successes = report.successes(),
                failures = report.failures(),
                "Cycle complete"
            );
            flush_logs();
            reports.push(report);

            if !self.config.continuous {
                break;
            }
            if shutdown.load(Ordering::SeqCst) {
                info!("Shutdown requested; stopping at cycle boundary");
                break;
            }
            info!(
                seconds = self.config.continuous_interval_seconds,
                "Continuous mode active; sleeping before next cycle"
            );
            self.sleeper
                .sleep(Duration::from_secs(self.config.continuous_interval_seconds))
                .await;
            if shutdown.load(Ordering::SeqCst) {
                info!("Shutdown requested; stopping at cycle boundary");
                break;
            }
        }
        reports
    }
}

fn log_outcome(document_type: &str, direction: Direction, outcome: &TransferOutcome) {
    match outcome {
        TransferOutcome::Success => {
            info!(document_type, ?direction, "Transfer succeeded");
        }
        TransferOutcome::Failure(e) => {
            error!(document_type, ?direction, error = %e, "Transfer failed");
        }
    }
}

/// Log sinks are line-buffered; force them down at every cycle boundary so
/// observability survives an abrupt external kill between cycles.
fn flush_logs() {
    use std::io::Write;
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}
