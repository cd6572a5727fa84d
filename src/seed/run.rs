//! The seeder loop: compile each template once, then generate, render and
//! send one payload per cycle.

use crate::seed::metrics::RunSummary;
use anyhow::Context;
use payload_generator::{PayloadGenerator, RenderError};
use payload_sink::PayloadSink;
use seeder_core::{CompiledTemplate, Template};
use std::time::Instant;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info, warn};

/// Options for a seeder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Generation cycles per template
    pub times: u64,
    /// Base seed; `None` seeds every generator from OS entropy
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            times: 1,
            seed: None,
        }
    }
}

/// Derive the generator seed for the template at `index`.
pub fn seed_for_template(base_seed: u64, index: usize) -> u64 {
    base_seed.wrapping_add((index as u64).wrapping_mul(0x9E3779B97F4A7C15))
}

/// Sets up a shutdown signal handler
pub fn setup_shutdown_handler() -> broadcast::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install CTRL+C signal handler: {}", e);
            return;
        }

        info!("Received interrupt signal (Ctrl+C), stopping after the current payload");
        let _ = shutdown_tx.send(());
    });

    shutdown_rx
}

/// Drives generation cycles for a set of templates into one sink.
pub struct Seeder {
    options: RunOptions,
    shutdown: Option<broadcast::Receiver<()>>,
}

impl Seeder {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            shutdown: None,
        }
    }

    /// Stop between cycles once a value arrives on `shutdown`.
    pub fn with_shutdown(mut self, shutdown: broadcast::Receiver<()>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Run every template's cycles, then close the sink.
    ///
    /// A template whose rules fail to compile is skipped, and a cycle whose
    /// payload fails to render is skipped; both are counted in the summary.
    /// A sink error aborts the run.
    pub async fn run<S: PayloadSink>(
        &mut self,
        templates: &[Template],
        sink: &mut S,
    ) -> anyhow::Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary {
            templates_loaded: templates.len(),
            ..Default::default()
        };

        for (index, template) in templates.iter().enumerate() {
            let compiled = match CompiledTemplate::compile(template) {
                Ok(compiled) => compiled,
                Err(e) => {
                    error!("Skipping template {}: {}", template.name(), e);
                    summary.templates_failed += 1;
                    continue;
                }
            };
            summary.templates_compiled += 1;
            info!(
                "Seeding {} payloads from {} ({} rules)",
                self.options.times,
                compiled.name(),
                compiled.rules().len()
            );
            debug!("Placeholder template for {}: {}", compiled.name(), compiled.placeholder());

            let mut generator = match self.options.seed {
                Some(seed) => PayloadGenerator::new(seed_for_template(seed, index)),
                None => PayloadGenerator::from_entropy(),
            };

            self.send_cycles(compiled.name(), sink, &mut summary, || {
                generator.next_payload(&compiled)
            })
            .await?;
            if summary.cancelled {
                break;
            }
        }

        sink.close().await?;
        summary.total_duration = start_time.elapsed();
        Ok(summary)
    }

    /// Run `times` cycles of one template, each taking its payload from
    /// `next_payload`.
    ///
    /// A cycle whose payload fails to render is counted and skipped. Sets
    /// `summary.cancelled` and returns early on shutdown.
    async fn send_cycles<S, F>(
        &mut self,
        name: &str,
        sink: &mut S,
        summary: &mut RunSummary,
        mut next_payload: F,
    ) -> anyhow::Result<()>
    where
        S: PayloadSink,
        F: FnMut() -> Result<Vec<u8>, RenderError>,
    {
        let mut sent = 0u64;
        for cycle in 0..self.options.times {
            if self.shutdown_requested() {
                summary.cancelled = true;
                break;
            }

            let payload = match next_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Cycle {} of {} produced no payload: {}", cycle, name, e);
                    summary.render_failures += 1;
                    continue;
                }
            };

            sink.send_payload(&payload)
                .await
                .with_context(|| format!("Failed to send payload {} of {}", cycle, name))?;
            sent += 1;
            summary.payloads_sent += 1;

            if sent % 10000 == 0 {
                debug!("Sent {} payloads from {}", sent, name);
            }
        }

        info!("Sent {} payloads from {}", sent, name);
        Ok(())
    }

    fn shutdown_requested(&mut self) -> bool {
        match self.shutdown.as_mut() {
            Some(rx) => match rx.try_recv() {
                Ok(()) | Err(TryRecvError::Lagged(_)) => true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => false,
            },
            None => false,
        }
    }
}
