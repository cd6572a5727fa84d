//! Command-line interface for ws-seeder
//!
//! # Usage Examples
//!
//! ```bash
//! # Seed every template in ./seeds 1000 times over an authenticated socket
//! ws-seeder --seeder-dir ./seeds --times 1000 \
//!   --ws-target wss://events.example.com/ingest \
//!   --ws-auth-header "Authorization: Bearer token"
//!
//! # Reproducible dry run printed to stdout
//! RUST_LOG=info ws-seeder order.json --times 3 --seed 42
//! ```

use anyhow::Context;
use clap::Parser;
use payload_sink::{StdoutSink, WebSocketSink};
use tracing::info;
use ws_seeder::seed::{self, logging, RunOptions, Seeder};
use ws_seeder::SeederArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for dry-run payloads
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = SeederArgs::parse();

    let paths = seed::collect_seed_files(args.seeder_dir.as_deref(), args.file.as_deref())?;
    let templates = seed::load_templates(&paths);
    if templates.is_empty() {
        anyhow::bail!("None of the {} seed file(s) could be loaded", paths.len());
    }
    info!(
        "Loaded {} of {} seed template(s), {} payload(s) each",
        templates.len(),
        paths.len(),
        args.times
    );

    let mut seeder = Seeder::new(RunOptions::from(&args)).with_shutdown(seed::setup_shutdown_handler());

    let summary = match &args.target.ws_target {
        Some(target) => {
            info!(
                "Sending to {} with handshake headers [{}]",
                logging::mask_target_credentials(target),
                args.target
                    .ws_auth_headers
                    .iter()
                    .map(logging::mask_header)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            let mut sink = WebSocketSink::connect(target, &args.target.ws_auth_headers)
                .await
                .with_context(|| {
                    format!(
                        "Failed to connect to {}",
                        logging::mask_target_credentials(target)
                    )
                })?;
            seeder.run(&templates, &mut sink).await?
        }
        None => {
            info!("No --ws-target given, writing payloads to stdout");
            let mut sink = StdoutSink::stdout();
            seeder.run(&templates, &mut sink).await?
        }
    };

    summary.log();
    Ok(())
}
