//! ws-seeder library
//!
//! Generates randomized, internally consistent JSON payloads from
//! rule-annotated seed templates and sends them to a WebSocket endpoint.
//!
//! # Crates
//!
//! - `seeder_core` - rule grammar, rule tables, placeholder templates
//! - `payload_generator` - seeded value generation and payload rendering
//! - `payload_sink` - WebSocket and stdout sinks
//!
//! # CLI Usage
//!
//! ```bash
//! # Send 100 payloads per template in ./seeds to a WebSocket endpoint
//! ws-seeder --seeder-dir ./seeds --times 100 \
//!   --ws-target ws://localhost:8080/events \
//!   --ws-auth-header "Authorization: Bearer token"
//!
//! # Dry run: print 5 payloads for one template to stdout
//! ws-seeder order.json --times 5 --seed 42
//! ```

use clap::{Args, Parser};
use payload_sink::HandshakeHeader;
use std::path::PathBuf;

pub mod seed;

/// Command-line options for ws-seeder.
#[derive(Parser, Clone, Debug)]
#[command(name = "ws-seeder")]
#[command(about = "Generate rule-driven JSON payloads and send them over a WebSocket")]
#[command(long_about = None)]
pub struct SeederArgs {
    /// Single seed template file
    #[arg(value_name = "FILE", required_unless_present = "seeder_dir")]
    pub file: Option<PathBuf>,

    /// Directory of seed templates (every non-directory entry is loaded)
    #[arg(long, env = "SEEDER_DIR", value_parser = seed::parse_seeder_dir)]
    pub seeder_dir: Option<PathBuf>,

    /// Target connection options
    #[command(flatten)]
    pub target: TargetOpts,

    /// Number of payloads generated per template
    #[arg(long, default_value = "1", env = "SEEDER_TIMES")]
    pub times: u64,

    /// Random seed for deterministic generation (same seed = same payloads)
    #[arg(long, env = "SEEDER_SEED")]
    pub seed: Option<u64>,
}

/// Where payloads are sent.
#[derive(Args, Clone, Debug)]
pub struct TargetOpts {
    /// WebSocket URL to send payloads to; payloads go to stdout when omitted
    #[arg(long, env = "SEEDER_WS_TARGET")]
    pub ws_target: Option<String>,

    /// Header added to the WebSocket handshake, as "name: value" (repeatable)
    #[arg(long = "ws-auth-header", value_name = "HEADER")]
    pub ws_auth_headers: Vec<HandshakeHeader>,
}

impl From<&SeederArgs> for seed::RunOptions {
    fn from(args: &SeederArgs) -> Self {
        Self {
            times: args.times,
            seed: args.seed,
        }
    }
}
