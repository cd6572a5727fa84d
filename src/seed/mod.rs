//! Seeder command handlers.
//!
//! This module loads seed templates, drives the generate -> render -> send
//! cycles and reports what was sent.

pub mod load;
pub mod logging;
pub mod metrics;
pub mod run;

pub use load::{collect_seed_files, count_seed_files, load_templates, parse_seeder_dir};
pub use metrics::RunSummary;
pub use run::{seed_for_template, setup_shutdown_handler, RunOptions, Seeder};
