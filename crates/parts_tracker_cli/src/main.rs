//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the tracker store named by a config file and print the dashboard.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `parts_tracker_cli [config.json]`

use log::error;
use parts_tracker_core::db::open_db;
use parts_tracker_core::{core_version, init_logging, load_config, SqliteKvStore, TrackerService};
use std::error::Error;
use std::process::ExitCode;

const DEFAULT_CONFIG_PATH: &str = "parts_tracker.json";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }

    let conn = open_db(&config.database_path)?;
    let tracker = TrackerService::open_with_key(SqliteKvStore::new(&conn), &config.storage_key)?;

    println!("parts_tracker_core version={}", core_version());
    for summary in tracker.supplier_summaries() {
        println!(
            "{}  received={}% pending={}%  ({} of {} line items received)",
            summary.name,
            summary.received_pct,
            summary.pending_pct,
            summary.totals.received,
            summary.totals.total
        );
    }
    Ok(())
}
