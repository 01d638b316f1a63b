//! List command implementation
//!
//! Prints a telemetry snapshot of every detected GPU.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, FleetSnapshot};
use crate::config::Config;
use crate::error::Result;
use crate::services::Telemetry;
use crate::session::Session;

use std::sync::Arc;

/// Execute the list command
pub fn run_list(config: &Config, format: OutputFormat) -> Result<()> {
    let session = Arc::new(Session::open(&config.nvml.session_options())?);
    let telemetry = Telemetry::new(Arc::clone(&session));

    let snapshot = FleetSnapshot {
        mode: session.mode().to_string(),
        driver_version: session.driver_version().ok(),
        list: telemetry.all_gpus(),
    };
    drop(telemetry);

    print_output(&snapshot, format)?;

    if let Ok(session) = Arc::try_unwrap(session) {
        session.shutdown();
    }

    Ok(())
}
