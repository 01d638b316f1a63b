//! Info command implementation
//!
//! Shows the full telemetry record of one GPU.

use crate::cli::args::{InfoArgs, OutputFormat};
use crate::cli::output::print_output;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::Telemetry;
use crate::session::Session;

use std::sync::Arc;

/// Execute the info command
pub fn run_info(args: &InfoArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let session = Session::open(&config.nvml.session_options())?;
    let telemetry = Telemetry::new(Arc::new(session));

    let count = telemetry.device_count();
    if args.gpu >= count {
        return Err(AppError::GpuNotFound(args.gpu));
    }

    let info = telemetry
        .gpu_info(args.gpu)
        .ok_or(AppError::GpuNotFound(args.gpu))?;

    print_output(&info, format)?;

    Ok(())
}
