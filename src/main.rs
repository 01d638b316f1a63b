//! nvml-rest - REST API for NVIDIA GPU telemetry
//!
//! Serves per-GPU telemetry over HTTP, or prints a one-off snapshot.

use clap::Parser;
use nvml_rest::cli::args::{generate_completions, Cli, Commands};
use nvml_rest::commands::{run_info, run_list, run_serve};
use nvml_rest::config::{Config, ConfigBuilder};
use nvml_rest::error::{AppError, NvmlError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        generate_completions(*shell);
        return;
    }

    // Config loading logs, so the logger comes first
    init_logging();
    set_log_level(&cli.command, cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    set_log_level(&cli.command, config.general.verbose);
    if config.source.is_none() {
        log::debug!("No configuration file found, using defaults");
    }

    if let Err(e) = run(&cli, &config) {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let mut builder = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose)
        .with_mock(cli.mock)
        .with_query_timeout(cli.query_timeout);

    if let Commands::Serve(args) = &cli.command {
        builder = builder
            .with_host(args.host.clone())
            .with_port(args.port)
            .with_no_cors(args.no_cors);
    }

    Ok(builder.build()?)
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp(None)
        .init();
}

/// Cap the log level unless `RUST_LOG` chose one
fn set_log_level(command: &Commands, verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }

    // The server reports requests and degraded metrics; snapshots stay quiet
    let level = match (verbose, command) {
        (true, _) => log::LevelFilter::Debug,
        (false, Commands::Serve(_)) => log::LevelFilter::Info,
        (false, _) => log::LevelFilter::Warn,
    };
    log::set_max_level(level);
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    match &cli.command {
        Commands::Serve(_) => run_serve(config),

        Commands::List => run_list(config, cli.format),

        Commands::Info(args) => run_info(args, config, cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Nvml(NvmlError::LibraryNotFound) => {
            eprintln!();
            eprintln!("Hint: Make sure the NVIDIA driver is installed.");
            eprintln!("      Use --mock to serve simulated data without one.");
        }
        AppError::Nvml(NvmlError::InsufficientPermissions(_)) => {
            eprintln!();
            eprintln!("Hint: Try running with sudo or as root.");
        }
        AppError::GpuNotFound(_) => {
            eprintln!();
            eprintln!("Hint: Run 'nvml-rest list' to see detected GPUs.");
        }
        AppError::Server(_) => {
            eprintln!();
            eprintln!("Hint: Check that the port is free or pick another with --port.");
        }
        _ => {}
    }
}
