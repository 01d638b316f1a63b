//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// REST API for NVIDIA GPU telemetry
///
/// Serve GPU identity, memory, utilization, power and thermal readings over
/// HTTP, or print a one-off snapshot.
#[derive(Parser, Debug)]
#[command(name = "nvml-rest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for snapshot commands
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "NVML_REST_CONFIG")]
    pub config: Option<String>,

    /// Serve simulated GPU data instead of querying NVML
    #[arg(long, global = true, env = "NVML_REST_MOCK")]
    pub mock: bool,

    /// Upper bound on each device query in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub query_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// List all detected GPUs with their telemetry
    List,

    /// Show telemetry for one GPU
    Info(InfoArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// GPU index (0-based)
    #[arg(long, default_value = "0")]
    pub gpu: u32,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
