//! Output formatting utilities
//!
//! Provides table and JSON output formatting for snapshot commands.

use crate::cli::args::OutputFormat;
use crate::domain::{GpuInfo, GpuList};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

impl TableDisplay for GpuInfo {
    fn to_table(&self) -> String {
        let mut output = format!("[{}] {}\n  UUID: {}\n", self.id, self.name, self.uuid);

        output.push_str(&format!(
            "  Memory: {} ({}% used)\n",
            self.memory,
            self.memory.usage_percent()
        ));
        output.push_str(&format!(
            "  Utilization: {}\n",
            or_na(
                self.utilization
                    .map(|u| format!("GPU {}%, Memory {}%", u.gpu, u.memory))
            )
        ));
        output.push_str(&format!(
            "  Power: {} / {}\n",
            or_na(self.power_usage.map(|w| format!("{:.1}W", w))),
            or_na(self.power_limit.map(|w| format!("{:.1}W", w)))
        ));
        output.push_str(&format!("  Temperature: {}\n", or_na(self.temperature)));
        output.push_str(&format!("  Fan Speed: {}\n", or_na(self.fan_speed)));
        output.push_str(&format!(
            "  Performance State: {}\n",
            or_na(self.performance_state)
        ));
        output.push_str(&format!("  Compute Mode: {}\n", or_na(self.compute_mode)));
        output.push_str(&format!(
            "  Persistence Mode: {}",
            or_na(
                self.persistence_mode
                    .map(|p| if p { "Enabled" } else { "Disabled" })
            )
        ));

        output
    }

    fn to_compact(&self) -> String {
        format!(
            "{}:{} {} {}",
            self.id,
            self.short_name(),
            or_na(self.temperature),
            or_na(self.power_usage.map(|w| format!("{:.1}W", w)))
        )
    }
}

/// Fleet snapshot for the list command
#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    /// Session mode the snapshot was taken in
    pub mode: String,
    pub driver_version: Option<String>,
    #[serde(flatten)]
    pub list: GpuList,
}

impl TableDisplay for FleetSnapshot {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Driver Version: {} ({} mode)\n",
            or_na(self.driver_version.as_deref()),
            self.mode
        );
        output.push_str(&format!("GPUs Found: {}\n\n", self.list.count));

        for gpu in &self.list.gpus {
            output.push_str(&gpu.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.list
            .gpus
            .iter()
            .map(|g| g.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
