//! Service health report

use serde::Serialize;

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// A real NVML session is active
    Ok,
    /// Serving mock data
    Limited,
}

/// Body of the `/` health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub message: String,
    pub gpu_count: u32,
}

impl HealthReport {
    /// Build the report for the given session state
    pub fn new(real_session: bool, gpu_count: u32) -> Self {
        let mut message = format!("NVML REST API is running with {} GPUs detected", gpu_count);
        let status = if real_session {
            ServiceStatus::Ok
        } else {
            message.push_str(" (NVML initialization failed, running in limited mode)");
            ServiceStatus::Limited
        };

        Self {
            status,
            message,
            gpu_count,
        }
    }
}
