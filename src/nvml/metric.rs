//! Names of the per-device metrics
//!
//! Used in diagnostics and for fault injection in the mock fleet.

use std::fmt;

/// One per-device telemetry query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Name,
    Uuid,
    Memory,
    Utilization,
    PowerUsage,
    PowerLimit,
    Temperature,
    FanSpeed,
    PerformanceState,
    ComputeMode,
    PersistenceMode,
}

impl Metric {
    /// Every metric, in the order a full record is assembled
    pub const ALL: [Metric; 11] = [
        Metric::Memory,
        Metric::Name,
        Metric::Uuid,
        Metric::Utilization,
        Metric::PowerUsage,
        Metric::PowerLimit,
        Metric::Temperature,
        Metric::FanSpeed,
        Metric::PerformanceState,
        Metric::ComputeMode,
        Metric::PersistenceMode,
    ];
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "device name",
            Self::Uuid => "device UUID",
            Self::Memory => "memory info",
            Self::Utilization => "utilization info",
            Self::PowerUsage => "power usage",
            Self::PowerLimit => "power limit",
            Self::Temperature => "temperature",
            Self::FanSpeed => "fan speed",
            Self::PerformanceState => "performance state",
            Self::ComputeMode => "compute mode",
            Self::PersistenceMode => "persistence mode",
        };
        f.write_str(name)
    }
}
