//! Performance and utilization domain types

use serde::{Deserialize, Serialize, Serializer};

/// GPU and memory utilization rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Utilization {
    /// GPU compute utilization percentage
    pub gpu: u32,
    /// Memory bandwidth utilization percentage
    pub memory: u32,
}

impl Utilization {
    /// Create a utilization value from the driver's readings, unchanged
    pub fn new(gpu: u32, memory: u32) -> Self {
        Self { gpu, memory }
    }
}

/// GPU performance state (P-state)
///
/// Lower numbers = higher performance, higher power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerformanceState {
    /// Maximum performance (P0)
    P0,
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    P9,
    P10,
    P11,
    /// Minimum performance (P12)
    P12,
    P13,
    P14,
    P15,
    /// Unknown state
    #[default]
    Unknown,
}

impl PerformanceState {
    /// Create from raw NVML value
    pub fn from_raw(value: u32) -> Self {
        match value {
            0 => Self::P0,
            1 => Self::P1,
            2 => Self::P2,
            3 => Self::P3,
            4 => Self::P4,
            5 => Self::P5,
            6 => Self::P6,
            7 => Self::P7,
            8 => Self::P8,
            9 => Self::P9,
            10 => Self::P10,
            11 => Self::P11,
            12 => Self::P12,
            13 => Self::P13,
            14 => Self::P14,
            15 => Self::P15,
            _ => Self::Unknown,
        }
    }

    /// Get the raw value
    pub fn as_raw(&self) -> u32 {
        match self {
            Self::P0 => 0,
            Self::P1 => 1,
            Self::P2 => 2,
            Self::P3 => 3,
            Self::P4 => 4,
            Self::P5 => 5,
            Self::P6 => 6,
            Self::P7 => 7,
            Self::P8 => 8,
            Self::P9 => 9,
            Self::P10 => 10,
            Self::P11 => 11,
            Self::P12 => 12,
            Self::P13 => 13,
            Self::P14 => 14,
            Self::P15 => 15,
            Self::Unknown => 32,
        }
    }
}

impl std::fmt::Display for PerformanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            _ => write!(f, "P{}", self.as_raw()),
        }
    }
}

impl Serialize for PerformanceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
