//! Compute mode domain type

use serde::{Deserialize, Serialize};
use std::fmt;

/// GPU compute mode
///
/// Serialized with the human-readable names NVIDIA tools use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComputeMode {
    /// Multiple contexts per device
    #[serde(rename = "Default")]
    Default,
    /// One context per device, usable from one thread at a time
    #[serde(rename = "Exclusive Thread")]
    ExclusiveThread,
    /// No contexts allowed
    #[serde(rename = "Prohibited")]
    Prohibited,
    /// One context per device, usable from multiple threads
    #[serde(rename = "Exclusive Process")]
    ExclusiveProcess,
    /// Raw code not recognized
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ComputeMode {
    /// Map a raw `nvmlComputeMode_t` code
    pub fn from_raw(code: u32) -> Self {
        match code {
            0 => Self::Default,
            1 => Self::ExclusiveThread,
            2 => Self::Prohibited,
            3 => Self::ExclusiveProcess,
            _ => Self::Unknown,
        }
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::ExclusiveThread => "Exclusive Thread",
            Self::Prohibited => "Prohibited",
            Self::ExclusiveProcess => "Exclusive Process",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_mode_from_raw() {
        assert_eq!(ComputeMode::from_raw(0), ComputeMode::Default);
        assert_eq!(ComputeMode::from_raw(1), ComputeMode::ExclusiveThread);
        assert_eq!(ComputeMode::from_raw(2), ComputeMode::Prohibited);
        assert_eq!(ComputeMode::from_raw(3), ComputeMode::ExclusiveProcess);
        assert_eq!(ComputeMode::from_raw(42), ComputeMode::Unknown);
    }

    #[test]
    fn test_compute_mode_serializes_display_name() {
        let json = serde_json::to_string(&ComputeMode::ExclusiveProcess).unwrap();
        assert_eq!(json, r#""Exclusive Process""#);
        assert_eq!(ComputeMode::ExclusiveThread.to_string(), "Exclusive Thread");
    }
}
