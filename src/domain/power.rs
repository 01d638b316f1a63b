//! Power domain types
//!
//! NVML reports power in milliwatts; the API serves watts as floating point.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A power reading, stored in milliwatts as reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PowerReading(u32);

impl PowerReading {
    /// Create a new reading from milliwatts
    pub const fn from_milliwatts(mw: u32) -> Self {
        Self(mw)
    }

    /// Get the reading in watts
    #[inline]
    pub fn as_watts(&self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl fmt::Display for PowerReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}W", self.as_watts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milliwatts_to_watts() {
        assert_eq!(PowerReading::from_milliwatts(125_500).as_watts(), 125.5);
        assert_eq!(PowerReading::from_milliwatts(250_000).as_watts(), 250.0);
        assert_eq!(PowerReading::from_milliwatts(1).as_watts(), 0.001);
    }

    #[test]
    fn test_power_reading_display() {
        assert_eq!(PowerReading::from_milliwatts(125_500).to_string(), "125.5W");
    }
}
