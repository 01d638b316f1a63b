//! Fan domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fan speed as a percentage of maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FanSpeed(u32);

impl FanSpeed {
    /// Create a fan speed from the driver's reading
    ///
    /// NVML may report above 100% on some boards; the value is kept as-is.
    pub const fn new(percent: u32) -> Self {
        Self(percent)
    }

    /// Get the fan speed as a percentage
    #[inline]
    pub const fn as_percentage(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_speed_keeps_raw_reading() {
        assert_eq!(FanSpeed::new(45).as_percentage(), 45);
        assert_eq!(FanSpeed::new(104).as_percentage(), 104);
        assert_eq!(serde_json::to_string(&FanSpeed::new(45)).unwrap(), "45");
    }
}
