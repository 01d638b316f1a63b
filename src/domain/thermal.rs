//! Thermal domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// GPU core temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(u32);

impl Temperature {
    /// Create a new Temperature
    pub const fn new(celsius: u32) -> Self {
        Self(celsius)
    }

    /// Get the temperature in Celsius
    #[inline]
    pub const fn as_celsius(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_is_plain_number_in_json() {
        assert_eq!(serde_json::to_string(&Temperature::new(65)).unwrap(), "65");
        assert_eq!(Temperature::new(65).to_string(), "65°C");
    }
}
