//! Memory domain types
//!
//! Framebuffer (VRAM) usage as reported by the device.

use serde::{Deserialize, Serialize};
use std::fmt;

/// VRAM/Memory information
///
/// `used` is expected to equal `total - free`, but the three values are read
/// in a single driver call and are reported as-is; callers must not rely on
/// the identity holding exactly.
///
/// # Examples
///
/// ```
/// use nvml_rest::domain::MemoryInfo;
///
/// let mem = MemoryInfo::new(8 * 1024 * 1024 * 1024, 6 * 1024 * 1024 * 1024, 2 * 1024 * 1024 * 1024);
/// assert_eq!(mem.used_mb(), 2048);
/// assert_eq!(mem.usage_percent(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    /// Total memory in bytes
    pub total: u64,
    /// Free memory in bytes
    pub free: u64,
    /// Used memory in bytes
    pub used: u64,
}

impl MemoryInfo {
    /// Create a new memory info value
    pub fn new(total: u64, free: u64, used: u64) -> Self {
        Self { total, free, used }
    }

    /// Build from total and free, deriving `used`
    pub fn from_total_free(total: u64, free: u64) -> Self {
        Self::new(total, free, total.saturating_sub(free))
    }

    /// All-zero value reported when the memory query fails
    pub const fn zeroed() -> Self {
        Self {
            total: 0,
            free: 0,
            used: 0,
        }
    }

    /// Get used memory in MB
    pub fn used_mb(&self) -> u64 {
        self.used / (1024 * 1024)
    }

    /// Get total memory in MB
    pub fn total_mb(&self) -> u64 {
        self.total / (1024 * 1024)
    }

    /// Get usage percentage (0 - 100)
    pub fn usage_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.used as f64 / self.total as f64) * 100.0).min(100.0) as u8
    }
}

impl fmt::Display for MemoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} MiB", self.used_mb(), self.total_mb())
    }
}
