//! Opaque device handles

use std::fmt;

/// Reference to one GPU within one session
///
/// Handles are only issued by [`super::Session::device_handle`] and are
/// rejected by any other session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle {
    session_id: u64,
    index: u32,
}

impl DeviceHandle {
    pub(super) fn new(session_id: u64, index: u32) -> Self {
        Self { session_id, index }
    }

    /// Device index this handle refers to
    pub fn index(&self) -> u32 {
        self.index
    }

    pub(super) fn session_id(&self) -> u64 {
        self.session_id
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPU {}", self.index)
    }
}
