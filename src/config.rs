//! Engine configuration.

use crate::error::Result;
use crate::planner::{BatchPlanner, DEFAULT_HEADER_BYTES, DEFAULT_MAX_FRAME_BYTES};

/// Configuration of a synchronization run.
///
/// # Example
///
/// ```
/// use modbus_sync::{ParameterType, SyncConfig};
///
/// let config = SyncConfig::new();
/// assert_eq!(config.max_frame_bytes, 256);
/// assert_eq!(config.planner().unwrap().ceiling(ParameterType::HoldingRegister), 125);
///
/// // A gateway limited to 64-byte frames
/// let config = SyncConfig::new().with_max_frame_bytes(64);
/// assert_eq!(config.planner().unwrap().ceiling(ParameterType::HoldingRegister), 29);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SyncConfig {
    /// Largest frame the device accepts, in bytes.
    pub max_frame_bytes: u16,
    /// Per-frame overhead subtracted from the budget, in bytes.
    pub header_bytes: u16,
}

impl SyncConfig {
    /// Creates a configuration with the standard Modbus frame budget.
    pub fn new() -> Self {
        Self {
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            header_bytes: DEFAULT_HEADER_BYTES,
        }
    }

    /// Sets the frame budget (default is 256 bytes).
    pub fn with_max_frame_bytes(mut self, max_frame_bytes: u16) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    /// Sets the per-frame overhead (default is 6 bytes).
    pub fn with_header_bytes(mut self, header_bytes: u16) -> Self {
        self.header_bytes = header_bytes;
        self
    }

    /// Builds the batch planner for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the payload cannot hold one register.
    pub fn planner(&self) -> Result<BatchPlanner> {
        BatchPlanner::new(self.max_frame_bytes, self.header_bytes)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}
