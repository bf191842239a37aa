//! Splitting address ranges into frame-sized read windows.
//!
//! A single Modbus transaction can only carry a limited number of bytes, so a
//! long range must be read in several windows. The number of items per window
//! follows from the frame budget and the item width:
//!
//! ```text
//! per_window = (max_frame_bytes - header_bytes) * 8 / bit_width
//! ```
//!
//! With the defaults (256-byte frame, 6-byte header) that is 125 registers or
//! 2000 bits per window.
//!
//! # Example
//!
//! ```
//! use modbus_sync::{BatchPlanner, ParameterType, Window};
//!
//! let planner = BatchPlanner::default();
//! let windows = planner.plan(ParameterType::HoldingRegister, 100, 300, None).unwrap();
//! assert_eq!(
//!     windows,
//!     vec![Window::new(100, 125), Window::new(225, 125), Window::new(350, 50)]
//! );
//! ```

use crate::error::{Result, SyncError};
use crate::register::ParameterType;

/// Default frame budget in bytes.
pub const DEFAULT_MAX_FRAME_BYTES: u16 = 256;

/// Default per-frame overhead in bytes.
pub const DEFAULT_HEADER_BYTES: u16 = 6;

/// Address sub-range read in one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// First address.
    pub address: u16,
    /// Number of items.
    pub count: u16,
}

impl Window {
    /// Creates a window.
    pub fn new(address: u16, count: u16) -> Self {
        Self { address, count }
    }

    /// One past the last address, widened so a window ending at 65535 is representable.
    pub fn end(&self) -> u32 {
        u32::from(self.address) + u32::from(self.count)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..{})", self.address, self.end())
    }
}

/// Computes read windows from a frame budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    max_frame_bytes: u16,
    header_bytes: u16,
}

impl Default for BatchPlanner {
    fn default() -> Self {
        Self {
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            header_bytes: DEFAULT_HEADER_BYTES,
        }
    }
}

impl BatchPlanner {
    /// Creates a planner for the given frame budget.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the payload left after the header
    /// cannot hold one item of the widest parameter type.
    pub fn new(max_frame_bytes: u16, header_bytes: u16) -> Result<Self> {
        let payload = u32::from(max_frame_bytes.saturating_sub(header_bytes));
        let widest = ParameterType::ALL
            .iter()
            .map(|kind| u32::from(kind.describe().bit_width).div_ceil(8))
            .max()
            .unwrap_or(1);
        if payload < widest {
            return Err(SyncError::validation(
                "max frame bytes",
                format!(
                    "{} leaves {} payload bytes after a {}-byte header, need at least {}",
                    max_frame_bytes, payload, header_bytes, widest
                ),
            ));
        }
        Ok(Self {
            max_frame_bytes,
            header_bytes,
        })
    }

    /// Returns the frame budget.
    pub fn max_frame_bytes(&self) -> u16 {
        self.max_frame_bytes
    }

    /// Returns the per-frame overhead.
    pub fn header_bytes(&self) -> u16 {
        self.header_bytes
    }

    /// Largest number of items of `kind` that fit in one window.
    pub fn ceiling(&self, kind: ParameterType) -> u16 {
        let payload_bits = u32::from(self.max_frame_bytes.saturating_sub(self.header_bytes)) * 8;
        let per_window = payload_bits / u32::from(kind.describe().bit_width);
        u16::try_from(per_window).unwrap_or(u16::MAX)
    }

    /// Window size for `kind`, honouring an optional caller override.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if no item of `kind` fits a frame, or if
    /// the override is 0 or above the ceiling.
    pub fn window_size(&self, kind: ParameterType, max_batch: Option<u16>) -> Result<u16> {
        let ceiling = self.ceiling(kind);
        if ceiling == 0 {
            return Err(SyncError::validation(
                "max frame bytes",
                format!("{} leaves no room for a single {}", self.max_frame_bytes, kind),
            ));
        }
        match max_batch {
            None => Ok(ceiling),
            Some(0) => Err(SyncError::validation("max batch", "must be greater than 0")),
            Some(limit) if limit > ceiling => Err(SyncError::validation(
                "max batch",
                format!(
                    "{} exceeds the {} limit of {} per read",
                    limit, kind, ceiling
                ),
            )),
            Some(limit) => Ok(limit),
        }
    }

    /// Splits `[start, start + count)` into ascending, contiguous windows.
    ///
    /// Every window but the last holds exactly the window size; the last one
    /// holds the remainder.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if `count` is 0, the range runs past
    /// address 65535, or `max_batch` is invalid.
    pub fn plan(
        &self,
        kind: ParameterType,
        start: u16,
        count: u32,
        max_batch: Option<u16>,
    ) -> Result<Vec<Window>> {
        if count == 0 {
            return Err(SyncError::validation("count", "must be greater than 0"));
        }
        let end = u32::from(start) + count;
        if end > u32::from(u16::MAX) + 1 {
            return Err(SyncError::validation(
                "count",
                format!("range {}+{} runs past the last address {}", start, count, u16::MAX),
            ));
        }

        let size = u32::from(self.window_size(kind, max_batch)?);
        let mut windows = Vec::with_capacity(count.div_ceil(size) as usize);
        let mut address = u32::from(start);
        while address < end {
            let len = size.min(end - address);
            windows.push(Window::new(address as u16, len as u16));
            address += len;
        }
        Ok(windows)
    }
}
