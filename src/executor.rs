//! Reading address ranges window by window.
//!
//! # Example
//!
//! ```
//! use modbus_sync::{BatchPlanner, MemoryTransport, ParameterType, ReadExecutor, Transport};
//!
//! let mut slave = MemoryTransport::new();
//! slave.set_words(ParameterType::HoldingRegister, 2, &[10, 20, 30, 40, 50]);
//! slave.connect().unwrap();
//!
//! let planner = BatchPlanner::default();
//! let mut executor = ReadExecutor::new(&mut slave, &planner);
//! let raw = executor.read(ParameterType::HoldingRegister, 2, 5, Some(2)).unwrap();
//! assert_eq!(raw, vec![10, 20, 30, 40, 50]);
//! assert_eq!(slave.read_calls().count(), 3);
//! ```

use tracing::debug;

use crate::error::Result;
use crate::planner::BatchPlanner;
use crate::register::ParameterType;
use crate::transport::Transport;
use crate::utils::window_to_raw;

/// Reads ranges of any length through a single-window transport primitive.
///
/// Windows are read one after the other in ascending order. The first failing
/// window aborts the whole read; no partial buffer is returned.
pub struct ReadExecutor<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
    planner: &'a BatchPlanner,
}

impl<'a, T: Transport + ?Sized> ReadExecutor<'a, T> {
    /// Creates an executor over a connected transport.
    pub fn new(transport: &'a mut T, planner: &'a BatchPlanner) -> Self {
        Self { transport, planner }
    }

    /// Reads `count` items of `kind` starting at `start`.
    ///
    /// Bits come back as 0/1, register words unsigned. The result holds exactly
    /// `count` values, the value of address `start + i` at index `i`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the range cannot be planned, and
    /// `SyncError::Transport` with the transport's error if any window fails or
    /// comes back with the wrong number of items.
    pub fn read(
        &mut self,
        kind: ParameterType,
        start: u16,
        count: u32,
        max_batch: Option<u16>,
    ) -> Result<Vec<i32>> {
        let windows = self.planner.plan(kind, start, count, max_batch)?;
        let mut buffer = vec![0i32; count as usize];

        for (index, window) in windows.iter().enumerate() {
            debug!(
                kind = %kind,
                window = index,
                of = windows.len(),
                range = %window,
                "Reading window"
            );
            let data = self
                .transport
                .read_window(kind, window.address, window.count)?;
            let values = window_to_raw(kind, data, window.count)?;
            let offset = usize::from(window.address - start);
            buffer[offset..offset + values.len()].copy_from_slice(&values);
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SyncError, TransportError};
    use crate::simulator::{Call, Fault, MemoryTransport};

    fn slave() -> MemoryTransport {
        let mut slave = MemoryTransport::new();
        slave.connect().unwrap();
        slave.clear_calls();
        slave
    }

    #[test]
    fn test_single_window_read() {
        let mut slave = slave();
        slave.set_words(ParameterType::InputRegister, 0, &[40, 25]);
        let planner = BatchPlanner::default();
        let raw = ReadExecutor::new(&mut slave, &planner)
            .read(ParameterType::InputRegister, 0, 2, None)
            .unwrap();
        assert_eq!(raw, vec![40, 25]);
        assert_eq!(slave.calls().len(), 1);
    }

    #[test]
    fn test_bits_normalized() {
        let mut slave = slave();
        slave.set_bits(ParameterType::Coil, 0, &[true, false, true, true]);
        let planner = BatchPlanner::default();
        let raw = ReadExecutor::new(&mut slave, &planner)
            .read(ParameterType::Coil, 0, 4, None)
            .unwrap();
        assert_eq!(raw, vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_multi_window_order() {
        let mut slave = slave();
        let words: Vec<u16> = (0..300).collect();
        slave.set_words(ParameterType::HoldingRegister, 1000, &words);
        let planner = BatchPlanner::default();
        let raw = ReadExecutor::new(&mut slave, &planner)
            .read(ParameterType::HoldingRegister, 1000, 300, None)
            .unwrap();
        let expected: Vec<i32> = (0..300).collect();
        assert_eq!(raw, expected);

        let addresses: Vec<u16> = slave
            .read_calls()
            .map(|call| match call {
                Call::ReadWindow { address, .. } => *address,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(addresses, vec![1000, 1125, 1250]);
    }

    #[test]
    fn test_window_failure_aborts() {
        let mut slave = slave();
        slave.inject_fault(ParameterType::HoldingRegister, 3, Fault::Exception(0x02));
        let planner = BatchPlanner::default();
        let err = ReadExecutor::new(&mut slave, &planner)
            .read(ParameterType::HoldingRegister, 0, 6, Some(2))
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Transport(TransportError::Exception { code: 0x02, .. })
        ));
        // Third window never requested.
        assert_eq!(slave.read_calls().count(), 2);
    }

    #[test]
    fn test_short_window_is_malformed() {
        let mut slave = slave();
        slave.inject_fault(ParameterType::InputRegister, 0, Fault::Truncate);
        let planner = BatchPlanner::default();
        let err = ReadExecutor::new(&mut slave, &planner)
            .read(ParameterType::InputRegister, 0, 4, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Transport(TransportError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_invalid_override_makes_no_call() {
        let mut slave = slave();
        let planner = BatchPlanner::default();
        let err = ReadExecutor::new(&mut slave, &planner)
            .read(ParameterType::HoldingRegister, 0, 4, Some(500))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(slave.calls().is_empty());
    }
}
