//! In-memory Modbus slave.
//!
//! [`MemoryTransport`] implements [`Transport`] over four address tables held
//! in memory. It records every call it receives and can be told to misbehave,
//! which makes it the transport of choice for tests, benches and demos.
//!
//! - Unset addresses read as zero, or fail with exception 0x02 in strict mode.
//! - Writes to discrete inputs or input registers fail with exception 0x01.
//! - A [`Fault`] can be attached to an address; any window covering it fails.
//! - A write clamp stores and acknowledges a bounded value instead of the requested one.
//!
//! # Example
//!
//! ```
//! use modbus_sync::simulator::{Call, Fault, MemoryTransport};
//! use modbus_sync::{ParameterType, Transport};
//!
//! let mut slave = MemoryTransport::new();
//! slave.set_words(ParameterType::InputRegister, 0, &[40, 25]);
//! slave.inject_fault(ParameterType::InputRegister, 9, Fault::Timeout);
//!
//! slave.connect().unwrap();
//! assert!(slave.read_window(ParameterType::InputRegister, 0, 2).is_ok());
//! assert!(slave.read_window(ParameterType::InputRegister, 8, 2).is_err());
//! assert_eq!(slave.read_calls().count(), 2);
//! assert_eq!(slave.calls()[0], Call::Connect);
//! ```

use std::collections::HashMap;

use crate::error::TransportError;
use crate::register::ParameterType;
use crate::transport::{Transport, TransportResult, WindowData, WireValue};

/// Exception code for a function the table does not support.
const ILLEGAL_FUNCTION: u8 = 0x01;

/// Exception code for an address the slave does not hold.
const ILLEGAL_DATA_ADDRESS: u8 = 0x02;

/// A call received by a [`MemoryTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// `connect()`.
    Connect,
    /// `disconnect()`.
    Disconnect,
    /// `read_window(kind, address, count)`.
    ReadWindow {
        /// Table read.
        kind: ParameterType,
        /// First address.
        address: u16,
        /// Number of items.
        count: u16,
    },
    /// `write_single(kind, address, value)`.
    WriteSingle {
        /// Table written.
        kind: ParameterType,
        /// Address written.
        address: u16,
        /// Requested value.
        value: WireValue,
    },
}

/// Misbehaviour attached to an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The device never answers.
    Timeout,
    /// The device answers with the given exception code.
    Exception(u8),
    /// The device answers with one item less than requested.
    Truncate,
}

/// Inclusive bounds applied to writes at one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clamp {
    min: u16,
    max: u16,
}

/// Recording in-memory transport.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    bits: HashMap<(ParameterType, u16), bool>,
    words: HashMap<(ParameterType, u16), u16>,
    faults: HashMap<(ParameterType, u16), Fault>,
    clamps: HashMap<(ParameterType, u16), Clamp>,
    calls: Vec<Call>,
    connected: bool,
    strict: bool,
    fail_connect: bool,
}

impl MemoryTransport {
    /// Creates an empty, disconnected slave.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes reads of unset addresses fail with exception 0x02.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Stores bits starting at `start`.
    pub fn set_bits(&mut self, kind: ParameterType, start: u16, bits: &[bool]) {
        for (address, bit) in (start..=u16::MAX).zip(bits) {
            self.bits.insert((kind, address), *bit);
        }
    }

    /// Stores words starting at `start`.
    pub fn set_words(&mut self, kind: ParameterType, start: u16, words: &[u16]) {
        for (address, word) in (start..=u16::MAX).zip(words) {
            self.words.insert((kind, address), *word);
        }
    }

    /// Returns the stored bit at `address`.
    pub fn bit(&self, kind: ParameterType, address: u16) -> Option<bool> {
        self.bits.get(&(kind, address)).copied()
    }

    /// Returns the stored word at `address`.
    pub fn word(&self, kind: ParameterType, address: u16) -> Option<u16> {
        self.words.get(&(kind, address)).copied()
    }

    /// Makes every window read covering `address` fail with `fault`.
    pub fn inject_fault(&mut self, kind: ParameterType, address: u16, fault: Fault) {
        self.faults.insert((kind, address), fault);
    }

    /// Removes all injected faults.
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Makes `connect` fail with an I/O error.
    pub fn fail_connect(&mut self, fail: bool) {
        self.fail_connect = fail;
    }

    /// Bounds register writes at `address` to `min..=max`.
    pub fn clamp_writes(&mut self, kind: ParameterType, address: u16, min: u16, max: u16) {
        self.clamps.insert((kind, address), Clamp { min, max });
    }

    /// Returns whether the connection is open.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns every call received, in order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Iterates over the window reads received, in order.
    pub fn read_calls(&self) -> impl Iterator<Item = &Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::ReadWindow { .. }))
    }

    /// Iterates over the writes received, in order.
    pub fn write_calls(&self) -> impl Iterator<Item = &Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::WriteSingle { .. }))
    }

    /// Forgets the recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn ensure_connected(&self) -> TransportResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }

    fn fault_in(&self, kind: ParameterType, address: u16, count: u16) -> Option<Fault> {
        let end = u32::from(address) + u32::from(count);
        (u32::from(address)..end).find_map(|a| self.faults.get(&(kind, a as u16)).copied())
    }
}

impl Transport for MemoryTransport {
    fn connect(&mut self) -> TransportResult<()> {
        self.calls.push(Call::Connect);
        if self.fail_connect {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "simulated connection failure",
            )));
        }
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> TransportResult<()> {
        self.calls.push(Call::Disconnect);
        self.connected = false;
        Ok(())
    }

    fn read_window(
        &mut self,
        kind: ParameterType,
        address: u16,
        count: u16,
    ) -> TransportResult<WindowData> {
        self.calls.push(Call::ReadWindow {
            kind,
            address,
            count,
        });
        self.ensure_connected()?;

        let function = kind.describe().read.code;
        let mut len = u32::from(count);
        match self.fault_in(kind, address, count) {
            Some(Fault::Timeout) => return Err(TransportError::Timeout),
            Some(Fault::Exception(code)) => return Err(TransportError::exception(function, code)),
            Some(Fault::Truncate) => len = len.saturating_sub(1),
            None => {}
        }
        if u32::from(address) + u32::from(count) > u32::from(u16::MAX) + 1 {
            return Err(TransportError::exception(function, ILLEGAL_DATA_ADDRESS));
        }

        let addresses = (u32::from(address)..u32::from(address) + len).map(|a| a as u16);
        if kind.is_bit() {
            let mut bits = Vec::with_capacity(len as usize);
            for a in addresses {
                match self.bits.get(&(kind, a)) {
                    Some(bit) => bits.push(*bit),
                    None if self.strict => {
                        return Err(TransportError::exception(function, ILLEGAL_DATA_ADDRESS))
                    }
                    None => bits.push(false),
                }
            }
            Ok(WindowData::Bits(bits))
        } else {
            let mut words = Vec::with_capacity(len as usize);
            for a in addresses {
                match self.words.get(&(kind, a)) {
                    Some(word) => words.push(*word),
                    None if self.strict => {
                        return Err(TransportError::exception(function, ILLEGAL_DATA_ADDRESS))
                    }
                    None => words.push(0),
                }
            }
            Ok(WindowData::Words(words))
        }
    }

    fn write_single(
        &mut self,
        kind: ParameterType,
        address: u16,
        value: WireValue,
    ) -> TransportResult<WireValue> {
        self.calls.push(Call::WriteSingle {
            kind,
            address,
            value,
        });
        self.ensure_connected()?;

        let Some(function) = kind.describe().write_single else {
            return Err(TransportError::exception(
                kind.describe().read.code,
                ILLEGAL_FUNCTION,
            ));
        };
        match (kind.is_bit(), value) {
            (true, WireValue::Bit(bit)) => {
                self.bits.insert((kind, address), bit);
                Ok(WireValue::Bit(bit))
            }
            (false, WireValue::Word(word)) => {
                let stored = match self.clamps.get(&(kind, address)) {
                    Some(clamp) => word.clamp(clamp.min, clamp.max),
                    None => word,
                };
                self.words.insert((kind, address), stored);
                Ok(WireValue::Word(stored))
            }
            _ => Err(TransportError::exception(function.code, 0x03)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected() -> MemoryTransport {
        let mut slave = MemoryTransport::new();
        slave.connect().unwrap();
        slave
    }

    #[test]
    fn test_requires_connection() {
        let mut slave = MemoryTransport::new();
        let err = slave
            .read_window(ParameterType::Coil, 0, 1)
            .unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
        assert!(slave
            .write_single(ParameterType::Coil, 0, WireValue::Bit(true))
            .is_err());
    }

    #[test]
    fn test_connect_idempotent() {
        let mut slave = MemoryTransport::new();
        slave.connect().unwrap();
        slave.connect().unwrap();
        assert!(slave.is_connected());
        slave.disconnect().unwrap();
        slave.disconnect().unwrap();
        assert!(!slave.is_connected());
        assert_eq!(slave.calls().len(), 4);
    }

    #[test]
    fn test_fail_connect() {
        let mut slave = MemoryTransport::new();
        slave.fail_connect(true);
        assert!(matches!(slave.connect(), Err(TransportError::Io(_))));
        assert!(!slave.is_connected());
    }

    #[test]
    fn test_read_defaults_to_zero() {
        let mut slave = connected();
        slave.set_words(ParameterType::HoldingRegister, 1, &[5]);
        assert_eq!(
            slave
                .read_window(ParameterType::HoldingRegister, 0, 3)
                .unwrap(),
            WindowData::Words(vec![0, 5, 0])
        );
        assert_eq!(
            slave.read_window(ParameterType::Coil, 0, 2).unwrap(),
            WindowData::Bits(vec![false, false])
        );
    }

    #[test]
    fn test_strict_unset_address() {
        let mut slave = MemoryTransport::new().strict();
        slave.connect().unwrap();
        slave.set_bits(ParameterType::DiscreteInput, 0, &[true]);
        assert!(slave.read_window(ParameterType::DiscreteInput, 0, 1).is_ok());
        let err = slave
            .read_window(ParameterType::DiscreteInput, 0, 2)
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Exception {
                function: 2,
                code: 0x02
            }
        ));
    }

    #[test]
    fn test_tables_are_separate() {
        let mut slave = connected();
        slave.set_words(ParameterType::HoldingRegister, 0, &[1]);
        slave.set_words(ParameterType::InputRegister, 0, &[2]);
        assert_eq!(slave.word(ParameterType::HoldingRegister, 0), Some(1));
        assert_eq!(slave.word(ParameterType::InputRegister, 0), Some(2));
    }

    #[test]
    fn test_faults() {
        let mut slave = connected();
        slave.inject_fault(ParameterType::HoldingRegister, 5, Fault::Exception(0x04));
        slave.inject_fault(ParameterType::HoldingRegister, 10, Fault::Truncate);

        assert!(slave.read_window(ParameterType::HoldingRegister, 0, 5).is_ok());
        assert!(matches!(
            slave.read_window(ParameterType::HoldingRegister, 3, 3),
            Err(TransportError::Exception { code: 0x04, .. })
        ));
        assert_eq!(
            slave
                .read_window(ParameterType::HoldingRegister, 10, 3)
                .unwrap()
                .len(),
            2
        );

        slave.clear_faults();
        assert!(slave.read_window(ParameterType::HoldingRegister, 3, 3).is_ok());
    }

    #[test]
    fn test_write_read_only_table() {
        let mut slave = connected();
        let err = slave
            .write_single(ParameterType::InputRegister, 0, WireValue::Word(1))
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Exception {
                function: 4,
                code: 0x01
            }
        ));
    }

    #[test]
    fn test_write_clamped() {
        let mut slave = connected();
        slave.clamp_writes(ParameterType::HoldingRegister, 7, 10, 60);
        let ack = slave
            .write_single(ParameterType::HoldingRegister, 7, WireValue::Word(99))
            .unwrap();
        assert_eq!(ack, WireValue::Word(60));
        assert_eq!(slave.word(ParameterType::HoldingRegister, 7), Some(60));
        assert_eq!(slave.write_calls().count(), 1);
    }

    #[test]
    fn test_write_shape_mismatch() {
        let mut slave = connected();
        assert!(slave
            .write_single(ParameterType::Coil, 0, WireValue::Word(1))
            .is_err());
    }

    #[test]
    fn test_call_log() {
        let mut slave = connected();
        slave.read_window(ParameterType::Coil, 4, 2).unwrap();
        slave
            .write_single(ParameterType::Coil, 4, WireValue::Bit(true))
            .unwrap();
        assert_eq!(
            slave.calls(),
            &[
                Call::Connect,
                Call::ReadWindow {
                    kind: ParameterType::Coil,
                    address: 4,
                    count: 2
                },
                Call::WriteSingle {
                    kind: ParameterType::Coil,
                    address: 4,
                    value: WireValue::Bit(true)
                },
            ]
        );
        assert_eq!(slave.bit(ParameterType::Coil, 4), Some(true));
        slave.clear_calls();
        assert!(slave.calls().is_empty());
    }
}
