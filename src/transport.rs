//! Transport seam between the engine and a Modbus slave.
//!
//! The engine never builds frames or touches sockets. It talks to a device
//! through the [`Transport`] trait, which exposes exactly the primitives the
//! synchronization engine needs:
//!
//! - [`connect`](Transport::connect) / [`disconnect`](Transport::disconnect), both idempotent
//! - [`read_window`](Transport::read_window), one bulk read transaction
//! - [`write_single`](Transport::write_single), one single-item write returning the acknowledgement
//!
//! Implementations are synchronous: each call blocks until the device answers
//! or the transport's own timeout expires. The engine issues calls strictly one
//! at a time and never retries; retry policy belongs to the implementation.
//!
//! # Example
//!
//! ```
//! use modbus_sync::{MemoryTransport, ParameterType, Transport, WindowData};
//!
//! let mut transport = MemoryTransport::new();
//! transport.set_words(ParameterType::HoldingRegister, 0, &[7, 8]);
//!
//! transport.connect().unwrap();
//! let data = transport.read_window(ParameterType::HoldingRegister, 0, 2).unwrap();
//! assert_eq!(data, WindowData::Words(vec![7, 8]));
//! transport.disconnect().unwrap();
//! ```

use crate::error::TransportError;
use crate::register::ParameterType;

/// Result type alias for transport primitives.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Payload of one window read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowData {
    /// Coil or discrete input states.
    Bits(Vec<bool>),
    /// Register words as carried on the wire.
    Words(Vec<u16>),
}

impl WindowData {
    /// Number of items in the window.
    pub fn len(&self) -> usize {
        match self {
            WindowData::Bits(bits) => bits.len(),
            WindowData::Words(words) => words.len(),
        }
    }

    /// Returns `true` if the window carries no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single item as written to or acknowledged by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireValue {
    /// Coil state.
    Bit(bool),
    /// Register word.
    Word(u16),
}

impl std::fmt::Display for WireValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireValue::Bit(true) => f.write_str("ON"),
            WireValue::Bit(false) => f.write_str("OFF"),
            WireValue::Word(word) => write!(f, "0x{:04X}", word),
        }
    }
}

/// Synchronous access to one Modbus slave.
pub trait Transport {
    /// Opens the connection. Calling it on an open connection does nothing.
    fn connect(&mut self) -> TransportResult<()>;

    /// Closes the connection. Calling it on a closed connection does nothing.
    fn disconnect(&mut self) -> TransportResult<()>;

    /// Reads `count` consecutive items of `kind` starting at `address` in one transaction.
    ///
    /// Bit types answer with [`WindowData::Bits`], register types with
    /// [`WindowData::Words`].
    fn read_window(
        &mut self,
        kind: ParameterType,
        address: u16,
        count: u16,
    ) -> TransportResult<WindowData>;

    /// Writes one item and returns the value the device acknowledged.
    fn write_single(
        &mut self,
        kind: ParameterType,
        address: u16,
        value: WireValue,
    ) -> TransportResult<WireValue>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn connect(&mut self) -> TransportResult<()> {
        (**self).connect()
    }

    fn disconnect(&mut self) -> TransportResult<()> {
        (**self).disconnect()
    }

    fn read_window(
        &mut self,
        kind: ParameterType,
        address: u16,
        count: u16,
    ) -> TransportResult<WindowData> {
        (**self).read_window(kind, address, count)
    }

    fn write_single(
        &mut self,
        kind: ParameterType,
        address: u16,
        value: WireValue,
    ) -> TransportResult<WireValue> {
        (**self).write_single(kind, address, value)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> TransportResult<()> {
        (**self).connect()
    }

    fn disconnect(&mut self) -> TransportResult<()> {
        (**self).disconnect()
    }

    fn read_window(
        &mut self,
        kind: ParameterType,
        address: u16,
        count: u16,
    ) -> TransportResult<WindowData> {
        (**self).read_window(kind, address, count)
    }

    fn write_single(
        &mut self,
        kind: ParameterType,
        address: u16,
        value: WireValue,
    ) -> TransportResult<WireValue> {
        (**self).write_single(kind, address, value)
    }
}
