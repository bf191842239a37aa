//! Conversions between wire items and raw values.
//!
//! Raw values are plain `i32` integers: bits become 0/1 and register words are
//! taken unsigned (0..=65535). A parameter declaring [`DataType::Int16`] gets its
//! word reinterpreted as two's complement with [`reinterpret`].
//!
//! # Example
//!
//! ```
//! use modbus_sync::utils::{raw_to_wire, reinterpret};
//! use modbus_sync::{DataType, ParameterType, WireValue};
//!
//! assert_eq!(reinterpret(0xFFFE, DataType::Int16), -2);
//! assert_eq!(reinterpret(0xFFFE, DataType::Uint16), 65534);
//!
//! let wire = raw_to_wire(ParameterType::HoldingRegister, DataType::Int16, -2).unwrap();
//! assert_eq!(wire, WireValue::Word(0xFFFE));
//! ```

use crate::codec::bool_to_raw;
use crate::error::{Result, SyncError, TransportError};
use crate::register::{DataType, ParameterType};
use crate::transport::{TransportResult, WindowData, WireValue};

/// Normalizes a window payload to raw values, checking its shape.
///
/// # Errors
///
/// Returns `TransportError::MalformedResponse` if the payload holds bits for a
/// register type (or words for a bit type), or does not hold `expected` items.
pub fn window_to_raw(
    kind: ParameterType,
    data: WindowData,
    expected: u16,
) -> TransportResult<Vec<i32>> {
    if data.len() != usize::from(expected) {
        return Err(TransportError::malformed(format!(
            "expected {} {} items, got {}",
            expected,
            kind,
            data.len()
        )));
    }
    match (kind.is_bit(), data) {
        (true, WindowData::Bits(bits)) => Ok(bits.into_iter().map(bool_to_raw).collect()),
        (false, WindowData::Words(words)) => Ok(words.into_iter().map(i32::from).collect()),
        (_, WindowData::Bits(_)) => Err(TransportError::malformed(format!(
            "bits returned for {} read",
            kind
        ))),
        (_, WindowData::Words(_)) => Err(TransportError::malformed(format!(
            "words returned for {} read",
            kind
        ))),
    }
}

/// Reinterprets an unsigned register raw value according to `data_type`.
///
/// Only [`DataType::Int16`] changes anything: values above 32767 wrap to negative.
pub fn reinterpret(raw: i32, data_type: DataType) -> i32 {
    match data_type {
        DataType::Int16 => i32::from(raw as u16 as i16),
        _ => raw,
    }
}

/// Converts a raw value to the wire item written for `kind`.
///
/// # Errors
///
/// Returns `SyncError::Validation` if `raw` is outside the range of the
/// resolved data type.
pub fn raw_to_wire(kind: ParameterType, data_type: DataType, raw: i32) -> Result<WireValue> {
    let data_type = data_type.resolve(kind);
    let (min, max) = if kind.is_bit() {
        DataType::Bool.raw_range()
    } else {
        data_type.raw_range()
    };
    if raw < min || raw > max {
        return Err(SyncError::validation(
            "raw value",
            format!("{} is outside {}..={} for {}", raw, min, max, kind),
        ));
    }
    Ok(if kind.is_bit() {
        WireValue::Bit(raw == 1)
    } else {
        WireValue::Word(raw as u16)
    })
}

/// Converts an acknowledged wire item back to a raw value.
///
/// # Errors
///
/// Returns `TransportError::MalformedResponse` if the item does not match the
/// width of `kind`.
pub fn wire_to_raw(
    kind: ParameterType,
    data_type: DataType,
    value: WireValue,
) -> TransportResult<i32> {
    match (kind.is_bit(), value) {
        (true, WireValue::Bit(bit)) => Ok(bool_to_raw(bit)),
        (false, WireValue::Word(word)) => {
            Ok(reinterpret(i32::from(word), data_type.resolve(kind)))
        }
        (_, other) => Err(TransportError::malformed(format!(
            "acknowledgement {} does not match {} write",
            other, kind
        ))),
    }
}
