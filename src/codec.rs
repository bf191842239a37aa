//! Conversion between raw wire integers and engineering values.
//!
//! A parameter's engineering value is `raw * scale + offset`. Both factors are
//! optional: without a scale only the offset applies, without either the value
//! is the raw integer itself.
//!
//! Decoding is always exact. Encoding runs the formula backwards and must land
//! on an integer: a quotient that would need rounding is an error, never a
//! silently truncated raw value.
//!
//! Bits take the same path through a 0/1 mapping, so exactness rules live in one
//! place only.
//!
//! # Example
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use modbus_sync::ValueCodec;
//! use std::str::FromStr;
//!
//! let scale = BigDecimal::from_str("0.5").unwrap();
//! let codec = ValueCodec::new(Some(&scale), None);
//!
//! assert_eq!(codec.decode(77), BigDecimal::from_str("38.5").unwrap());
//! assert_eq!(codec.encode(&BigDecimal::from_str("38.5").unwrap()).unwrap(), 77);
//!
//! // 38.25 / 0.5 = 76.5 is not a raw value
//! assert!(codec.encode(&BigDecimal::from_str("38.25").unwrap()).is_err());
//! ```

use bigdecimal::{BigDecimal, ToPrimitive};

use crate::error::{Result, SyncError};

/// Scale/offset transform of a single parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCodec<'a> {
    scale: Option<&'a BigDecimal>,
    offset: Option<&'a BigDecimal>,
}

impl<'a> ValueCodec<'a> {
    /// Creates a codec from optional scale and offset.
    pub fn new(scale: Option<&'a BigDecimal>, offset: Option<&'a BigDecimal>) -> Self {
        Self { scale, offset }
    }

    /// Codec that maps raw values to themselves.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Converts a raw value to its engineering value.
    pub fn decode(&self, raw: i32) -> BigDecimal {
        let mut value = BigDecimal::from(raw);
        if let Some(scale) = self.scale {
            value = value * scale;
        }
        if let Some(offset) = self.offset {
            value = value + offset;
        }
        value
    }

    /// Converts an engineering value back to its raw value.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Arithmetic` if the scale is zero, if the result is not
    /// an integer, or if it does not fit a raw value.
    pub fn encode(&self, value: &BigDecimal) -> Result<i32> {
        let mut raw = value.clone();
        if let Some(offset) = self.offset {
            raw = raw - offset;
        }
        if let Some(scale) = self.scale {
            raw = exact_div(&raw, scale)?;
        }
        if raw.with_scale(0) != raw {
            return Err(SyncError::arithmetic(
                value,
                format!("raw value {} is not an integer", raw),
            ));
        }
        raw.to_i32().ok_or_else(|| {
            SyncError::arithmetic(value, format!("raw value {} is out of range", raw))
        })
    }

    /// Converts a bit to its engineering value.
    pub fn decode_bool(&self, bit: bool) -> BigDecimal {
        self.decode(bool_to_raw(bit))
    }

    /// Converts an engineering value to a bit.
    ///
    /// # Errors
    ///
    /// Fails like [`encode`](Self::encode), and with `SyncError::Validation` if
    /// the raw value is neither 0 nor 1.
    pub fn encode_bool(&self, value: &BigDecimal) -> Result<bool> {
        raw_to_bool(self.encode(value)?)
    }
}

/// Divides `dividend` by `divisor`, failing instead of rounding.
///
/// # Errors
///
/// Returns `SyncError::Arithmetic` if the divisor is zero or the quotient has no
/// exact decimal representation.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use modbus_sync::codec::exact_div;
///
/// assert_eq!(exact_div(&BigDecimal::from(12), &BigDecimal::from(3)).unwrap(), BigDecimal::from(4));
/// assert!(exact_div(&BigDecimal::from(11), &BigDecimal::from(3)).is_err());
/// ```
pub fn exact_div(dividend: &BigDecimal, divisor: &BigDecimal) -> Result<BigDecimal> {
    if *divisor == BigDecimal::from(0) {
        return Err(SyncError::arithmetic(dividend, "scale is zero"));
    }
    let quotient = dividend / divisor;
    if &quotient * divisor != *dividend {
        return Err(SyncError::arithmetic(
            dividend,
            format!("division by scale {} is not exact", divisor),
        ));
    }
    Ok(quotient)
}

/// Maps a bit to its raw value.
pub fn bool_to_raw(bit: bool) -> i32 {
    i32::from(bit)
}

/// Maps a raw value to a bit.
///
/// # Errors
///
/// Returns `SyncError::Validation` for anything other than 0 or 1.
pub fn raw_to_bool(raw: i32) -> Result<bool> {
    match raw {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(SyncError::validation(
            "value",
            format!("raw value {} is not a bit", other),
        )),
    }
}
