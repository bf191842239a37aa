//! Parameters, parameter catalogs and read requests.
//!
//! A [`Parameter`] is an immutable value: documentation metadata, a location
//! (type + address), an optional scale/offset transform and the current raw and
//! decoded values. Every value transition ([`with_raw_value`](Parameter::with_raw_value),
//! [`with_value`](Parameter::with_value), [`cleared`](Parameter::cleared), ...)
//! returns a new instance; fields are only reachable through accessors.
//!
//! Whenever a parameter holds a value, `value == raw * scale + offset` exactly.
//!
//! # Example
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use modbus_sync::{Parameter, ParameterType};
//! use std::str::FromStr;
//!
//! let setpoint = Parameter::new(ParameterType::HoldingRegister, 7)
//!     .with_identifier("P2111")
//!     .with_name("Heating zone 2 fixed outgoing water set point")
//!     .with_unit("°C")
//!     .with_scale(BigDecimal::from_str("0.1").unwrap());
//!
//! let read = setpoint.with_raw_value(500).unwrap();
//! assert_eq!(read.value(), Some(&BigDecimal::from(50)));
//!
//! let target = setpoint.with_value(BigDecimal::from_str("38.5").unwrap()).unwrap();
//! assert_eq!(target.raw_value(), Some(385));
//!
//! // The original is untouched.
//! assert_eq!(setpoint.raw_value(), None);
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::codec::{bool_to_raw, ValueCodec};
use crate::error::{Result, SyncError};
use crate::register::{DataType, ParameterType};

/// Access level required to change a parameter on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    /// End user (`U`). Also used for unrecognised codes.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "U"))]
    User,
    /// Installer (`I`).
    #[cfg_attr(feature = "serde", serde(rename = "I"))]
    Installer,
    /// Service technician (`S`).
    #[cfg_attr(feature = "serde", serde(rename = "S"))]
    Service,
}

impl Level {
    /// Single-letter code used in parameter documentation.
    pub fn code(self) -> &'static str {
        match self {
            Level::User => "U",
            Level::Installer => "I",
            Level::Service => "S",
        }
    }

    /// Parses a level code, mapping unknown codes to [`Level::User`].
    pub fn from_code(code: &str) -> Level {
        match code.trim() {
            "I" | "i" => Level::Installer,
            "S" | "s" => Level::Service,
            _ => Level::User,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A documented device parameter and its current value.
///
/// Deserialized parameters are checked like built ones: a raw value must fit
/// the data type, and a value given next to it must equal its decoding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ParameterRecord"))]
pub struct Parameter {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    kind: ParameterType,
    address: u16,
    raw_value: Option<i32>,
    value: Option<BigDecimal>,
    param: Option<String>,
    name: Option<String>,
    group: Option<String>,
    level: Option<Level>,
    description: Option<String>,
    values: Option<String>,
    default_value: Option<String>,
    min_value: Option<String>,
    max_value: Option<String>,
    remarks: Option<String>,
    unit: Option<String>,
    step: Option<String>,
    precision: Option<u32>,
    scale: Option<BigDecimal>,
    offset: Option<BigDecimal>,
    data_type: DataType,
}

/// Unchecked form of a [`Parameter`] as read from configuration.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ParameterRecord {
    #[serde(rename = "type")]
    kind: ParameterType,
    address: u16,
    raw_value: Option<i32>,
    value: Option<BigDecimal>,
    param: Option<String>,
    name: Option<String>,
    group: Option<String>,
    level: Option<Level>,
    description: Option<String>,
    values: Option<String>,
    default_value: Option<String>,
    min_value: Option<String>,
    max_value: Option<String>,
    remarks: Option<String>,
    unit: Option<String>,
    step: Option<String>,
    precision: Option<u32>,
    scale: Option<BigDecimal>,
    offset: Option<BigDecimal>,
    #[serde(default)]
    data_type: DataType,
}

#[cfg(feature = "serde")]
impl TryFrom<ParameterRecord> for Parameter {
    type Error = SyncError;

    fn try_from(record: ParameterRecord) -> Result<Self> {
        let metadata = Parameter {
            kind: record.kind,
            address: record.address,
            raw_value: None,
            value: None,
            param: record.param,
            name: record.name,
            group: record.group,
            level: record.level,
            description: record.description,
            values: record.values,
            default_value: record.default_value,
            min_value: record.min_value,
            max_value: record.max_value,
            remarks: record.remarks,
            unit: record.unit,
            step: record.step,
            precision: record.precision,
            scale: record.scale,
            offset: record.offset,
            data_type: record.data_type,
        };
        match (record.raw_value, record.value) {
            (None, None) => Ok(metadata),
            (None, Some(value)) => metadata.with_value(value),
            (Some(raw), value) => {
                let read = metadata.with_raw_value(raw)?;
                match (value, read.value()) {
                    (Some(value), Some(decoded)) if value != *decoded => {
                        Err(SyncError::arithmetic(
                            &value,
                            format!("raw value {} decodes to {}", raw, decoded),
                        ))
                    }
                    _ => Ok(read),
                }
            }
        }
    }
}

macro_rules! text_field {
    ($field:ident, $with:ident, $doc:literal) => {
        #[doc = concat!("Returns the ", $doc, ".")]
        pub fn $field(&self) -> Option<&str> {
            self.$field.as_deref()
        }

        #[doc = concat!("Sets the ", $doc, ".")]
        pub fn $with(mut self, $field: impl Into<String>) -> Self {
            self.$field = Some($field.into());
            self
        }
    };
}

impl Parameter {
    /// Creates a bare parameter: type and address only, identity transform, no value.
    pub fn new(kind: ParameterType, address: u16) -> Self {
        Self {
            kind,
            address,
            raw_value: None,
            value: None,
            param: None,
            name: None,
            group: None,
            level: None,
            description: None,
            values: None,
            default_value: None,
            min_value: None,
            max_value: None,
            remarks: None,
            unit: None,
            step: None,
            precision: None,
            scale: None,
            offset: None,
            data_type: DataType::Unknown,
        }
    }

    /// Returns the parameter type.
    pub fn kind(&self) -> ParameterType {
        self.kind
    }

    /// Returns the address within the type's table.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Returns the raw wire value, if any.
    pub fn raw_value(&self) -> Option<i32> {
        self.raw_value
    }

    /// Returns the decoded engineering value, if any.
    pub fn value(&self) -> Option<&BigDecimal> {
        self.value.as_ref()
    }

    /// Returns the scale factor.
    pub fn scale(&self) -> Option<&BigDecimal> {
        self.scale.as_ref()
    }

    /// Returns the offset.
    pub fn offset(&self) -> Option<&BigDecimal> {
        self.offset.as_ref()
    }

    /// Returns the number of decimals shown by [`formatted_value`](Self::formatted_value).
    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    /// Returns the access level.
    pub fn level(&self) -> Option<Level> {
        self.level
    }

    /// Returns the declared data type, resolved against the parameter type.
    pub fn data_type(&self) -> DataType {
        self.data_type.resolve(self.kind)
    }

    /// Returns the parameter identifier (e.g. `P0100`).
    pub fn identifier(&self) -> Option<&str> {
        self.param.as_deref()
    }

    /// Sets the parameter identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.param = Some(identifier.into());
        self
    }

    text_field!(name, with_name, "short name");
    text_field!(group, with_group, "group name");
    text_field!(description, with_description, "description");
    text_field!(values, with_values, "documented value meanings (e.g. `0=off, 1=on`)");
    text_field!(default_value, with_default_value, "documented default value");
    text_field!(min_value, with_min_value, "documented minimum");
    text_field!(max_value, with_max_value, "documented maximum");
    text_field!(remarks, with_remarks, "remarks");
    text_field!(unit, with_unit, "engineering unit");
    text_field!(step, with_step, "documented step between values");

    /// Sets the access level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the number of decimals shown by [`formatted_value`](Self::formatted_value).
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Sets the declared data type.
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Sets the scale factor. Any held value is dropped since it no longer matches.
    pub fn with_scale(mut self, scale: BigDecimal) -> Self {
        self.scale = Some(scale);
        self.clear_values();
        self
    }

    /// Sets the offset. Any held value is dropped since it no longer matches.
    pub fn with_offset(mut self, offset: BigDecimal) -> Self {
        self.offset = Some(offset);
        self.clear_values();
        self
    }

    /// Returns the scale/offset transform of this parameter.
    pub fn codec(&self) -> ValueCodec<'_> {
        ValueCodec::new(self.scale.as_ref(), self.offset.as_ref())
    }

    /// Returns whether the parameter type can be written.
    pub fn is_writable(&self) -> bool {
        self.kind.is_writable()
    }

    /// Checks that the parameter has the expected type.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` on a type mismatch.
    pub fn expect_type(&self, kind: ParameterType) -> Result<&Self> {
        if self.kind != kind {
            return Err(SyncError::validation(
                "type",
                format!("parameter at {} is {}, expected {}", self.address, self.kind, kind),
            ));
        }
        Ok(self)
    }

    /// Returns a copy holding `raw` and its decoded value.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if `raw` does not fit the declared data type.
    pub fn with_raw_value(&self, raw: i32) -> Result<Parameter> {
        let (min, max) = self.data_type().raw_range();
        if raw < min || raw > max {
            return Err(SyncError::validation(
                "raw value",
                format!(
                    "{} is outside {}..={} for {} parameter at {}",
                    raw, min, max, self.kind, self.address
                ),
            ));
        }
        let mut next = self.clone();
        next.value = Some(self.codec().decode(raw));
        next.raw_value = Some(raw);
        Ok(next)
    }

    /// Returns a copy holding `value` and its encoded raw value.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Arithmetic` if `value` has no exact raw value, and
    /// `SyncError::Validation` if the raw value does not fit the data type.
    pub fn with_value(&self, value: BigDecimal) -> Result<Parameter> {
        let raw = self.codec().encode(&value)?;
        let mut next = self.with_raw_value(raw)?;
        next.value = Some(value);
        Ok(next)
    }

    /// Returns a copy of a coil holding `bit`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the parameter is not a coil.
    pub fn with_bool(&self, bit: bool) -> Result<Parameter> {
        self.expect_type(ParameterType::Coil)?;
        self.with_raw_value(bool_to_raw(bit))
    }

    /// Returns a copy of a coil switched on.
    pub fn enable(&self) -> Result<Parameter> {
        self.with_bool(true)
    }

    /// Returns a copy of a coil switched off.
    pub fn disable(&self) -> Result<Parameter> {
        self.with_bool(false)
    }

    /// Returns a copy without raw or decoded value; metadata is kept.
    pub fn cleared(&self) -> Parameter {
        let mut next = self.clone();
        next.clear_values();
        next
    }

    fn clear_values(&mut self) {
        self.raw_value = None;
        self.value = None;
    }

    /// Formats the decoded value for output.
    ///
    /// Integral values print without a fractional part. Otherwise, with a precision
    /// set, shorter fractions are padded with zeros; longer ones are printed in full.
    ///
    /// # Example
    ///
    /// ```
    /// use bigdecimal::BigDecimal;
    /// use modbus_sync::{Parameter, ParameterType};
    /// use std::str::FromStr;
    ///
    /// let p = Parameter::new(ParameterType::HoldingRegister, 7)
    ///     .with_scale(BigDecimal::from_str("0.5").unwrap());
    /// assert_eq!(p.with_raw_value(80).unwrap().formatted_value().as_deref(), Some("40"));
    /// assert_eq!(p.with_raw_value(77).unwrap().formatted_value().as_deref(), Some("38.5"));
    ///
    /// let p = p.with_precision(2);
    /// assert_eq!(p.with_raw_value(77).unwrap().formatted_value().as_deref(), Some("38.50"));
    /// ```
    pub fn formatted_value(&self) -> Option<String> {
        let value = self.value.as_ref()?;
        let integral = value.with_scale(0);
        if integral == *value {
            return Some(integral.to_string());
        }
        let (_, exponent) = value.as_bigint_and_exponent();
        let text = match self.precision {
            Some(precision) if exponent < i64::from(precision) => {
                value.with_scale(i64::from(precision)).to_string()
            }
            _ => value.to_string(),
        };
        Some(text)
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.kind, self.address)?;
        if let Some(param) = &self.param {
            write!(f, " {}", param)?;
        }
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        match (self.raw_value, self.formatted_value()) {
            (Some(raw), Some(value)) => write!(f, " = {} (raw {})", value, raw)?,
            _ => write!(f, " = <unread>")?,
        }
        if let Some(unit) = &self.unit {
            write!(f, " {}", unit)?;
        }
        Ok(())
    }
}

/// Read-only mapping from (type, address) to documented parameters.
#[derive(Debug, Clone, Default)]
pub struct ParameterCatalog {
    entries: HashMap<(ParameterType, u16), Parameter>,
}

impl ParameterCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from documented parameters.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if two parameters share a type and address.
    pub fn from_parameters(parameters: impl IntoIterator<Item = Parameter>) -> Result<Self> {
        let mut entries = HashMap::new();
        for parameter in parameters {
            let key = (parameter.kind(), parameter.address());
            if entries.contains_key(&key) {
                return Err(SyncError::validation(
                    "catalog",
                    format!("duplicate {} address {}", key.0, key.1),
                ));
            }
            entries.insert(key, parameter);
        }
        Ok(Self { entries })
    }

    /// Returns the documented parameter at `(kind, address)`.
    pub fn get(&self, kind: ParameterType, address: u16) -> Option<&Parameter> {
        self.entries.get(&(kind, address))
    }

    /// Number of documented parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is documented.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over documented parameters in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.entries.values()
    }
}

/// Request to back up a contiguous address range of one type.
///
/// Parses from `Type,Start,Count[,MaxBatch]`:
///
/// ```
/// use modbus_sync::{ParameterType, ReadRequest};
///
/// let request: ReadRequest = "holding,2,5,1".parse().unwrap();
/// assert_eq!(request.kind(), ParameterType::HoldingRegister);
/// assert_eq!(request.start(), 2);
/// assert_eq!(request.count(), 5);
/// assert_eq!(request.max_batch(), Some(1));
///
/// assert!("holding,2,0".parse::<ReadRequest>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ReadRequestRecord"))]
pub struct ReadRequest {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    kind: ParameterType,
    start: u16,
    count: u16,
    max_batch: Option<u16>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ReadRequestRecord {
    #[serde(rename = "type")]
    kind: ParameterType,
    start: u16,
    count: u16,
    #[serde(default)]
    max_batch: Option<u16>,
}

#[cfg(feature = "serde")]
impl TryFrom<ReadRequestRecord> for ReadRequest {
    type Error = SyncError;

    fn try_from(record: ReadRequestRecord) -> Result<Self> {
        let request = ReadRequest {
            kind: record.kind,
            start: record.start,
            count: record.count,
            max_batch: record.max_batch,
        };
        request.validate()?;
        Ok(request)
    }
}

impl ReadRequest {
    /// Creates a request for `count` addresses starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if count is 0 or the range runs past 65535.
    pub fn new(kind: ParameterType, start: u16, count: u16) -> Result<Self> {
        let request = Self {
            kind,
            start,
            count,
            max_batch: None,
        };
        request.validate()?;
        Ok(request)
    }

    /// Limits the number of addresses read per window.
    ///
    /// The limit is checked against the protocol ceiling when the request is planned.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if `max_batch` is 0.
    pub fn with_max_batch(mut self, max_batch: u16) -> Result<Self> {
        if max_batch == 0 {
            return Err(SyncError::validation("max batch", "must be greater than 0"));
        }
        self.max_batch = Some(max_batch);
        Ok(self)
    }

    /// Checks count and range bounds.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` on a malformed request.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(SyncError::validation("count", "must be greater than 0"));
        }
        if u32::from(self.start) + u32::from(self.count) > u32::from(u16::MAX) + 1 {
            return Err(SyncError::validation(
                "count",
                format!(
                    "range {}+{} runs past the last address {}",
                    self.start,
                    self.count,
                    u16::MAX
                ),
            ));
        }
        if self.max_batch == Some(0) {
            return Err(SyncError::validation("max batch", "must be greater than 0"));
        }
        Ok(())
    }

    /// Returns the parameter type.
    pub fn kind(&self) -> ParameterType {
        self.kind
    }

    /// Returns the first address.
    pub fn start(&self) -> u16 {
        self.start
    }

    /// Returns the number of addresses.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Returns the per-window limit, if any.
    pub fn max_batch(&self) -> Option<u16> {
        self.max_batch
    }

    /// Iterates over the requested addresses in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = u16> {
        let start = u32::from(self.start);
        (start..start + u32::from(self.count)).map(|address| address as u16)
    }
}

impl FromStr for ReadRequest {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(SyncError::validation(
                "read",
                format!("'{}' must be in the format Type,Start,Count[,MaxBatch]", s),
            ));
        }
        let number = |name: &str, text: &str| -> Result<u16> {
            text.parse::<u16>().map_err(|e| {
                SyncError::validation(name, format!("'{}' is not an address number: {}", text, e))
            })
        };
        let kind = parts[0].parse::<ParameterType>()?;
        let request = ReadRequest::new(kind, number("start", parts[1])?, number("count", parts[2])?)?;
        match parts.get(3) {
            Some(max) => request.with_max_batch(number("max batch", max)?),
            None => Ok(request),
        }
    }
}

impl std::fmt::Display for ReadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.kind, self.start, self.count)?;
        if let Some(max) = self.max_batch {
            write!(f, ",{}", max)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_new_is_bare() {
        let p = Parameter::new(ParameterType::InputRegister, 0);
        assert_eq!(p.kind(), ParameterType::InputRegister);
        assert_eq!(p.address(), 0);
        assert_eq!(p.raw_value(), None);
        assert_eq!(p.value(), None);
        assert_eq!(p.scale(), None);
        assert_eq!(p.offset(), None);
        assert_eq!(p.data_type(), DataType::Uint16);
    }

    #[test]
    fn test_with_raw_value_identity() {
        let p = Parameter::new(ParameterType::InputRegister, 0)
            .with_raw_value(40)
            .unwrap();
        assert_eq!(p.raw_value(), Some(40));
        assert_eq!(p.value(), Some(&BigDecimal::from(40)));
    }

    #[test]
    fn test_with_value_scaled() {
        let p = Parameter::new(ParameterType::HoldingRegister, 7).with_scale(dec("0.1"));
        let set = p.with_value(BigDecimal::from(50)).unwrap();
        assert_eq!(set.raw_value(), Some(500));
        assert_eq!(set.value(), Some(&BigDecimal::from(50)));
        assert_eq!(p.raw_value(), None);
    }

    #[test]
    fn test_with_value_inexact() {
        let p = Parameter::new(ParameterType::HoldingRegister, 7).with_scale(BigDecimal::from(3));
        assert!(p.with_value(BigDecimal::from(11)).unwrap_err().is_arithmetic());
    }

    #[test]
    fn test_raw_range_enforced() {
        let p = Parameter::new(ParameterType::HoldingRegister, 1);
        assert!(p.with_raw_value(-1).unwrap_err().is_validation());
        assert!(p.with_raw_value(65536).is_err());

        let signed = p.clone().with_data_type(DataType::Int16);
        assert_eq!(signed.with_raw_value(-1).unwrap().value(), Some(&BigDecimal::from(-1)));
        assert!(signed.with_raw_value(40000).is_err());
    }

    #[test]
    fn test_coil_helpers() {
        let coil = Parameter::new(ParameterType::Coil, 3);
        assert_eq!(coil.enable().unwrap().raw_value(), Some(1));
        assert_eq!(coil.disable().unwrap().value(), Some(&BigDecimal::from(0)));
        assert!(coil.with_raw_value(2).is_err());

        let register = Parameter::new(ParameterType::HoldingRegister, 3);
        assert!(register.enable().unwrap_err().is_validation());
    }

    #[test]
    fn test_cleared_keeps_metadata() {
        let p = Parameter::new(ParameterType::HoldingRegister, 7)
            .with_identifier("P2111")
            .with_level(Level::Installer)
            .with_scale(dec("0.1"))
            .with_raw_value(500)
            .unwrap();
        let cleared = p.cleared();
        assert_eq!(cleared.raw_value(), None);
        assert_eq!(cleared.value(), None);
        assert_eq!(cleared.identifier(), Some("P2111"));
        assert_eq!(cleared.level(), Some(Level::Installer));
        assert_eq!(cleared.scale(), Some(&dec("0.1")));
    }

    #[test]
    fn test_with_scale_drops_stale_value() {
        let p = Parameter::new(ParameterType::HoldingRegister, 7)
            .with_raw_value(10)
            .unwrap()
            .with_scale(dec("2"));
        assert_eq!(p.value(), None);
    }

    #[test]
    fn test_text_fields() {
        let p = Parameter::new(ParameterType::Coil, 3)
            .with_name("Heating Zone2 enable")
            .with_values("0=Fixed set point, 1=Climatic curve enabled")
            .with_min_value("0")
            .with_max_value("1")
            .with_unit("-");
        assert_eq!(p.name(), Some("Heating Zone2 enable"));
        assert_eq!(p.min_value(), Some("0"));
        assert_eq!(p.max_value(), Some("1"));
        assert_eq!(p.group(), None);
    }

    #[test]
    fn test_expect_type() {
        let p = Parameter::new(ParameterType::DiscreteInput, 0);
        assert!(p.expect_type(ParameterType::DiscreteInput).is_ok());
        assert!(p.expect_type(ParameterType::Coil).is_err());
    }

    #[test]
    fn test_formatted_value() {
        let p = Parameter::new(ParameterType::InputRegister, 0);
        assert_eq!(p.formatted_value(), None);
        assert_eq!(p.with_raw_value(40).unwrap().formatted_value().as_deref(), Some("40"));

        let scaled = p.with_scale(dec("0.25")).with_precision(1);
        assert_eq!(
            scaled.with_raw_value(3).unwrap().formatted_value().as_deref(),
            Some("0.75")
        );
    }

    #[test]
    fn test_display() {
        let p = Parameter::new(ParameterType::InputRegister, 0)
            .with_identifier("P0100")
            .with_unit("°C");
        assert_eq!(p.to_string(), "input@0 P0100 = <unread> °C");
        assert_eq!(
            p.with_raw_value(40).unwrap().to_string(),
            "input@0 P0100 = 40 (raw 40) °C"
        );
    }

    #[test]
    fn test_level_codes() {
        assert_eq!(Level::from_code("I"), Level::Installer);
        assert_eq!(Level::from_code("S"), Level::Service);
        assert_eq!(Level::from_code("?"), Level::User);
        assert_eq!(Level::Service.to_string(), "S");
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = ParameterCatalog::from_parameters(vec![
            Parameter::new(ParameterType::Coil, 1),
            Parameter::new(ParameterType::HoldingRegister, 1),
            Parameter::new(ParameterType::Coil, 1),
        ]);
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ParameterCatalog::from_parameters(vec![
            Parameter::new(ParameterType::Coil, 1).with_identifier("P1"),
            Parameter::new(ParameterType::HoldingRegister, 1).with_identifier("P2"),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(ParameterType::HoldingRegister, 1).and_then(Parameter::identifier),
            Some("P2")
        );
        assert!(catalog.get(ParameterType::InputRegister, 1).is_none());
    }

    #[test]
    fn test_read_request_bounds() {
        assert!(ReadRequest::new(ParameterType::Coil, 0, 0).is_err());
        assert!(ReadRequest::new(ParameterType::Coil, 65535, 1).is_ok());
        assert!(ReadRequest::new(ParameterType::Coil, 65535, 2).is_err());
        assert!(ReadRequest::new(ParameterType::Coil, 0, 1)
            .unwrap()
            .with_max_batch(0)
            .is_err());
    }

    #[test]
    fn test_read_request_addresses() {
        let request = ReadRequest::new(ParameterType::Coil, 65533, 3).unwrap();
        let addresses: Vec<u16> = request.addresses().collect();
        assert_eq!(addresses, vec![65533, 65534, 65535]);
    }

    #[test]
    fn test_read_request_parse() {
        let request: ReadRequest = "coil,0,6".parse().unwrap();
        assert_eq!(request, ReadRequest::new(ParameterType::Coil, 0, 6).unwrap());
        assert_eq!(request.to_string(), "coil,0,6");

        assert!("coil,0".parse::<ReadRequest>().unwrap_err().is_validation());
        assert!("bogus,0,1".parse::<ReadRequest>().is_err());
        assert!("input,-1,1".parse::<ReadRequest>().is_err());
        assert_eq!(
            "discrete, 0, 8, 4".parse::<ReadRequest>().unwrap().to_string(),
            "discrete,0,8,4"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_codes() {
        assert_eq!(
            serde_json::to_string(&ParameterType::HoldingRegister).unwrap(),
            "\"holding\""
        );
        assert_eq!(
            serde_json::to_string(&ParameterType::DiscreteInput).unwrap(),
            "\"discrete\""
        );
        assert_eq!(serde_json::to_string(&Level::Installer).unwrap(), "\"I\"");
        assert_eq!(serde_json::from_str::<Level>("\"S\"").unwrap(), Level::Service);
        assert_eq!(
            serde_json::from_str::<DataType>("\"int16\"").unwrap(),
            DataType::Int16
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_parameter_round_trip() {
        let p = Parameter::new(ParameterType::HoldingRegister, 4)
            .with_identifier("P2300")
            .with_level(Level::Installer)
            .with_scale(dec("0.5"))
            .with_raw_value(10)
            .unwrap();

        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"type\":\"holding\""));
        let back: Parameter = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.value(), Some(&dec("5")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_minimal_parameter() {
        let p: Parameter = serde_json::from_str(r#"{"type":"input","address":3}"#).unwrap();
        assert_eq!(p, Parameter::new(ParameterType::InputRegister, 3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_value_only_encodes_raw() {
        let p: Parameter = serde_json::from_str(
            r#"{"type":"holding","address":4,"value":"5","scale":"0.5"}"#,
        )
        .unwrap();
        assert_eq!(p.raw_value(), Some(10));
        assert_eq!(p.value(), Some(&dec("5")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_inconsistent_parameter() {
        let contradictory = r#"{"type":"holding","address":4,"raw_value":10,"value":"99","scale":"0.5"}"#;
        assert!(serde_json::from_str::<Parameter>(contradictory).is_err());

        let out_of_range = r#"{"type":"coil","address":0,"raw_value":2}"#;
        assert!(serde_json::from_str::<Parameter>(out_of_range).is_err());

        let inexact = r#"{"type":"holding","address":4,"value":"1.25","scale":"0.5"}"#;
        assert!(serde_json::from_str::<Parameter>(inexact).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_read_request() {
        let request: ReadRequest =
            serde_json::from_str(r#"{"type":"holding","start":0,"count":8,"max_batch":4}"#)
                .unwrap();
        assert_eq!(
            request,
            ReadRequest::new(ParameterType::HoldingRegister, 0, 8)
                .unwrap()
                .with_max_batch(4)
                .unwrap()
        );

        assert!(
            serde_json::from_str::<ReadRequest>(r#"{"type":"coil","start":65535,"count":0}"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<ReadRequest>(r#"{"type":"coil","start":65535,"count":2}"#)
                .is_err()
        );
        assert!(serde_json::from_str::<ReadRequest>(
            r#"{"type":"coil","start":0,"count":1,"max_batch":0}"#
        )
        .is_err());
    }
}
