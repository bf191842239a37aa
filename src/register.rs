//! Parameter type definitions.
//!
//! This module defines the [`ParameterType`] enum, the closed set of Modbus
//! data tables a parameter can live in, and the static metadata attached to
//! each of them.
//!
//! # Parameter Types Overview
//!
//! | Type | Code | Bits | Read | Write single | Write multiple |
//! |------|------|:----:|:----:|:------------:|:--------------:|
//! | Coil | `coil` | 1 | F01 | F05 | F15 |
//! | Discrete input | `discrete` | 1 | F02 | - | - |
//! | Holding register | `holding` | 16 | F03 | F06 | F16 |
//! | Input register | `input` | 16 | F04 | - | - |
//!
//! # Example
//!
//! ```
//! use modbus_sync::{DataType, ParameterType};
//!
//! let info = ParameterType::HoldingRegister.describe();
//! assert_eq!(info.bit_width, 16);
//! assert_eq!(info.read.code, 3);
//! assert_eq!(info.data_type, DataType::Uint16);
//!
//! assert!(ParameterType::Coil.is_writable());
//! assert!(!ParameterType::DiscreteInput.is_writable());
//!
//! assert_eq!("holding".parse::<ParameterType>().unwrap(), ParameterType::HoldingRegister);
//! ```

use std::str::FromStr;

use crate::error::{Result, SyncError};
use crate::function::FunctionCode;

/// Modbus data tables a parameter can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParameterType {
    /// Single-bit read-write output.
    #[cfg_attr(feature = "serde", serde(rename = "coil"))]
    Coil,
    /// Single-bit read-only input.
    #[cfg_attr(feature = "serde", serde(rename = "discrete"))]
    DiscreteInput,
    /// 16-bit read-write register.
    #[cfg_attr(feature = "serde", serde(rename = "holding"))]
    HoldingRegister,
    /// 16-bit read-only register.
    #[cfg_attr(feature = "serde", serde(rename = "input"))]
    InputRegister,
}

/// Static metadata of a [`ParameterType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    /// Width of one addressable item on the wire (1 or 16).
    pub bit_width: u8,
    /// Bulk read function.
    pub read: FunctionCode,
    /// Single-item write function, if the type is writable.
    pub write_single: Option<FunctionCode>,
    /// Multi-item write function, if the type is writable.
    pub write_multiple: Option<FunctionCode>,
    /// Data type assumed when a parameter declares none.
    pub data_type: DataType,
}

impl ParameterType {
    /// Every parameter type, in table order.
    pub const ALL: [ParameterType; 4] = [
        ParameterType::Coil,
        ParameterType::DiscreteInput,
        ParameterType::HoldingRegister,
        ParameterType::InputRegister,
    ];

    /// Returns the static metadata of this type.
    pub fn describe(self) -> TypeInfo {
        match self {
            ParameterType::Coil => TypeInfo {
                bit_width: 1,
                read: FunctionCode::READ_COILS,
                write_single: Some(FunctionCode::WRITE_SINGLE_COIL),
                write_multiple: Some(FunctionCode::WRITE_MULTIPLE_COILS),
                data_type: DataType::Bool,
            },
            ParameterType::DiscreteInput => TypeInfo {
                bit_width: 1,
                read: FunctionCode::READ_DISCRETE_INPUTS,
                write_single: None,
                write_multiple: None,
                data_type: DataType::Bool,
            },
            ParameterType::HoldingRegister => TypeInfo {
                bit_width: 16,
                read: FunctionCode::READ_HOLDING_REGISTERS,
                write_single: Some(FunctionCode::WRITE_SINGLE_REGISTER),
                write_multiple: Some(FunctionCode::WRITE_MULTIPLE_REGISTERS),
                data_type: DataType::Uint16,
            },
            ParameterType::InputRegister => TypeInfo {
                bit_width: 16,
                read: FunctionCode::READ_INPUT_REGISTERS,
                write_single: None,
                write_multiple: None,
                data_type: DataType::Uint16,
            },
        }
    }

    /// Returns whether parameters of this type can be written.
    pub fn is_writable(self) -> bool {
        let info = self.describe();
        info.write_single.is_some() || info.write_multiple.is_some()
    }

    /// Returns whether this type carries single bits.
    pub fn is_bit(self) -> bool {
        self.describe().bit_width == 1
    }

    /// Short code used in configuration and request strings.
    pub fn code(self) -> &'static str {
        match self {
            ParameterType::Coil => "coil",
            ParameterType::DiscreteInput => "discrete",
            ParameterType::HoldingRegister => "holding",
            ParameterType::InputRegister => "input",
        }
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ParameterType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        ParameterType::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SyncError::validation(
                    "type",
                    format!("'{}' is not one of coil,discrete,holding,input", s),
                )
            })
    }
}

/// Declared interpretation of a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataType {
    /// 0/1 bit.
    Bool,
    /// Unsigned 16-bit word (0..=65535).
    Uint16,
    /// Two's complement 16-bit word (-32768..=32767).
    Int16,
    /// Not declared; the type default applies.
    #[default]
    Unknown,
}

impl DataType {
    /// Resolves `Unknown` to the default data type of `kind`.
    pub fn resolve(self, kind: ParameterType) -> DataType {
        match self {
            DataType::Unknown => kind.describe().data_type,
            other => other,
        }
    }

    /// Inclusive range of raw values representable with this data type.
    pub fn raw_range(self) -> (i32, i32) {
        match self {
            DataType::Bool => (0, 1),
            DataType::Int16 => (i16::MIN as i32, i16::MAX as i32),
            DataType::Uint16 | DataType::Unknown => (0, u16::MAX as i32),
        }
    }
}

impl FromStr for DataType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "bool" => DataType::Bool,
            "uint16" => DataType::Uint16,
            "int16" => DataType::Int16,
            _ => DataType::Unknown,
        })
    }
}
