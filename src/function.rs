//! Modbus function code registry.
//!
//! The registry is a static table: it is built at compile time and never
//! mutated. Codes above 127 are reserved for exception replies (request code
//! plus 128) and are therefore never valid request codes.
//!
//! # Example
//!
//! ```
//! use modbus_sync::FunctionCode;
//!
//! let f = FunctionCode::lookup(3).unwrap();
//! assert_eq!(f.name, "Read multiple registers");
//! assert!(f.bulk_read);
//!
//! assert!(FunctionCode::lookup(0).is_err());
//! assert!(FunctionCode::lookup(200).is_err());
//! ```

use crate::error::{Result, SyncError};

/// Highest valid request function code.
pub const MAX_FUNCTION_CODE: u8 = 127;

/// Entry of the function code registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionCode {
    /// Numeric code carried in the PDU (1-127).
    pub code: u8,
    /// Short name.
    pub name: &'static str,
    /// What the function does.
    pub description: &'static str,
    /// Whether the function reads data from the device.
    pub bulk_read: bool,
}

const fn entry(
    code: u8,
    name: &'static str,
    description: &'static str,
    bulk_read: bool,
) -> FunctionCode {
    FunctionCode {
        code,
        name,
        description,
        bulk_read,
    }
}

impl FunctionCode {
    /// Read Coils (0x01).
    pub const READ_COILS: FunctionCode = entry(
        1,
        "Read multiple coils",
        "Read the ON/OFF status of discrete outputs (coils).",
        true,
    );
    /// Read Discrete Inputs (0x02).
    pub const READ_DISCRETE_INPUTS: FunctionCode = entry(
        2,
        "Read multiple discrete inputs",
        "Read the ON/OFF status of discrete inputs.",
        true,
    );
    /// Read Holding Registers (0x03).
    pub const READ_HOLDING_REGISTERS: FunctionCode = entry(
        3,
        "Read multiple registers",
        "Read the binary contents of holding registers.",
        true,
    );
    /// Read Input Registers (0x04).
    pub const READ_INPUT_REGISTERS: FunctionCode = entry(
        4,
        "Read multiple input registers",
        "Read the binary contents of input registers.",
        true,
    );
    /// Write Single Coil (0x05).
    pub const WRITE_SINGLE_COIL: FunctionCode = entry(
        5,
        "Write single coil",
        "Write a single coil to either ON or OFF.",
        false,
    );
    /// Write Single Register (0x06).
    pub const WRITE_SINGLE_REGISTER: FunctionCode = entry(
        6,
        "Write single register",
        "Write a single holding register.",
        false,
    );
    /// Write Multiple Coils (0x0F).
    pub const WRITE_MULTIPLE_COILS: FunctionCode = entry(
        15,
        "Write multiple coils",
        "Write multiple coils in a sequence.",
        false,
    );
    /// Write Multiple Registers (0x10).
    pub const WRITE_MULTIPLE_REGISTERS: FunctionCode = entry(
        16,
        "Write multiple registers",
        "Write multiple holding registers in a sequence.",
        false,
    );

    /// Looks up a function code in the registry.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if the code is 0, above 127, or not a
    /// known function.
    pub fn lookup(code: u8) -> Result<FunctionCode> {
        if code == 0 || code > MAX_FUNCTION_CODE {
            return Err(SyncError::validation(
                "function code",
                format!("{} is outside 1-{}", code, MAX_FUNCTION_CODE),
            ));
        }
        REGISTRY
            .iter()
            .find(|f| f.code == code)
            .copied()
            .ok_or_else(|| SyncError::validation("function code", format!("{} is not known", code)))
    }

    /// Returns every registered function code, ordered by code.
    pub fn all() -> &'static [FunctionCode] {
        REGISTRY
    }
}

impl std::fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "F{:02} {}", self.code, self.name)
    }
}

static REGISTRY: &[FunctionCode] = &[
    FunctionCode::READ_COILS,
    FunctionCode::READ_DISCRETE_INPUTS,
    FunctionCode::READ_HOLDING_REGISTERS,
    FunctionCode::READ_INPUT_REGISTERS,
    FunctionCode::WRITE_SINGLE_COIL,
    FunctionCode::WRITE_SINGLE_REGISTER,
    entry(
        7,
        "Read exception status",
        "Read the status of eight Exception Status outputs in a remote device.",
        true,
    ),
    entry(8, "Diagnostics", "Perform diagnostic operations on the Modbus network.", true),
    entry(
        11,
        "Get comm event counter",
        "Read the communication event counter from the remote device.",
        true,
    ),
    entry(
        12,
        "Get comm event log",
        "Read the communication event log from the remote device.",
        true,
    ),
    entry(
        13,
        "Read device identification (MEI transport)",
        "More comprehensive device identification mechanism.",
        true,
    ),
    entry(
        14,
        "Read device identification",
        "Access to the device identification and additional information.",
        true,
    ),
    FunctionCode::WRITE_MULTIPLE_COILS,
    FunctionCode::WRITE_MULTIPLE_REGISTERS,
    entry(17, "Report server ID", "Report the server (slave) identity.", true),
    entry(
        20,
        "Read file record",
        "Read File Record, for accessing the device's file system.",
        true,
    ),
    entry(
        21,
        "Write file record",
        "Write File Record, for accessing the device's file system.",
        false,
    ),
    entry(
        22,
        "Mask write register",
        "Modify a holding register by applying bitwise AND and OR masks to its current value.",
        false,
    ),
    entry(
        23,
        "Read/write multiple registers",
        "Read from and write to holding registers in a single atomic operation.",
        false,
    ),
    entry(
        24,
        "Read FIFO queue",
        "Read the contents of a First-In-First-Out queue of registers.",
        true,
    ),
    entry(
        43,
        "Encapsulated interface transport",
        "Access to the device identification and additional information.",
        true,
    ),
];
