//! Error types for the synchronization engine.
//!
//! Two layers of errors exist:
//!
//! - [`TransportError`] is what a [`Transport`](crate::Transport) implementation
//!   reports: I/O failures, timeouts, device exception replies and malformed
//!   responses.
//! - [`SyncError`] is what every engine operation returns. Transport failures are
//!   wrapped as [`SyncError::Transport`] without being rewritten, so callers can
//!   still match on the original cause.

use std::io;
use thiserror::Error;

use crate::register::ParameterType;

/// Result type alias for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while reading, converting or writing parameters.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed request or configuration. Never retried.
    #[error("Invalid parameter '{parameter}': {reason}")]
    Validation {
        /// Name of the offending input.
        parameter: String,
        /// Description of why the input is invalid.
        reason: String,
    },

    /// A scale/offset conversion is not exactly representable.
    #[error("Inexact conversion of {value}: {reason}")]
    Arithmetic {
        /// The value that could not be converted.
        value: String,
        /// Description of the conversion failure.
        reason: String,
    },

    /// Failure reported by the transport, propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Operation not available for the parameter type (e.g. writing an input register).
    #[error("Unsupported operation '{operation}' on {kind} parameter")]
    UnsupportedOperation {
        /// Name of the rejected operation.
        operation: String,
        /// Type of the parameter the operation was attempted on.
        kind: ParameterType,
    },
}

impl SyncError {
    /// Creates a new `Validation` error.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_sync::SyncError;
    ///
    /// let err = SyncError::validation("count", "must be greater than 0");
    /// assert!(err.is_validation());
    /// ```
    pub fn validation(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `Arithmetic` error.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_sync::SyncError;
    ///
    /// let err = SyncError::arithmetic("11", "not divisible by scale 3");
    /// assert!(err.is_arithmetic());
    /// ```
    pub fn arithmetic(value: impl ToString, reason: impl Into<String>) -> Self {
        Self::Arithmetic {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a new `UnsupportedOperation` error.
    pub fn unsupported(operation: impl Into<String>, kind: ParameterType) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            kind,
        }
    }

    /// Returns `true` for [`SyncError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` for [`SyncError::Arithmetic`].
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Self::Arithmetic { .. })
    }

    /// Returns `true` for [`SyncError::Transport`].
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` for [`SyncError::UnsupportedOperation`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }
}

/// Errors reported by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The device did not answer in time.
    #[error("Communication timeout")]
    Timeout,

    /// I/O error during communication.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The device answered with an exception reply.
    #[error(
        "Device exception 0x{code:02X} ({}) for function 0x{function:02X}",
        describe_exception(.code)
    )]
    Exception {
        /// Function code of the rejected request.
        function: u8,
        /// Exception code returned by the device.
        code: u8,
    },

    /// The response could not be interpreted.
    #[error("Malformed response: {reason}")]
    MalformedResponse {
        /// Description of the response error.
        reason: String,
    },

    /// An operation was attempted before `connect` or after `disconnect`.
    #[error("Transport not connected")]
    NotConnected,
}

impl TransportError {
    /// Creates a new `Exception` error.
    ///
    /// # Example
    ///
    /// ```
    /// use modbus_sync::TransportError;
    ///
    /// let err = TransportError::exception(0x03, 0x02);
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Device exception 0x02 (Illegal data address) for function 0x03"
    /// );
    /// ```
    pub fn exception(function: u8, code: u8) -> Self {
        Self::Exception { function, code }
    }

    /// Creates a new `MalformedResponse` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}

fn describe_exception(code: &u8) -> &'static str {
    exception_description(*code)
}

/// Returns a human-readable description of a Modbus exception code.
///
/// # Example
///
/// ```
/// use modbus_sync::exception_description;
///
/// assert_eq!(exception_description(0x01), "Illegal function");
/// assert_eq!(exception_description(0x7F), "Unknown exception");
/// ```
pub fn exception_description(code: u8) -> &'static str {
    match code {
        0x01 => "Illegal function",
        0x02 => "Illegal data address",
        0x03 => "Illegal data value",
        0x04 => "Server device failure",
        0x05 => "Acknowledge",
        0x06 => "Server device busy",
        0x08 => "Memory parity error",
        0x0A => "Gateway path unavailable",
        0x0B => "Gateway target device failed to respond",
        _ => "Unknown exception",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = SyncError::validation("count", "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'count': must be greater than 0"
        );
    }

    #[test]
    fn test_arithmetic_display() {
        let err = SyncError::arithmetic(11, "quotient by scale 3 is not exact");
        assert_eq!(
            err.to_string(),
            "Inexact conversion of 11: quotient by scale 3 is not exact"
        );
    }

    #[test]
    fn test_unsupported_display() {
        let err = SyncError::unsupported("write", ParameterType::InputRegister);
        assert_eq!(
            err.to_string(),
            "Unsupported operation 'write' on input parameter"
        );
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_transport_is_transparent() {
        let err: SyncError = TransportError::Timeout.into();
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Communication timeout");
        assert!(matches!(err, SyncError::Transport(TransportError::Timeout)));
    }

    #[test]
    fn test_exception_display() {
        let err = TransportError::exception(0x06, 0x04);
        assert_eq!(
            err.to_string(),
            "Device exception 0x04 (Server device failure) for function 0x06"
        );
    }

    #[test]
    fn test_exception_descriptions() {
        assert_eq!(exception_description(0x02), "Illegal data address");
        assert_eq!(exception_description(0x0B), "Gateway target device failed to respond");
        assert_eq!(exception_description(0x07), "Unknown exception");
    }
}
