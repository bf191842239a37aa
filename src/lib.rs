//! # Modbus Parameter Sync
//!
//! A Rust library for backing up, restoring and refreshing the documented
//! parameters of a Modbus slave (heat pumps, inverters, controllers).
//!
//! This is a **protocol-agnostic** engine: it never builds frames or opens
//! sockets. Devices are reached through the [`Transport`] trait, which exposes a
//! single-window read and a single-item write. Everything above that line lives
//! here: splitting ranges into frame-sized windows, merging device tables with a
//! parameter catalog, exact scale/offset conversion and write acknowledgement
//! handling.
//!
//! ## Features
//!
//! - **Exact arithmetic**: engineering values are arbitrary-precision decimals;
//!   a value that has no exact raw representation is an error, never rounded
//! - **Deterministic**: one request on the wire at a time, in ascending order
//! - **Type-safe**: parameter types as enums with a static metadata table
//! - **No panics**: all errors returned as `Result<T, SyncError>`
//! - **Testable**: [`MemoryTransport`] simulates a slave with fault injection
//!
//! ## Quick Start
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use modbus_sync::{
//!     BackupOrchestrator, MemoryTransport, Parameter, ParameterCatalog, ParameterType,
//!     ReadRequest, SyncConfig,
//! };
//! use std::str::FromStr;
//!
//! fn main() -> modbus_sync::Result<()> {
//!     let mut slave = MemoryTransport::new();
//!     slave.set_words(ParameterType::InputRegister, 0, &[215, 482]);
//!
//!     // Documented parameters, usually produced by a table parser
//!     let catalog = ParameterCatalog::from_parameters(vec![
//!         Parameter::new(ParameterType::InputRegister, 0)
//!             .with_identifier("P0100")
//!             .with_name("Outdoor temperature")
//!             .with_unit("°C")
//!             .with_scale(BigDecimal::from_str("0.1").unwrap()),
//!     ])?;
//!
//!     let requests: Vec<ReadRequest> = vec!["input,0,2".parse()?];
//!
//!     let mut sync = BackupOrchestrator::connect(slave, &SyncConfig::default())?;
//!     let backup = sync.run_backup(&requests, &catalog)?;
//!     sync.close()?;
//!
//!     assert_eq!(backup[0].formatted_value().as_deref(), Some("21.5"));
//!     // Undocumented addresses are backed up as-is
//!     assert_eq!(backup[1].value(), Some(&BigDecimal::from(482)));
//!     Ok(())
//! }
//! ```
//!
//! ## Parameter Types
//!
//! | Type | Code | Width | Read | Write |
//! |------|------|:-----:|:----:|:-----:|
//! | [`ParameterType::Coil`] | `coil` | 1 bit | F01 | F05 |
//! | [`ParameterType::DiscreteInput`] | `discrete` | 1 bit | F02 | ✗ |
//! | [`ParameterType::HoldingRegister`] | `holding` | 16 bits | F03 | F06 |
//! | [`ParameterType::InputRegister`] | `input` | 16 bits | F04 | ✗ |
//!
//! ## Core Operations
//!
//! ### Backup
//!
//! [`BackupOrchestrator::run_backup`] reads every address of each
//! [`ReadRequest`] and decodes it with the catalog entry for that address, or
//! as a plain integer if there is none.
//!
//! ### Write
//!
//! ```
//! # use bigdecimal::BigDecimal;
//! # use modbus_sync::{BackupOrchestrator, MemoryTransport, Parameter, ParameterType, SyncConfig};
//! # use std::str::FromStr;
//! let mut slave = MemoryTransport::new();
//! // The device limits this set point to 60 raw
//! slave.clamp_writes(ParameterType::HoldingRegister, 7, 0, 60);
//! let mut sync = BackupOrchestrator::connect(slave, &SyncConfig::default())?;
//!
//! let setpoint = Parameter::new(ParameterType::HoldingRegister, 7)
//!     .with_scale(BigDecimal::from_str("0.5").unwrap());
//!
//! // Encoded to raw 90, acknowledged as 60
//! let written = sync.run_write(&setpoint, &BigDecimal::from(45))?;
//! assert_eq!(written.value(), Some(&BigDecimal::from(30)));
//!
//! // Coils
//! let pump = Parameter::new(ParameterType::Coil, 0);
//! assert_eq!(sync.write_bool(&pump, true)?.raw_value(), Some(1));
//! # Ok::<(), modbus_sync::SyncError>(())
//! ```
//!
//! ### Refresh
//!
//! [`BackupOrchestrator::read_all`] re-reads an arbitrary set of parameters
//! with one contiguous read per parameter type.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, SyncError>`]. Transport failures are
//! passed through unchanged:
//!
//! ```
//! use modbus_sync::simulator::Fault;
//! use modbus_sync::{
//!     BackupOrchestrator, MemoryTransport, ParameterCatalog, ParameterType, SyncConfig,
//!     SyncError, TransportError,
//! };
//!
//! let mut slave = MemoryTransport::new();
//! slave.inject_fault(ParameterType::HoldingRegister, 3, Fault::Exception(0x02));
//! let mut sync = BackupOrchestrator::connect(slave, &SyncConfig::default()).unwrap();
//!
//! match sync.run_backup(&["holding,0,5".parse().unwrap()], &ParameterCatalog::new()) {
//!     Ok(backup) => println!("{} parameters", backup.len()),
//!     Err(SyncError::Transport(TransportError::Exception { function, code })) => {
//!         println!("Device refused F{:02}: 0x{:02X}", function, code);
//!     }
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! The library emits [`tracing`] events (window reads at `debug`, backups and
//! writes at `info`, clamped writes at `warn`) and never installs a subscriber.
//!
//! ## Configuration
//!
//! ```
//! use modbus_sync::SyncConfig;
//!
//! let config = SyncConfig::new()
//!     .with_max_frame_bytes(128)   // Gateway frame limit (default: 256)
//!     .with_header_bytes(6);       // Per-frame overhead (default: 6)
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod codec;
mod config;
mod error;
mod executor;
mod function;
mod merge;
mod orchestrator;
mod parameter;
mod planner;
mod register;
pub mod simulator;
mod transport;
pub mod utils;

// Public re-exports
pub use codec::ValueCodec;
pub use config::SyncConfig;
pub use error::{exception_description, Result, SyncError, TransportError};
pub use executor::ReadExecutor;
pub use function::{FunctionCode, MAX_FUNCTION_CODE};
pub use merge::merge;
pub use orchestrator::BackupOrchestrator;
pub use parameter::{Level, Parameter, ParameterCatalog, ReadRequest};
pub use planner::{BatchPlanner, Window, DEFAULT_HEADER_BYTES, DEFAULT_MAX_FRAME_BYTES};
pub use register::{DataType, ParameterType, TypeInfo};
pub use simulator::MemoryTransport;
pub use transport::{Transport, TransportResult, WindowData, WireValue};
