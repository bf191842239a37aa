//! Backup, restore and bulk refresh of device parameters.
//!
//! A [`BackupOrchestrator`] owns one transport for the duration of a run. The
//! connection is opened by [`BackupOrchestrator::connect`] and closed either by
//! [`close`](BackupOrchestrator::close) or, on any other exit path, when the
//! orchestrator is dropped.
//!
//! All operations are sequential: one request on the wire at a time, in the
//! order the caller supplied. No operation retries; the first error aborts it.
//!
//! # Example
//!
//! ```
//! use bigdecimal::BigDecimal;
//! use modbus_sync::{
//!     BackupOrchestrator, MemoryTransport, Parameter, ParameterCatalog, ParameterType,
//!     ReadRequest, SyncConfig,
//! };
//! use std::str::FromStr;
//!
//! let mut slave = MemoryTransport::new();
//! slave.set_words(ParameterType::HoldingRegister, 2, &[10, 20, 30, 40, 50]);
//!
//! let catalog = ParameterCatalog::from_parameters(vec![
//!     Parameter::new(ParameterType::HoldingRegister, 4)
//!         .with_scale(BigDecimal::from_str("0.5").unwrap()),
//! ])
//! .unwrap();
//! let requests = vec!["holding,2,5".parse::<ReadRequest>().unwrap()];
//!
//! let mut sync = BackupOrchestrator::connect(slave, &SyncConfig::default()).unwrap();
//! let backup = sync.run_backup(&requests, &catalog).unwrap();
//!
//! assert_eq!(backup.len(), 5);
//! assert_eq!(backup[2].value(), Some(&BigDecimal::from(15)));
//! assert_eq!(backup[0].value(), Some(&BigDecimal::from(10)));
//!
//! let written = sync.run_write(&backup[2], &BigDecimal::from(20)).unwrap();
//! assert_eq!(written.raw_value(), Some(40));
//! sync.close().unwrap();
//! ```

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use tracing::{debug, info, warn};

use crate::codec::bool_to_raw;
use crate::config::SyncConfig;
use crate::error::{Result, SyncError, TransportError};
use crate::executor::ReadExecutor;
use crate::merge::merge;
use crate::parameter::{Parameter, ParameterCatalog, ReadRequest};
use crate::planner::BatchPlanner;
use crate::register::ParameterType;
use crate::transport::Transport;
use crate::utils::{raw_to_wire, reinterpret, wire_to_raw};

/// Runs backups, writes and refreshes against one connected device.
pub struct BackupOrchestrator<T: Transport> {
    transport: T,
    planner: BatchPlanner,
    connected: bool,
}

impl<T: Transport> BackupOrchestrator<T> {
    /// Connects `transport` and prepares a run with `config`.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` for an unusable configuration (checked
    /// before connecting) and `SyncError::Transport` if the connection fails.
    pub fn connect(mut transport: T, config: &SyncConfig) -> Result<Self> {
        let planner = config.planner()?;
        transport.connect()?;
        info!(
            max_frame_bytes = planner.max_frame_bytes(),
            header_bytes = planner.header_bytes(),
            "Connected to device"
        );
        Ok(Self {
            transport,
            planner,
            connected: true,
        })
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the planner used for reads.
    pub fn planner(&self) -> &BatchPlanner {
        &self.planner
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Transport` if the transport fails to disconnect.
    pub fn close(mut self) -> Result<()> {
        self.connected = false;
        self.transport.disconnect()?;
        info!("Disconnected from device");
        Ok(())
    }

    /// Backs up every address of every request.
    ///
    /// Each request is merged against `catalog`, read, and decoded. Results are
    /// concatenated in request order; an address covered by two requests shows
    /// up twice.
    ///
    /// # Errors
    ///
    /// Fails on the first request that cannot be planned, read, or decoded.
    pub fn run_backup(
        &mut self,
        requests: &[ReadRequest],
        catalog: &ParameterCatalog,
    ) -> Result<Vec<Parameter>> {
        let mut backup = Vec::new();
        for request in requests {
            info!(request = %request, "Backing up range");
            let skeletons = merge(catalog, request);
            let raw = ReadExecutor::new(&mut self.transport, &self.planner).read(
                request.kind(),
                request.start(),
                u32::from(request.count()),
                request.max_batch(),
            )?;
            for (skeleton, raw) in skeletons.iter().zip(raw) {
                backup.push(decode(skeleton, raw)?);
            }
        }
        Ok(backup)
    }

    /// Writes `value` to `parameter` and returns the parameter as acknowledged.
    ///
    /// The value is encoded through the parameter's scale and offset. The
    /// returned parameter carries the device's acknowledgement, which may
    /// differ from `value` if the device clamped it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::UnsupportedOperation` for read-only types,
    /// `SyncError::Arithmetic` if `value` has no exact raw value,
    /// `SyncError::Validation` if the raw value does not fit, and
    /// `SyncError::Transport` if the write fails.
    pub fn run_write(&mut self, parameter: &Parameter, value: &BigDecimal) -> Result<Parameter> {
        ensure_writable(parameter)?;
        let raw = parameter.codec().encode(value)?;
        self.write_raw(parameter, raw)
    }

    /// Writes a raw value to `parameter`, bypassing scale and offset.
    ///
    /// # Errors
    ///
    /// Same as [`run_write`](Self::run_write), minus the arithmetic check.
    pub fn write_raw(&mut self, parameter: &Parameter, raw: i32) -> Result<Parameter> {
        let function = ensure_writable(parameter)?;
        let kind = parameter.kind();
        let data_type = parameter.data_type();
        let wire = raw_to_wire(kind, data_type, raw)?;

        let ack = self
            .transport
            .write_single(kind, parameter.address(), wire)?;
        let acknowledged = wire_to_raw(kind, data_type, ack)?;

        if acknowledged != raw {
            warn!(
                kind = %kind,
                address = parameter.address(),
                requested = raw,
                acknowledged,
                "Device acknowledged a different value"
            );
        }
        info!(
            function = %function,
            address = parameter.address(),
            raw = acknowledged,
            "Wrote parameter"
        );
        parameter.with_raw_value(acknowledged)
    }

    /// Switches a coil on or off.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` if `parameter` is not a coil, otherwise
    /// fails like [`write_raw`](Self::write_raw).
    pub fn write_bool(&mut self, parameter: &Parameter, bit: bool) -> Result<Parameter> {
        parameter.expect_type(ParameterType::Coil)?;
        self.write_raw(parameter, bool_to_raw(bit))
    }

    /// Reads the current value of one parameter.
    ///
    /// # Errors
    ///
    /// Fails like [`read_all`](Self::read_all).
    pub fn read(&mut self, parameter: &Parameter) -> Result<Parameter> {
        let raw = ReadExecutor::new(&mut self.transport, &self.planner).read(
            parameter.kind(),
            parameter.address(),
            1,
            None,
        )?;
        match raw.first() {
            Some(raw) => decode(parameter, *raw),
            None => Err(TransportError::malformed("empty read").into()),
        }
    }

    /// Refreshes the values of an existing, possibly sparse, set of parameters.
    ///
    /// Parameters are grouped by type; each group is read as one contiguous
    /// range from its lowest to its highest address, even if most addresses in
    /// between are not wanted. Groups are read in order of first appearance and
    /// the result keeps the order of `parameters`. Only value fields change.
    ///
    /// # Errors
    ///
    /// Fails on the first group that cannot be read or decoded; nothing is
    /// returned for groups already read.
    pub fn read_all(&mut self, parameters: &[Parameter]) -> Result<Vec<Parameter>> {
        let mut groups: Vec<(ParameterType, u16, u16)> = Vec::new();
        for parameter in parameters {
            let address = parameter.address();
            match groups.iter_mut().find(|(kind, _, _)| *kind == parameter.kind()) {
                Some((_, min, max)) => {
                    *min = (*min).min(address);
                    *max = (*max).max(address);
                }
                None => groups.push((parameter.kind(), address, address)),
            }
        }

        let mut buffers: HashMap<ParameterType, (u16, Vec<i32>)> = HashMap::new();
        for (kind, min, max) in groups {
            let count = u32::from(max) - u32::from(min) + 1;
            info!(kind = %kind, min, max, count, "Reading parameter group");
            let raw = ReadExecutor::new(&mut self.transport, &self.planner)
                .read(kind, min, count, None)?;
            buffers.insert(kind, (min, raw));
        }

        let mut refreshed = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let raw = buffers.get(&parameter.kind()).and_then(|(min, raw)| {
                raw.get(usize::from(parameter.address() - min)).copied()
            });
            match raw {
                Some(raw) => refreshed.push(decode(parameter, raw)?),
                None => {
                    return Err(SyncError::validation(
                        "read",
                        format!("no value read for {}", parameter),
                    ))
                }
            }
        }
        debug!(count = refreshed.len(), "Refreshed parameters");
        Ok(refreshed)
    }
}

impl<T: Transport> Drop for BackupOrchestrator<T> {
    fn drop(&mut self) {
        if !self.connected {
            return;
        }
        match self.transport.disconnect() {
            Ok(()) => info!("Disconnected from device"),
            Err(e) => warn!(error = %e, "Failed to disconnect from device"),
        }
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for BackupOrchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupOrchestrator")
            .field("transport", &self.transport)
            .field("planner", &self.planner)
            .field("connected", &self.connected)
            .finish()
    }
}

fn ensure_writable(parameter: &Parameter) -> Result<crate::function::FunctionCode> {
    parameter
        .kind()
        .describe()
        .write_single
        .ok_or_else(|| SyncError::unsupported("write", parameter.kind()))
}

fn decode(parameter: &Parameter, raw: i32) -> Result<Parameter> {
    parameter.with_raw_value(reinterpret(raw, parameter.data_type()))
}
