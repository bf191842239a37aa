//! Example: Backing up and restoring heat pump parameters
//!
//! Run with: cargo run --example backup
//! Set RUST_LOG=debug to see every window read.
//!
//! This example demonstrates:
//! - Building a parameter catalog
//! - Backing up address ranges, documented or not
//! - Writing a set point and handling a clamped acknowledgement
//! - Refreshing a sparse set of parameters

use bigdecimal::BigDecimal;
use modbus_sync::{
    BackupOrchestrator, Level, MemoryTransport, Parameter, ParameterCatalog, ParameterType,
    ReadRequest, SyncConfig, SyncError,
};
use std::str::FromStr;

fn decimal(s: &str) -> modbus_sync::Result<BigDecimal> {
    BigDecimal::from_str(s).map_err(|e| SyncError::validation("decimal", e.to_string()))
}

fn main() -> modbus_sync::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // =========================================================================
    // Simulated device
    // =========================================================================

    let mut slave = MemoryTransport::new();
    slave.set_bits(ParameterType::Coil, 0, &[true, false, true, false, false, true]);
    slave.set_words(ParameterType::InputRegister, 0, &[40, 25]);
    slave.set_words(ParameterType::HoldingRegister, 0, &[2, 1, 420, 350, 0xFFEC, 0, 1, 380]);
    slave.clamp_writes(ParameterType::HoldingRegister, 7, 200, 550);

    // =========================================================================
    // Parameter catalog
    // =========================================================================

    let catalog = ParameterCatalog::from_parameters(vec![
        Parameter::new(ParameterType::Coil, 0)
            .with_identifier("P0010")
            .with_name("Heating enable")
            .with_values("0=off, 1=on")
            .with_level(Level::User),
        Parameter::new(ParameterType::InputRegister, 0)
            .with_identifier("P0100")
            .with_name("Outdoor temperature")
            .with_unit("°C"),
        Parameter::new(ParameterType::HoldingRegister, 2)
            .with_identifier("P2100")
            .with_name("Heating zone 1 set point")
            .with_unit("°C")
            .with_scale(decimal("0.1")?)
            .with_precision(1)
            .with_level(Level::Installer),
        Parameter::new(ParameterType::HoldingRegister, 4)
            .with_identifier("P2300")
            .with_name("Climatic curve offset")
            .with_unit("K")
            .with_data_type("int16".parse()?)
            .with_scale(decimal("0.5")?),
        Parameter::new(ParameterType::HoldingRegister, 7)
            .with_identifier("P2111")
            .with_name("Heating zone 2 fixed outgoing water set point")
            .with_unit("°C")
            .with_scale(decimal("0.1")?)
            .with_min_value("20")
            .with_max_value("55")
            .with_level(Level::Installer),
    ])?;

    // =========================================================================
    // Backup
    // =========================================================================

    let requests = ["coil,0,6", "input,0,2", "holding,0,8,4"]
        .iter()
        .map(|s| s.parse::<ReadRequest>())
        .collect::<modbus_sync::Result<Vec<_>>>()?;

    let mut sync = BackupOrchestrator::connect(slave, &SyncConfig::default())?;
    let backup = sync.run_backup(&requests, &catalog)?;

    println!("=== Backup ({} parameters) ===\n", backup.len());
    for parameter in &backup {
        println!("{}", parameter);
    }

    // =========================================================================
    // Restore a set point
    // =========================================================================

    println!("\n=== Write ===\n");

    let setpoint = backup
        .iter()
        .find(|p| p.identifier() == Some("P2111"))
        .cloned()
        .unwrap_or_else(|| Parameter::new(ParameterType::HoldingRegister, 7));

    let written = sync.run_write(&setpoint, &decimal("60")?)?;
    println!("Requested 60, device kept {}", written);

    match sync.run_write(&setpoint, &decimal("38.25")?) {
        Ok(p) => println!("Unexpected: {}", p),
        Err(e) => println!("Rejected: {}", e),
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    println!("\n=== Refresh ===\n");

    let watched: Vec<Parameter> = backup
        .iter()
        .filter(|p| p.identifier().is_some())
        .cloned()
        .collect();
    for parameter in sync.read_all(&watched)? {
        println!(
            "{:<6} {:<48} {:>8} {}",
            parameter.identifier().unwrap_or("-"),
            parameter.name().unwrap_or(""),
            parameter.formatted_value().unwrap_or_default(),
            parameter.unit().unwrap_or("")
        );
    }

    sync.close()
}
