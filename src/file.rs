use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::MeasurementInput;

/// Read a TOML measurement file.
///
/// Keys mirror the command-line flags (`tx`, `rx_dbm`, `fiber_length`, ...).
/// Unknown keys are rejected so a typo cannot silently drop a field.
pub fn load_measurement(path: &Path) -> Result<MeasurementInput, Box<dyn std::error::Error>> {
    info!(path = %path.display(), "loading measurement file");
    let content = fs::read_to_string(path)
        .map_err(|err| format!("could not read measurement file {}: {err}", path.display()))?;
    let measurement = parse_measurement(&content)?;
    debug!(%measurement, "parsed measurement file");
    Ok(measurement)
}

pub fn parse_measurement(content: &str) -> Result<MeasurementInput, toml::de::Error> {
    toml::from_str(content)
}
