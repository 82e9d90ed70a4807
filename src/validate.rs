//! Input validation.
//!
//! Every rule is checked before any conversion or budget arithmetic runs, so
//! a rejected measurement never yields a partial result.

use std::fmt;

use crate::constants::MIN_FIBER_LENGTH_M;
use crate::error::{LossError, Result};
use crate::fiber::{pairing_message, Wavelength};
use crate::input::MeasurementInput;

/// An input, or group of alternative inputs, that can be reported missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// transmit power, as `--tx` (mW) or `--tx_dbm`
    Tx,
    /// receive power, as `--rx` (mW) or `--rx_dbm`
    Rx,
    FiberType,
    Wavelength,
    FiberLength,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Field::Tx => "--tx or --tx_dbm",
            Field::Rx => "--rx or --rx_dbm",
            Field::FiberType => "--fiber_type",
            Field::Wavelength => "--wavelength",
            Field::FiberLength => "--fiber_length",
        };
        write!(f, "{name}")
    }
}

pub fn validate(input: &MeasurementInput) -> Result<()> {
    let missing = missing_fields(input);
    let invalid = invalid_configuration(input);
    match (missing.is_empty(), invalid.is_empty()) {
        (true, true) => {}
        (false, true) => return Err(LossError::MissingInput(missing)),
        (true, false) => return Err(LossError::InvalidConfiguration(invalid)),
        (false, false) => return Err(LossError::Rejected { missing, invalid }),
    }

    for (name, bound) in [
        ("RX target minimum", input.rx_target_min_dbm),
        ("RX target maximum", input.rx_target_max_dbm),
    ] {
        if let Some(dbm) = bound.filter(|dbm| !dbm.is_finite()) {
            return Err(LossError::Domain(format!(
                "{name} must be a finite dBm value, got {dbm}"
            )));
        }
    }

    if let Some(length_m) = input.fiber_length_m {
        if !(length_m >= MIN_FIBER_LENGTH_M) || !length_m.is_finite() {
            return Err(LossError::Domain(format!(
                "fiber length must be at least {MIN_FIBER_LENGTH_M} m, got {length_m}"
            )));
        }
    }

    Ok(())
}

fn missing_fields(input: &MeasurementInput) -> Vec<Field> {
    let mut missing = Vec::new();

    if input.tx_mw.is_none() && input.tx_dbm.is_none() {
        missing.push(Field::Tx);
    }
    if input.rx_mw.is_none() && input.rx_dbm.is_none() {
        missing.push(Field::Rx);
    }

    // type, wavelength and length are all or nothing
    if input.has_fiber_fields() {
        if input.fiber_type.is_none() {
            missing.push(Field::FiberType);
        }
        if input.wavelength_nm.is_none() {
            missing.push(Field::Wavelength);
        }
        if input.fiber_length_m.is_none() {
            missing.push(Field::FiberLength);
        }
    }

    missing
}

fn invalid_configuration(input: &MeasurementInput) -> Vec<String> {
    let mut invalid = Vec::new();

    let wavelength = match input.wavelength_nm.map(Wavelength::try_from) {
        Some(Ok(wavelength)) => Some(wavelength),
        Some(Err(LossError::InvalidConfiguration(messages))) => {
            invalid.extend(messages);
            None
        }
        Some(Err(other)) => {
            invalid.push(other.to_string());
            None
        }
        None => None,
    };

    if let (Some(fiber_type), Some(wavelength)) = (input.fiber_type, wavelength) {
        if !fiber_type.supports(wavelength) {
            invalid.push(pairing_message(fiber_type, wavelength));
        }
    }

    // non-finite bounds are a domain error, reported by `validate`
    let (min_dbm, max_dbm) = (input.rx_target_min_dbm(), input.rx_target_max_dbm());
    if min_dbm.is_finite() && max_dbm.is_finite() && min_dbm > max_dbm {
        invalid.push(format!(
            "RX target minimum of {min_dbm:.2} dBm is above the maximum of {max_dbm:.2} dBm."
        ));
    }

    invalid
}
