use std::fmt;

use serde::Deserialize;

use crate::budget::BudgetMode;
use crate::constants::{DEFAULT_RX_TARGET_MAX_DBM, DEFAULT_RX_TARGET_MIN_DBM};
use crate::error::Result;
use crate::fiber::{FiberPath, FiberType, Wavelength};

// the raw measurement as supplied by flags or a measurement file,
// nothing here has been validated or derived yet
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeasurementInput {
    #[serde(rename = "tx")]
    pub tx_mw: Option<f64>, // mW
    pub tx_dbm: Option<f64>,
    #[serde(rename = "rx")]
    pub rx_mw: Option<f64>, // mW
    pub rx_dbm: Option<f64>,
    pub rx_target_min_dbm: Option<f64>,
    pub rx_target_max_dbm: Option<f64>,
    pub fiber_type: Option<FiberType>,
    #[serde(rename = "wavelength")]
    pub wavelength_nm: Option<u32>,
    #[serde(rename = "fiber_length")]
    pub fiber_length_m: Option<f64>, // meters
    #[serde(rename = "num_connectors")]
    pub connectors: Option<u32>,
    #[serde(rename = "num_splices")]
    pub splices: Option<u32>,
    /// `Some(true)` judges against the TIA-568 maximum only; unset means two-tier.
    pub single_tier: Option<bool>,
}

impl fmt::Display for MeasurementInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "MeasurementInput {{ tx: {:?} mW / {:?} dBm, rx: {:?} mW / {:?} dBm, fiber_type: {:?}, wavelength: {:?}, fiber_length: {:?}, connectors: {:?}, splices: {:?} }}",
            self.tx_mw,
            self.tx_dbm,
            self.rx_mw,
            self.rx_dbm,
            self.fiber_type,
            self.wavelength_nm,
            self.fiber_length_m,
            self.connectors,
            self.splices
        )
    }
}

impl MeasurementInput {
    /// Input with transmit and receive power given in milliwatts.
    pub fn from_milliwatts(tx_mw: f64, rx_mw: f64) -> MeasurementInput {
        MeasurementInput {
            tx_mw: Some(tx_mw),
            rx_mw: Some(rx_mw),
            ..Default::default()
        }
    }

    /// Input with transmit and receive power given in dBm.
    pub fn from_dbm(tx_dbm: f64, rx_dbm: f64) -> MeasurementInput {
        MeasurementInput {
            tx_dbm: Some(tx_dbm),
            rx_dbm: Some(rx_dbm),
            ..Default::default()
        }
    }

    pub fn with_fiber(
        self,
        fiber_type: FiberType,
        wavelength_nm: u32,
        fiber_length_m: f64,
        connectors: u32,
        splices: u32,
    ) -> MeasurementInput {
        MeasurementInput {
            fiber_type: Some(fiber_type),
            wavelength_nm: Some(wavelength_nm),
            fiber_length_m: Some(fiber_length_m),
            connectors: Some(connectors),
            splices: Some(splices),
            ..self
        }
    }

    /// Fields set in `overrides` replace the ones in `self`.
    pub fn overlay(self, overrides: MeasurementInput) -> MeasurementInput {
        MeasurementInput {
            tx_mw: overrides.tx_mw.or(self.tx_mw),
            tx_dbm: overrides.tx_dbm.or(self.tx_dbm),
            rx_mw: overrides.rx_mw.or(self.rx_mw),
            rx_dbm: overrides.rx_dbm.or(self.rx_dbm),
            rx_target_min_dbm: overrides.rx_target_min_dbm.or(self.rx_target_min_dbm),
            rx_target_max_dbm: overrides.rx_target_max_dbm.or(self.rx_target_max_dbm),
            fiber_type: overrides.fiber_type.or(self.fiber_type),
            wavelength_nm: overrides.wavelength_nm.or(self.wavelength_nm),
            fiber_length_m: overrides.fiber_length_m.or(self.fiber_length_m),
            connectors: overrides.connectors.or(self.connectors),
            splices: overrides.splices.or(self.splices),
            single_tier: overrides.single_tier.or(self.single_tier),
        }
    }

    pub fn budget_mode(&self) -> BudgetMode {
        if self.single_tier.unwrap_or(false) {
            BudgetMode::SingleTier
        } else {
            BudgetMode::TwoTier
        }
    }

    pub fn rx_target_min_dbm(&self) -> f64 {
        self.rx_target_min_dbm.unwrap_or(DEFAULT_RX_TARGET_MIN_DBM)
    }

    pub fn rx_target_max_dbm(&self) -> f64 {
        self.rx_target_max_dbm.unwrap_or(DEFAULT_RX_TARGET_MAX_DBM)
    }

    pub fn has_fiber_fields(&self) -> bool {
        self.fiber_type.is_some() || self.wavelength_nm.is_some() || self.fiber_length_m.is_some()
    }

    /// The fiber run, once the type/wavelength/length trio is complete.
    ///
    /// Connector and splice counts default to zero only here, after the trio
    /// is known to be present.
    pub fn fiber_path(&self) -> Result<Option<FiberPath>> {
        let (Some(fiber_type), Some(wavelength_nm), Some(length_m)) =
            (self.fiber_type, self.wavelength_nm, self.fiber_length_m)
        else {
            return Ok(None);
        };
        let wavelength = Wavelength::try_from(wavelength_nm)?;
        let path = FiberPath::new(
            fiber_type,
            wavelength,
            length_m,
            self.connectors.unwrap_or(0),
            self.splices.unwrap_or(0),
        )?;
        Ok(Some(path))
    }
}
