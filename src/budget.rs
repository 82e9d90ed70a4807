//! Loss budget model.
//!
//! A budget is the attenuation a fiber run is allowed to show: fiber loss
//! per kilometer, plus a flat cost per mated connector pair and per splice.
//! Two tiers are derived from the same run, a typical figure and the
//! TIA-568 reference maximum.

use std::fmt;

use tracing::debug;

use crate::constants::{CONNECTOR_LOSS_MAX_DB, CONNECTOR_LOSS_TYPICAL_DB, SPLICE_LOSS_DB};
use crate::error::{LossError, Result};
use crate::fiber::{pairing_message, FiberPath, FiberType, Wavelength};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Typical,
    Max,
}

impl Tier {
    pub fn connector_loss_db(self) -> f64 {
        match self {
            Tier::Typical => CONNECTOR_LOSS_TYPICAL_DB,
            Tier::Max => CONNECTOR_LOSS_MAX_DB,
        }
    }

    pub fn splice_loss_db(self) -> f64 {
        SPLICE_LOSS_DB
    }
}

/// One row of the fiber attenuation table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiberLoss {
    pub fiber_type: FiberType,
    pub wavelength: Wavelength,
    pub typical_db_per_km: f64,
    pub max_db_per_km: f64,
}

impl FiberLoss {
    pub fn db_per_km(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Typical => self.typical_db_per_km,
            Tier::Max => self.max_db_per_km,
        }
    }
}

pub static FIBER_LOSS_TABLE: [FiberLoss; 4] = [
    FiberLoss {
        fiber_type: FiberType::Multimode,
        wavelength: Wavelength::Nm850,
        typical_db_per_km: 3.0,
        max_db_per_km: 3.5,
    },
    FiberLoss {
        fiber_type: FiberType::Multimode,
        wavelength: Wavelength::Nm1300,
        typical_db_per_km: 1.0,
        max_db_per_km: 1.5,
    },
    FiberLoss {
        fiber_type: FiberType::Singlemode,
        wavelength: Wavelength::Nm1310,
        typical_db_per_km: 0.5,
        max_db_per_km: 1.0,
    },
    FiberLoss {
        fiber_type: FiberType::Singlemode,
        wavelength: Wavelength::Nm1550,
        typical_db_per_km: 0.5,
        max_db_per_km: 1.0,
    },
];

/// Look up the table row for a fiber type and wavelength.
///
/// There is no fallback row: an incompatible pair is an error.
pub fn fiber_loss(fiber_type: FiberType, wavelength: Wavelength) -> Result<&'static FiberLoss> {
    FIBER_LOSS_TABLE
        .iter()
        .find(|row| row.fiber_type == fiber_type && row.wavelength == wavelength)
        .ok_or_else(|| {
            LossError::InvalidConfiguration(vec![pairing_message(fiber_type, wavelength)])
        })
}

pub fn compute_budget(path: &FiberPath, tier: Tier) -> Result<f64> {
    let row = fiber_loss(path.fiber_type, path.wavelength)?;
    let fiber_db = row.db_per_km(tier) * path.length_km();
    let connector_db = tier.connector_loss_db() * f64::from(path.connectors);
    let splice_db = tier.splice_loss_db() * f64::from(path.splices);
    Ok(fiber_db + connector_db + splice_db)
}

/// How many tiers a budget carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BudgetMode {
    /// Typical and TIA-568 maximum tiers, verdict can be PASS, WARN or FAIL.
    #[default]
    TwoTier,
    /// Only the TIA-568 maximum, so typical equals max and WARN cannot occur.
    SingleTier,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LossBudget {
    pub typical_db: f64,
    pub max_db: f64,
}

impl fmt::Display for LossBudget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LossBudget {{ typical: {:.2} dB, max: {:.2} dB }}",
            self.typical_db, self.max_db
        )
    }
}

impl LossBudget {
    pub fn for_path(path: &FiberPath, mode: BudgetMode) -> Result<LossBudget> {
        let max_db = compute_budget(path, Tier::Max)?;
        let typical_db = match mode {
            BudgetMode::TwoTier => compute_budget(path, Tier::Typical)?,
            BudgetMode::SingleTier => max_db,
        };
        debug!(%path, ?mode, typical_db, max_db, "computed loss budget");
        Ok(LossBudget { typical_db, max_db })
    }

    pub fn single_tier(max_db: f64) -> LossBudget {
        LossBudget {
            typical_db: max_db,
            max_db,
        }
    }
}
