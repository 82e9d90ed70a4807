use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::constants::MIN_FIBER_LENGTH_M;
use crate::error::{LossError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum FiberType {
    Singlemode,
    Multimode,
}

impl fmt::Display for FiberType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FiberType::Singlemode => write!(f, "singlemode"),
            FiberType::Multimode => write!(f, "multimode"),
        }
    }
}

impl FromStr for FiberType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sm" | "singlemode" => Ok(FiberType::Singlemode),
            "m" | "mm" | "multimode" => Ok(FiberType::Multimode),
            other => Err(format!(
                "unknown fiber type `{other}`, expected `s` (singlemode) or `m` (multimode)"
            )),
        }
    }
}

impl TryFrom<String> for FiberType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl FiberType {
    /// Wavelengths this fiber category is specified for.
    pub fn wavelengths(self) -> [Wavelength; 2] {
        match self {
            FiberType::Singlemode => [Wavelength::Nm1310, Wavelength::Nm1550],
            FiberType::Multimode => [Wavelength::Nm850, Wavelength::Nm1300],
        }
    }

    pub fn supports(self, wavelength: Wavelength) -> bool {
        self.wavelengths().contains(&wavelength)
    }

    fn title(self) -> &'static str {
        match self {
            FiberType::Singlemode => "Singlemode",
            FiberType::Multimode => "Multimode",
        }
    }
}

/// The four standardized operating wavelengths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wavelength {
    Nm850,
    Nm1300,
    Nm1310,
    Nm1550,
}

impl Wavelength {
    pub const ALL: [Wavelength; 4] = [
        Wavelength::Nm850,
        Wavelength::Nm1300,
        Wavelength::Nm1310,
        Wavelength::Nm1550,
    ];

    pub fn nm(self) -> u32 {
        match self {
            Wavelength::Nm850 => 850,
            Wavelength::Nm1300 => 1300,
            Wavelength::Nm1310 => 1310,
            Wavelength::Nm1550 => 1550,
        }
    }
}

impl fmt::Display for Wavelength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.nm())
    }
}

impl TryFrom<u32> for Wavelength {
    type Error = LossError;

    fn try_from(nm: u32) -> Result<Self> {
        Wavelength::ALL
            .into_iter()
            .find(|wavelength| wavelength.nm() == nm)
            .ok_or_else(|| {
                LossError::InvalidConfiguration(vec![format!(
                    "Unsupported wavelength {nm}nm, expected one of 850, 1300, 1310 or 1550."
                )])
            })
    }
}

/// Refuse a fiber type / wavelength pair that cannot describe a real link.
pub fn check_pairing(fiber_type: FiberType, wavelength: Wavelength) -> Result<()> {
    if fiber_type.supports(wavelength) {
        Ok(())
    } else {
        Err(LossError::InvalidConfiguration(vec![pairing_message(
            fiber_type, wavelength,
        )]))
    }
}

pub(crate) fn pairing_message(fiber_type: FiberType, wavelength: Wavelength) -> String {
    format!(
        "{} fiber does not support {}nm wavelength.",
        fiber_type.title(),
        wavelength.nm()
    )
}

// the physical run between transmitter and receiver
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FiberPath {
    pub fiber_type: FiberType,
    pub wavelength: Wavelength,
    pub length_m: f64,   // meters, >= 1
    pub connectors: u32, // mated connector pairs
    pub splices: u32,
}

impl fmt::Display for FiberPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "FiberPath {{ fiber_type: {}, wavelength: {}nm, length: {} m, connectors: {}, splices: {} }}",
            self.fiber_type, self.wavelength, self.length_m, self.connectors, self.splices
        )
    }
}

impl FiberPath {
    pub fn new(
        fiber_type: FiberType,
        wavelength: Wavelength,
        length_m: f64,
        connectors: u32,
        splices: u32,
    ) -> Result<FiberPath> {
        check_pairing(fiber_type, wavelength)?;
        // negated comparison so NaN is rejected too
        if !(length_m >= MIN_FIBER_LENGTH_M) || !length_m.is_finite() {
            return Err(LossError::Domain(format!(
                "fiber length must be at least {MIN_FIBER_LENGTH_M} m, got {length_m}"
            )));
        }
        Ok(FiberPath {
            fiber_type,
            wavelength,
            length_m,
            connectors,
            splices,
        })
    }

    pub fn length_km(&self) -> f64 {
        self.length_m / 1000.0
    }
}
