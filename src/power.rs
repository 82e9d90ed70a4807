use std::fmt;

use tracing::{debug, warn};

use crate::error::{LossError, Result};
use crate::validate::Field;

/// Convert a power in milliwatts to dBm.
///
/// Fails for zero or negative power, where the logarithm is undefined.
pub fn to_dbm(milliwatts: f64) -> Result<f64> {
    if !milliwatts.is_finite() || milliwatts <= 0.0 {
        return Err(LossError::Domain(format!(
            "power must be a positive number of milliwatts, got {milliwatts}"
        )));
    }
    Ok(10.0 * milliwatts.log10())
}

/// Convert a power in dBm to milliwatts.
pub fn to_milliwatts(dbm: f64) -> Result<f64> {
    if !dbm.is_finite() {
        return Err(LossError::Domain(format!(
            "power in dBm must be finite, got {dbm}"
        )));
    }
    // dBm is dB relative to 1 mW, so the linear ratio is the power in mW
    let milliwatts = rfconversions::power::db_to_linear(dbm);
    // very large or very small dBm overflows to inf or underflows to 0 mW,
    // and neither converts back to the dBm it came from
    if !milliwatts.is_finite() || milliwatts <= 0.0 {
        return Err(LossError::Domain(format!(
            "power of {dbm} dBm is outside the representable range"
        )));
    }
    Ok(milliwatts)
}

/// A power level held in both linear and logarithmic form.
///
/// The two fields always describe the same power; construct through
/// [`PowerReading::from_milliwatts`] or [`PowerReading::from_dbm`] so one
/// form is derived from the other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerReading {
    pub milliwatts: f64, // mW
    pub dbm: f64,        // dBm
}

impl fmt::Display for PowerReading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.4} mW / {:.2} dBm", self.milliwatts, self.dbm)
    }
}

impl PowerReading {
    pub fn from_milliwatts(milliwatts: f64) -> Result<PowerReading> {
        let dbm = to_dbm(milliwatts)?;
        Ok(PowerReading { milliwatts, dbm })
    }

    pub fn from_dbm(dbm: f64) -> Result<PowerReading> {
        let milliwatts = to_milliwatts(dbm)?;
        Ok(PowerReading { milliwatts, dbm })
    }

    /// Build a reading from whichever forms the caller supplied.
    ///
    /// When both are present the milliwatt value wins and dBm is recomputed,
    /// so a stale dBm figure can never disagree with the linear one.
    pub fn resolve(milliwatts: Option<f64>, dbm: Option<f64>, field: Field) -> Result<PowerReading> {
        let reading = match (milliwatts, dbm) {
            (Some(milliwatts), Some(supplied_dbm)) => {
                let reading = PowerReading::from_milliwatts(milliwatts)?;
                if (reading.dbm - supplied_dbm).abs() > 1e-6 {
                    warn!(
                        %field,
                        supplied_dbm,
                        recomputed_dbm = reading.dbm,
                        "both mW and dBm supplied and they disagree, using mW"
                    );
                }
                reading
            }
            (Some(milliwatts), None) => PowerReading::from_milliwatts(milliwatts)?,
            (None, Some(dbm)) => PowerReading::from_dbm(dbm)?,
            (None, None) => return Err(LossError::MissingInput(vec![field])),
        };
        debug!(%field, milliwatts = reading.milliwatts, dbm = reading.dbm, "resolved power");
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dbm_of_one_milliwatt_is_zero() {
        assert_eq!(to_dbm(1.0).unwrap(), 0.0);
        assert_eq!(to_dbm(10.0).unwrap(), 10.0);
    }

    #[test]
    fn milliwatts_of_zero_dbm_is_one() {
        assert_eq!(to_milliwatts(0.0).unwrap(), 1.0);
        assert!((to_milliwatts(-3.0).unwrap() - 0.501187).abs() < 1e-6);
    }

    #[test]
    fn non_positive_power_is_a_domain_error() {
        assert!(matches!(to_dbm(0.0), Err(LossError::Domain(_))));
        assert!(matches!(to_dbm(-1.5), Err(LossError::Domain(_))));
        assert!(matches!(to_dbm(f64::NAN), Err(LossError::Domain(_))));
    }

    #[test]
    fn non_finite_dbm_is_a_domain_error() {
        assert!(matches!(to_milliwatts(f64::INFINITY), Err(LossError::Domain(_))));
        assert!(matches!(to_milliwatts(f64::NAN), Err(LossError::Domain(_))));
    }

    #[test]
    fn out_of_range_dbm_is_a_domain_error() {
        assert!(matches!(to_milliwatts(4000.0), Err(LossError::Domain(_))));
        assert!(matches!(to_milliwatts(-4000.0), Err(LossError::Domain(_))));
        assert!(matches!(
            PowerReading::from_dbm(4000.0),
            Err(LossError::Domain(_))
        ));
        assert!(to_milliwatts(300.0).unwrap().is_finite());
    }

    #[test]
    fn round_trip_stays_within_tolerance() {
        for p in [1e-6, 0.001, 0.5, 1.0, 1.5, 10.0, 123.456, 1e6] {
            let back = to_milliwatts(to_dbm(p).unwrap()).unwrap();
            assert!(
                ((back - p) / p).abs() < 1e-9,
                "round trip of {p} mW came back as {back}"
            );
        }
    }

    #[test]
    fn resolve_prefers_milliwatts_when_both_given() {
        let reading = PowerReading::resolve(Some(10.0), Some(3.0), Field::Tx).unwrap();
        assert_eq!(reading.milliwatts, 10.0);
        assert_eq!(reading.dbm, 10.0);
    }

    #[test]
    fn resolve_derives_milliwatts_from_dbm() {
        let reading = PowerReading::resolve(None, Some(-10.0), Field::Rx).unwrap();
        assert!((reading.milliwatts - 0.1).abs() < 1e-12);
        assert_eq!(reading.dbm, -10.0);
    }

    #[test]
    fn resolve_without_either_form_names_the_endpoint() {
        let err = PowerReading::resolve(None, None, Field::Rx).unwrap_err();
        assert_eq!(err, LossError::MissingInput(vec![Field::Rx]));
    }

    #[test]
    fn display() {
        let reading = PowerReading::from_milliwatts(1.5).unwrap();
        assert_eq!(reading.to_string(), "1.5000 mW / 1.76 dBm");
    }
}
