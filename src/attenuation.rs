use std::fmt;

use tracing::debug;

use crate::error::{LossError, Result};
use crate::power::PowerReading;

/// Observed loss between a transmitter and a receiver.
///
/// The two magnitudes carry opposite sign conventions:
/// - `loss_db` is positive when the receiver saw less power than was
///   transmitted, i.e. a real loss.
/// - `loss_mw` is the linear delta `rx - tx`, so it is negative for a real loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttenuationResult {
    pub loss_mw: f64, // mW, rx - tx
    pub loss_db: f64, // dB, 10 * log10(tx / rx)
}

impl fmt::Display for AttenuationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.4} mW / {:.2} dB", self.loss_mw, self.loss_db)
    }
}

pub fn compute_attenuation(tx: &PowerReading, rx: &PowerReading) -> Result<AttenuationResult> {
    if rx.milliwatts <= 0.0 {
        return Err(LossError::Domain(format!(
            "receive power must be positive to compute attenuation, got {} mW",
            rx.milliwatts
        )));
    }
    if tx.milliwatts <= 0.0 {
        return Err(LossError::Domain(format!(
            "transmit power must be positive to compute attenuation, got {} mW",
            tx.milliwatts
        )));
    }

    let loss_db = 10.0 * (tx.milliwatts / rx.milliwatts).log10();
    let loss_mw = rx.milliwatts - tx.milliwatts;
    debug!(loss_db, loss_mw, "computed attenuation");

    Ok(AttenuationResult { loss_mw, loss_db })
}
