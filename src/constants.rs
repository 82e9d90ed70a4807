/// Typical loss per mated connector pair (dB).
pub const CONNECTOR_LOSS_TYPICAL_DB: f64 = 0.3;
/// TIA-568 maximum loss per mated connector pair (dB).
pub const CONNECTOR_LOSS_MAX_DB: f64 = 0.75;
/// Loss per fusion splice (dB), same for both tiers.
pub const SPLICE_LOSS_DB: f64 = 0.3;

/// Shortest fiber run the budget model accepts (m).
pub const MIN_FIBER_LENGTH_M: f64 = 1.0;

/// Default lower edge of the receiver's target power band (dBm).
pub const DEFAULT_RX_TARGET_MIN_DBM: f64 = -5.0;
/// Default upper edge of the receiver's target power band (dBm).
pub const DEFAULT_RX_TARGET_MAX_DBM: f64 = 1.0;

/// Name of the reference standard the maximum tier comes from.
pub const REFERENCE_STANDARD: &str = "TIA-568";
