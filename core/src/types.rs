//! Shared primitive types used across the entire simulation.

/// A simulation period. One period = one in-game quarter.
pub type Period = u32;

/// The canonical run identifier.
pub type RunId = String;

/// Currency amounts (crores).
pub type Money = f64;

/// Market share in percentage points.
pub type Share = f64;

/// Round to two decimal places, the precision used for exported figures.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
