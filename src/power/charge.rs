//! Closed-form battery charging relations.
//!
//! These give the analytical reference the time-stepped simulation is
//! checked against.

/// Energy the battery can still absorb: `E_battery · (1 − SoC)` (Wh).
pub fn remaining_energy(capacity_wh: f64, soc: f64) -> f64 {
    capacity_wh * (1.0 - soc)
}

/// Rate at which surplus power is actually stored: `η · P_excess` (W).
pub fn charge_power(surplus_w: f64, eta: f64) -> f64 {
    eta * surplus_w
}

/// Time to absorb `remaining_wh` at a constant surplus: `E / (η · P_excess)` (h).
///
/// Returns `None` when the stored-power rate is not strictly positive, in
/// which case the battery never fills.
pub fn charging_time(remaining_wh: f64, surplus_w: f64, eta: f64) -> Option<f64> {
    let p_charge = charge_power(surplus_w, eta);
    if p_charge > 0.0 {
        Some(remaining_wh / p_charge)
    } else {
        None
    }
}
