#![allow(non_upper_case_globals)]

//! Physical constants and unit conversions at the configuration boundary.
//!
//! The engine works in a single internal unit system matching the
//! conventions of the fiber-optics literature: time in picoseconds (ps),
//! propagation distance in meters (m), optical power in watts (W). Derived
//! from these, angular frequency is in rad/ps, dispersion coefficients βₙ in
//! psⁿ/m, and the nonlinear coefficient γ in 1/(W·m). Configuration supplies
//! the central wavelength in nanometers and loss in dB/m; the conversions
//! below are the only places those units cross into the internal system.
//!
//! Concrete physical constants are taken from NIST.

use std::f64::consts::PI;

/// speed of light in vacuum (m s^-1)
pub const c: f64 = 2.99792458e8;
//             +/- 0 (exact)

/// speed of light in vacuum (nm ps^-1)
pub const c_nmps: f64 = c * 1e9 / 1e12;
//                  +/- 0 (exact)

/// Convert a vacuum wavelength in nanometers to its angular frequency in
/// rad/ps.
pub fn wavelength_to_omega(wavelength_nm: f64) -> f64 {
    2.0 * PI * c_nmps / wavelength_nm
}

/// Convert an angular frequency in rad/ps to its vacuum wavelength in
/// nanometers.
///
/// Inverse of [`wavelength_to_omega`]; the two conversions are an involution
/// since both are `2πc / x`.
pub fn omega_to_wavelength(omega: f64) -> f64 {
    2.0 * PI * c_nmps / omega
}

/// Convert a power loss coefficient in dB/m to a field attenuation constant
/// α in 1/m.
///
/// Power decays as `exp(-α z)`; the field amplitude decays at α/2 per unit
/// length.
pub fn loss_db_to_alpha(loss_db: f64) -> f64 {
    f64::ln(10.0_f64.powf(loss_db / 10.0))
}
