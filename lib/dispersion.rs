//! Linear propagation operators in the frequency domain.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{ error::ConfigurationError, units };

/// Common interface for linear dispersion operators.
///
/// `transfer_exponent` returns the complex exponent L(Δω) such that
/// propagation over a length `dz` multiplies the frequency-domain field by
/// `exp(L(Δω)·dz)`: the imaginary part carries dispersive phase, the real
/// part attenuation.
pub trait Dispersion: Send + Sync {
    /// Complex transfer exponent per unit length (1/m) at angular-frequency
    /// offset `delta_omega` (rad/ps) from the carrier.
    fn transfer_exponent(&self, delta_omega: f64) -> C64;

    /// Sample the transfer exponent over an angular-frequency axis.
    fn sample(&self, omega: &nd::Array1<f64>) -> nd::Array1<C64> {
        omega.mapv(|w| self.transfer_exponent(w))
    }
}

/// Dispersion built from a Taylor expansion of the propagation constant
/// around the carrier, plus scalar loss:
/// ```text
/// L(Δω) = i Σₙ (βₙ/n!) Δωⁿ - α/2
/// ```
/// Coefficients start at β₂: entry `k` of `betas` is β₍ₖ₊₂₎ in ps^(k+2)/m.
/// Loss is given in dB/m; the field amplitude attenuates at α/2 per unit
/// length so power decays at α.
#[derive(Clone, Debug)]
pub struct TaylorDispersion {
    betas: Vec<f64>,
    alpha: f64,
}

impl TaylorDispersion {
    pub fn new(loss_db: f64, betas: Vec<f64>)
        -> Result<Self, ConfigurationError>
    {
        if betas.is_empty() {
            return Err(ConfigurationError::EmptyDispersion);
        }
        Ok(Self { betas, alpha: units::loss_db_to_alpha(loss_db) })
    }

    /// Taylor coefficients, starting at β₂.
    pub fn betas(&self) -> &[f64] { &self.betas }
}

impl Dispersion for TaylorDispersion {
    fn transfer_exponent(&self, delta_omega: f64) -> C64 {
        let mut B: f64 = 0.0;
        let mut wn = delta_omega * delta_omega;
        let mut fact = 2.0;
        for (k, beta) in self.betas.iter().enumerate() {
            B += beta / fact * wn;
            wn *= delta_omega;
            fact *= (k + 3) as f64;
        }
        C64::new(-self.alpha / 2.0, B)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taylor_sum_matches_hand_expansion() {
        let beta2 = -11.830e-3;
        let beta3 = 8.1038e-5;
        let disp = TaylorDispersion::new(0.0, vec![beta2, beta3]).unwrap();
        let w: f64 = 37.5;
        let expected = beta2 / 2.0 * w.powi(2) + beta3 / 6.0 * w.powi(3);
        let l = disp.transfer_exponent(w);
        assert!(l.re.abs() < 1e-15);
        assert!((l.im - expected).abs() / expected.abs() < 1e-12);
    }

    #[test]
    fn loss_appears_as_amplitude_attenuation() {
        // 10 dB/m of power loss: α = ln 10
        let disp = TaylorDispersion::new(10.0, vec![-1e-3]).unwrap();
        let l = disp.transfer_exponent(0.0);
        assert!((l.re + 10.0_f64.ln() / 2.0).abs() < 1e-12);
        assert!(l.im.abs() < 1e-15);
    }

    #[test]
    fn rejects_empty_coefficients() {
        assert_eq!(
            TaylorDispersion::new(0.0, vec![]).unwrap_err(),
            ConfigurationError::EmptyDispersion,
        );
    }
}
