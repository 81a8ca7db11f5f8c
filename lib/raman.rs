//! Delayed Raman response kernels.
//!
//! A Raman model supplies a causal time-domain response kernel h(t) (zero
//! for t < 0, unit time integral) and the fractional contribution f_R of the
//! delayed response to the total nonlinear polarization. The nonlinear
//! operator convolves the sampled kernel with the instantaneous intensity
//! and blends the result with the Kerr term as
//! `(1 - f_R)·|A|² + f_R·(h ∗ |A|²)`.

use ndarray as nd;

/// Common interface for delayed-response models.
///
/// Implementations are immutable once constructed.
pub trait RamanResponse: Send + Sync {
    /// Human-readable model name for reporting.
    fn name(&self) -> &str;

    /// Fractional contribution of the delayed response, intrinsic to the
    /// physical model.
    fn fraction(&self) -> f64;

    /// Response kernel value at time `t` (ps); zero for `t < 0`.
    fn kernel(&self, t: f64) -> f64;

    /// Sample the kernel over a time axis and renormalize so its discrete
    /// integral is exactly 1.
    fn sample(&self, t: &nd::Array1<f64>, dt: f64) -> nd::Array1<f64> {
        let mut h = t.mapv(|tk| self.kernel(tk));
        let integral = h.sum() * dt;
        if integral > 0.0 {
            h.map_inplace(|hk| { *hk /= integral; });
        }
        h
    }
}

/// Blow-Wood single-damped-oscillator response for fused-silica fibers[^1]:
/// ```text
/// h(t) = (τ₁² + τ₂²)/(τ₁ τ₂²) exp(-t/τ₂) sin(t/τ₁),  t ≥ 0
/// ```
/// with f_R = 0.18.
///
/// [^1]: K. J. Blow and D. Wood, "Theoretical description of transient
///     stimulated Raman scattering in optical fibers", IEEE J. Quantum
///     Electron. 25, 2665 (1989).
#[derive(Copy, Clone, Debug)]
pub struct BlowWoodRaman {
    /// Inverse phonon oscillation frequency (ps).
    pub tau1: f64,
    /// Phonon damping time (ps).
    pub tau2: f64,
}

impl BlowWoodRaman {
    /// Standard fused-silica fit: τ₁ = 12.2 fs, τ₂ = 32 fs.
    pub fn new() -> Self {
        Self { tau1: 0.0122, tau2: 0.032 }
    }
}

impl Default for BlowWoodRaman {
    fn default() -> Self { Self::new() }
}

impl RamanResponse for BlowWoodRaman {
    fn name(&self) -> &str { "Blow-Wood" }

    fn fraction(&self) -> f64 { 0.18 }

    fn kernel(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let Self { tau1, tau2 } = *self;
        (tau1.powi(2) + tau2.powi(2)) / (tau1 * tau2.powi(2))
            * (-t / tau2).exp()
            * (t / tau1).sin()
    }
}

/// Lin-Agrawal response[^1], adding the anisotropic boson-peak contribution
/// to the Blow-Wood oscillator:
/// ```text
/// h(t) = (f_a + f_c) h_a(t) + f_b h_b(t)
/// h_b(t) = (2τ_b - t)/τ_b² exp(-t/τ_b),  t ≥ 0
/// ```
/// with f_R = 0.245, f_a = 0.75, f_b = 0.21, f_c = 0.04.
///
/// [^1]: Q. Lin and G. P. Agrawal, "Raman response function for silica
///     fibers", Opt. Lett. 31, 3086 (2006).
#[derive(Copy, Clone, Debug)]
pub struct LinAgrawalRaman {
    /// Inverse phonon oscillation frequency (ps).
    pub tau1: f64,
    /// Phonon damping time (ps).
    pub tau2: f64,
    /// Boson-peak decay time (ps).
    pub taub: f64,
}

impl LinAgrawalRaman {
    /// Standard fused-silica fit: τ₁ = 12.2 fs, τ₂ = 32 fs, τ_b = 96 fs.
    pub fn new() -> Self {
        Self { tau1: 0.0122, tau2: 0.032, taub: 0.096 }
    }
}

impl Default for LinAgrawalRaman {
    fn default() -> Self { Self::new() }
}

impl LinAgrawalRaman {
    const FA: f64 = 0.75;
    const FB: f64 = 0.21;
    const FC: f64 = 0.04;
}

impl RamanResponse for LinAgrawalRaman {
    fn name(&self) -> &str { "Lin-Agrawal" }

    fn fraction(&self) -> f64 { 0.245 }

    fn kernel(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let Self { tau1, tau2, taub } = *self;
        let ha = (tau1.powi(2) + tau2.powi(2)) / (tau1 * tau2.powi(2))
            * (-t / tau2).exp()
            * (t / tau1).sin();
        let hb = (2.0 * taub - t) / taub.powi(2) * (-t / taub).exp();
        (Self::FA + Self::FC) * ha + Self::FB * hb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray as nd;

    fn sampling_axis() -> (nd::Array1<f64>, f64) {
        // 0.5 fs sampling out to 8 ps covers the kernels' support
        let dt = 5e-4;
        let n = 16000;
        let t: nd::Array1<f64> = (0..n).map(|k| k as f64 * dt - 1.0).collect();
        (t, dt)
    }

    #[test]
    fn kernels_are_causal() {
        let bw = BlowWoodRaman::new();
        let la = LinAgrawalRaman::new();
        for t in [-1.0, -0.1, -1e-6] {
            assert_eq!(bw.kernel(t), 0.0);
            assert_eq!(la.kernel(t), 0.0);
        }
        assert!(bw.kernel(0.01) > 0.0);
        assert!(la.kernel(0.01) > 0.0);
    }

    #[test]
    fn analytic_normalization_is_close_to_unity() {
        // the continuous-time kernels integrate to 1 by construction
        let (t, dt) = sampling_axis();
        for model in [
            &BlowWoodRaman::new() as &dyn RamanResponse,
            &LinAgrawalRaman::new(),
        ] {
            let integral: f64
                = t.iter().map(|&tk| model.kernel(tk)).sum::<f64>() * dt;
            assert!(
                (integral - 1.0).abs() < 1e-3,
                "{}: ∫h = {integral}", model.name(),
            );
        }
    }

    #[test]
    fn sampled_kernel_has_unit_discrete_integral() {
        let (t, dt) = sampling_axis();
        for model in [
            &BlowWoodRaman::new() as &dyn RamanResponse,
            &LinAgrawalRaman::new(),
        ] {
            let h = model.sample(&t, dt);
            assert!((h.sum() * dt - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn fractions() {
        assert!((BlowWoodRaman::new().fraction() - 0.18).abs() < 1e-15);
        assert!((LinAgrawalRaman::new().fraction() - 0.245).abs() < 1e-15);
    }
}
