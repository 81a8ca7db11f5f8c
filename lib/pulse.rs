//! Initial pulse envelope shapes.
//!
//! Every envelope exposes a pure `evaluate(t)` returning the complex field
//! amplitude in √W at time `t` (ps), plus a human-readable name for
//! reporting. Durations are specified as the full width at half maximum of
//! the power profile |A|².
//!
//! ```
//! use gnlse::pulse::{ PulseEnvelope, SechEnvelope };
//!
//! let pulse = SechEnvelope::new(100.0, 0.1);
//! assert!((pulse.evaluate(0.05).norm_sqr() - 50.0).abs() < 1e-9);
//! ```

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::error::ConfigurationError;

/// Common interface for initial pulse shapes.
///
/// Implementations are immutable once constructed; `evaluate` must be pure,
/// deterministic, and defined for every real `t`.
pub trait PulseEnvelope: Send + Sync {
    /// Human-readable shape name for reporting.
    fn name(&self) -> &str;

    /// Complex field amplitude (√W) at time `t` (ps).
    fn evaluate(&self, t: f64) -> C64;

    /// Sample the envelope over a time axis.
    fn sample(&self, t: &nd::Array1<f64>) -> nd::Array1<C64> {
        t.mapv(|tk| self.evaluate(tk))
    }
}

/// Gaussian envelope `√P₀ · exp(-t²/(2 t₀²))` with `t₀ = FWHM/(2√(ln 2))`.
#[derive(Copy, Clone, Debug)]
pub struct GaussianEnvelope {
    /// Peak power (W).
    pub peak_power: f64,
    /// Full width at half maximum of the power profile (ps).
    pub fwhm: f64,
}

impl GaussianEnvelope {
    pub fn new(peak_power: f64, fwhm: f64) -> Self {
        Self { peak_power, fwhm }
    }

    fn t0(&self) -> f64 { self.fwhm / (2.0 * 2.0_f64.ln().sqrt()) }
}

impl PulseEnvelope for GaussianEnvelope {
    fn name(&self) -> &str { "Gaussian" }

    fn evaluate(&self, t: f64) -> C64 {
        let x = t / self.t0();
        C64::from(self.peak_power.sqrt() * (-x * x / 2.0).exp())
    }
}

/// Hyperbolic-secant envelope `√P₀ · sech(t/t₀)` with
/// `t₀ = FWHM/(2·arcsinh 1)`.
#[derive(Copy, Clone, Debug)]
pub struct SechEnvelope {
    /// Peak power (W).
    pub peak_power: f64,
    /// Full width at half maximum of the power profile (ps).
    pub fwhm: f64,
}

impl SechEnvelope {
    pub fn new(peak_power: f64, fwhm: f64) -> Self {
        Self { peak_power, fwhm }
    }

    fn t0(&self) -> f64 { self.fwhm / (2.0 * 1.0_f64.asinh()) }
}

impl PulseEnvelope for SechEnvelope {
    fn name(&self) -> &str { "Sech" }

    fn evaluate(&self, t: f64) -> C64 {
        C64::from(self.peak_power.sqrt() / (t / self.t0()).cosh())
    }
}

/// Lorentzian envelope `√P₀ / (1 + (t/t₀)²)` with
/// `t₀ = FWHM/(2·√(√2 - 1))`.
#[derive(Copy, Clone, Debug)]
pub struct LorentzianEnvelope {
    /// Peak power (W).
    pub peak_power: f64,
    /// Full width at half maximum of the power profile (ps).
    pub fwhm: f64,
}

impl LorentzianEnvelope {
    pub fn new(peak_power: f64, fwhm: f64) -> Self {
        Self { peak_power, fwhm }
    }

    fn t0(&self) -> f64 { self.fwhm / (2.0 * (2.0_f64.sqrt() - 1.0).sqrt()) }
}

impl PulseEnvelope for LorentzianEnvelope {
    fn name(&self) -> &str { "Lorentzian" }

    fn evaluate(&self, t: f64) -> C64 {
        let x = t / self.t0();
        C64::from(self.peak_power.sqrt() / (1.0 + x * x))
    }
}

/// Arbitrary envelope defined by a caller-supplied function.
pub struct CustomEnvelope {
    name: String,
    f: Box<dyn Fn(f64) -> C64 + Send + Sync>,
}

impl CustomEnvelope {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where F: Fn(f64) -> C64 + Send + Sync + 'static
    {
        Self { name: name.into(), f: Box::new(f) }
    }
}

impl PulseEnvelope for CustomEnvelope {
    fn name(&self) -> &str { &self.name }

    fn evaluate(&self, t: f64) -> C64 { (self.f)(t) }
}

/// Envelope tabulated over a measured time axis, evaluated by linear
/// interpolation between samples and zero outside the tabulated range.
///
/// The time axis must be strictly increasing.
#[derive(Debug)]
pub struct SampledEnvelope {
    name: String,
    t: nd::Array1<f64>,
    a: nd::Array1<C64>,
}

impl SampledEnvelope {
    pub fn new(
        name: impl Into<String>,
        t: nd::Array1<f64>,
        a: nd::Array1<C64>,
    ) -> Result<Self, ConfigurationError> {
        ConfigurationError::check_lengths(&t, &a)?;
        Ok(Self { name: name.into(), t, a })
    }
}

impl PulseEnvelope for SampledEnvelope {
    fn name(&self) -> &str { &self.name }

    fn evaluate(&self, t: f64) -> C64 {
        let n = self.t.len();
        if n == 0 || t < self.t[0] || t > self.t[n - 1] {
            return C64::from(0.0);
        }
        let j = self.t.as_slice().unwrap()
            .partition_point(|&tk| tk <= t);
        if j == 0 {
            return self.a[0];
        } else if j >= n {
            return self.a[n - 1];
        }
        let (tl, tr) = (self.t[j - 1], self.t[j]);
        let w = if tr > tl { (t - tl) / (tr - tl) } else { 0.0 };
        self.a[j - 1] * (1.0 - w) + self.a[j] * w
    }
}
