//! Discretized time and angular-frequency axes for a single simulation run.

use ndarray as nd;
use crate::{ error::ConfigurationError, utils };

/// Uniform time grid together with its discrete-Fourier-conjugate
/// angular-frequency grid.
///
/// The time axis holds `resolution` samples spanning `[-T/2, T/2)`; the
/// angular-frequency axis holds the matching offsets Δω from the carrier in
/// unshifted (FFT) storage order, with resolution `2π/T` and Nyquist range
/// `±π·resolution/T`. Both axes are computed once at construction and are
/// immutable afterward; each simulation run owns its own grid.
#[derive(Clone, Debug)]
pub struct Grid {
    t: nd::Array1<f64>,
    omega: nd::Array1<f64>,
    dt: f64,
}

impl Grid {
    /// Construct a grid of `resolution` samples over a total time window of
    /// `time_window` (ps).
    pub fn new(resolution: usize, time_window: f64)
        -> Result<Self, ConfigurationError>
    {
        ConfigurationError::check_resolution(resolution)?;
        ConfigurationError::check_time_window(time_window)?;
        let n = resolution;
        let dt = time_window / n as f64;
        let t: nd::Array1<f64>
            = (0..n)
            .map(|k| -time_window / 2.0 + k as f64 * dt)
            .collect();
        let omega = utils::fft_omega(n, dt);
        Ok(Self { t, omega, dt })
    }

    /// Number of samples.
    pub fn len(&self) -> usize { self.t.len() }

    /// Time axis (ps), centered on zero.
    pub fn time(&self) -> &nd::Array1<f64> { &self.t }

    /// Angular-frequency offsets from the carrier (rad/ps), in unshifted
    /// (FFT) storage order.
    pub fn omega(&self) -> &nd::Array1<f64> { &self.omega }

    /// Sample spacing (ps).
    pub fn dt(&self) -> f64 { self.dt }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn axes_are_transform_conjugates() {
        let n = 256;
        let window = 12.5;
        let grid = Grid::new(n, window).unwrap();
        assert_eq!(grid.len(), n);
        assert!((grid.dt() - window / n as f64).abs() < 1e-15);
        assert!((grid.time()[0] + window / 2.0).abs() < 1e-12);
        // uniform spacing, half-open window: the last sample is one dt short
        // of +T/2
        let t = grid.time();
        assert!((t[n - 1] - (window / 2.0 - grid.dt())).abs() < 1e-12);
        // frequency resolution 2π/T, Nyquist at ±πN/T
        let w = grid.omega();
        assert!((w[1] - 2.0 * PI / window).abs() < 1e-12);
        let min = w.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!((min + PI * n as f64 / window).abs() < 1e-9);
    }

    #[test]
    fn rejects_degenerate_configuration() {
        assert_eq!(
            Grid::new(0, 12.5).unwrap_err(),
            ConfigurationError::BadResolution,
        );
        assert_eq!(
            Grid::new(256, 0.0).unwrap_err(),
            ConfigurationError::BadTimeWindow(0.0),
        );
        assert!(Grid::new(256, -1.0).is_err());
    }
}
