//! Recorded propagation trajectories.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::PropagationError,
    units,
    utils::{ fft, fft_omega, fft_shift, pulse_energy },
};

/// Terminal state of an integration run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunStatus {
    /// The field reached the fiber end with every checkpoint recorded.
    Completed,
    /// The run stopped at distance `at` (m) for the given reason.
    Failed { at: f64, reason: PropagationError },
}

/// The sampled spatio-temporal trajectory of one (possibly partial) run.
///
/// Rows of the field array index saved distances; columns index the time
/// axis. Spectral views are derived on demand and frequency-shifted so the
/// carrier sits at the center of the axis. All accessors are side-effect
/// free and callable repeatedly; nothing mutates after construction.
pub struct Solution {
    t: nd::Array1<f64>,
    Z: nd::Array1<f64>,
    field: nd::Array2<C64>,
    valid: Vec<bool>,
    status: RunStatus,
    w0: f64,
    dt: f64,
}

impl Solution {
    pub(crate) fn new(
        t: nd::Array1<f64>,
        Z: nd::Array1<f64>,
        field: nd::Array2<C64>,
        valid: Vec<bool>,
        status: RunStatus,
        w0: f64,
        dt: f64,
    ) -> Self {
        Self { t, Z, field, valid, status, w0, dt }
    }

    /// Saved distances (m); strictly increasing, beginning at 0 and ending
    /// at the fiber length.
    pub fn distances(&self) -> &nd::Array1<f64> { &self.Z }

    /// Shared time axis (ps).
    pub fn time_axis(&self) -> &nd::Array1<f64> { &self.t }

    /// Complex envelope over the time axis at checkpoint `k`.
    ///
    /// *Panics if `k` is out of range*.
    pub fn field_at(&self, k: usize) -> nd::ArrayView1<C64> {
        self.field.slice(nd::s![k, ..])
    }

    /// The whole recorded field, distances × time.
    pub fn field(&self) -> &nd::Array2<C64> { &self.field }

    /// Spectral envelope at checkpoint `k`: the Fourier transform of
    /// [`Self::field_at`], shifted to center the carrier and scaled by the
    /// sample spacing to approximate the continuous transform.
    ///
    /// *Panics if `k` is out of range*.
    pub fn spectrum_at(&self, k: usize) -> nd::Array1<C64> {
        let mut AW = fft(&self.field.slice(nd::s![k, ..]));
        AW.map_inplace(|ak| { *ak *= self.dt; });
        fft_shift(&AW)
    }

    /// Absolute angular frequencies (rad/ps) accompanying
    /// [`Self::spectrum_at`], in shifted (monotonic) order.
    pub fn frequency_axis(&self) -> nd::Array1<f64> {
        let shifted: nd::Array1<f64>
            = fft_shift(&fft_omega(self.t.len(), self.dt));
        shifted.mapv(|dw| self.w0 + dw)
    }

    /// Vacuum wavelengths (nm) accompanying [`Self::spectrum_at`].
    ///
    /// Grid frequencies at or below zero have no physical wavelength and
    /// map to NaN; plotting layers are expected to restrict their range.
    pub fn wavelength_axis(&self) -> nd::Array1<f64> {
        self.frequency_axis().mapv(|w| {
            if w > 0.0 { units::omega_to_wavelength(w) } else { f64::NAN }
        })
    }

    /// Terminal run status.
    pub fn status(&self) -> &RunStatus { &self.status }

    /// The failure reason, if the run did not complete.
    pub fn failure(&self) -> Option<&PropagationError> {
        match &self.status {
            RunStatus::Completed => None,
            RunStatus::Failed { reason, .. } => Some(reason),
        }
    }

    /// Whether the run recorded every checkpoint.
    pub fn is_complete(&self) -> bool {
        matches!(self.status, RunStatus::Completed)
    }

    /// Whether checkpoint `k` holds recorded data: always true for a
    /// completed run, false past the failure point of a failed one.
    ///
    /// *Panics if `k` is out of range*.
    pub fn is_valid(&self, k: usize) -> bool { self.valid[k] }

    /// Pulse energy `∫|A|² dt` (W·ps) at checkpoint `k`.
    ///
    /// *Panics if `k` is out of range*.
    pub fn energy_at(&self, k: usize) -> f64 {
        pulse_energy(&self.field.slice(nd::s![k, ..]), self.dt)
    }
}
