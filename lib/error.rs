//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;

/// Returned when a simulation configuration fails validation.
///
/// All variants are raised synchronously at construction time, before any
/// integration begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Returned when the grid resolution is zero.
    #[error("grid resolution must be greater than 0")]
    BadResolution,

    /// Returned when a non-positive time window is encountered.
    #[error("time window must be greater than 0; got {0}")]
    BadTimeWindow(f64),

    /// Returned when a non-positive fiber length is encountered.
    #[error("fiber length must be greater than 0; got {0}")]
    BadFiberLength(f64),

    /// Returned when fewer than 2 distance checkpoints are requested; the
    /// fiber start and end must always be recorded.
    #[error("at least 2 distance checkpoints are required; got {0}")]
    BadZSaves(usize),

    /// Returned when a non-positive central wavelength is encountered.
    #[error("central wavelength must be greater than 0; got {0} nm")]
    BadWavelength(f64),

    /// Returned when a non-positive adaptive-step tolerance is encountered.
    #[error("solver tolerances must be greater than 0; got rtol = {0}, atol = {1}")]
    BadTolerance(f64, f64),

    /// Returned when a dispersion operator is built from an empty Taylor
    /// coefficient sequence.
    #[error("dispersion requires at least one Taylor coefficient")]
    EmptyDispersion,

    /// Returned when an operation requiring equal-length arrays encounters
    /// arrays with unequal length.
    #[error("encountered arrays with incompatible lengths; got {0} and {1}")]
    Length(usize, usize),
}

impl ConfigurationError {
    pub(crate) fn check_resolution(n: usize) -> Result<(), Self> {
        (n > 0).then_some(()).ok_or(Self::BadResolution)
    }

    pub(crate) fn check_time_window(t: f64) -> Result<(), Self> {
        (t > 0.0).then_some(()).ok_or(Self::BadTimeWindow(t))
    }

    pub(crate) fn check_fiber_length(l: f64) -> Result<(), Self> {
        (l > 0.0).then_some(()).ok_or(Self::BadFiberLength(l))
    }

    pub(crate) fn check_z_saves(n: usize) -> Result<(), Self> {
        (n >= 2).then_some(()).ok_or(Self::BadZSaves(n))
    }

    pub(crate) fn check_wavelength(wl: f64) -> Result<(), Self> {
        (wl > 0.0).then_some(()).ok_or(Self::BadWavelength(wl))
    }

    pub(crate) fn check_tolerances(rtol: f64, atol: f64) -> Result<(), Self> {
        (rtol > 0.0 && atol > 0.0).then_some(())
            .ok_or(Self::BadTolerance(rtol, atol))
    }

    pub(crate) fn check_lengths<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self::Length(na, nb))
    }
}

/// Returned when an integration run terminates before reaching the fiber end.
///
/// The distance fields locate the failure along the propagation coordinate;
/// the partially filled [`Solution`][crate::solution::Solution] remains
/// available through
/// [`Propagator::run_partial`][crate::propagate::Propagator::run_partial].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    /// Returned when the field acquires non-finite values during integration,
    /// typically from exploding nonlinearity or unresolved spectral
    /// bandwidth.
    #[error("field became non-finite at z = {z:.6e} m; last checkpoint recorded at {last_checkpoint:.6e} m")]
    NumericalDivergence { z: f64, last_checkpoint: f64 },

    /// Returned when the adaptive step size collapses below its minimum
    /// threshold without satisfying the error tolerance.
    #[error("step size fell below {h_min:.3e} m at z = {z:.6e} m without satisfying tolerance")]
    ToleranceFailure { z: f64, h_min: f64 },

    /// Returned when a run is aborted through its cancellation flag.
    #[error("run cancelled at z = {z:.6e} m")]
    Cancelled { z: f64 },
}

/// Any error returned by the engine.
#[derive(Debug, Error)]
pub enum GnlseError {
    /// [`ConfigurationError`]
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// [`PropagationError`]
    #[error("propagation error: {0}")]
    Propagation(#[from] PropagationError),
}
