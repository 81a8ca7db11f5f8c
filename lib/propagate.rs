//! Interaction-picture, adaptive-step integration of the GNLSE along the
//! propagation coordinate.
//!
//! The integrator state is the frequency-domain interaction-picture field
//! `Ψ(z) = exp(-D z)·Ã(z)`, with D the sampled dispersion transfer exponent,
//! so the linear operator is applied analytically and the embedded
//! Dormand-Prince 5(4) pair advances only the nonlinear residual. Each
//! internal step returns to the lab frame, evaluates the nonlinear operator
//! in the time domain, and removes the linear phase again; the stepsize is
//! adapted against a mixed absolute/relative error tolerance.
//!
//! A run moves through `Initialized → Stepping → {Completed | Failed}`:
//! construction of a [`Propagator`] performs all configuration validation,
//! [`Propagator::run`] (or [`run_partial`][Propagator::run_partial]) drives
//! the stepping, and the terminal state is recorded on the returned
//! [`Solution`] as its [`RunStatus`].

use std::sync::{ Arc, atomic::{ AtomicBool, Ordering } };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    dispersion::Dispersion,
    error::{ ConfigurationError, PropagationError },
    grid::Grid,
    nonlinear::NonlinearOperator,
    pulse::PulseEnvelope,
    raman::RamanResponse,
    solution::{ RunStatus, Solution },
    units,
    utils::FftPair,
};

pub type PResult<T> = Result<T, PropagationError>;

// safety numbers -- particular to the fifth-order advance of the
// dormand-prince pair
const SAFE1: f64 = 0.9;
const SAFE2: f64 = 4.0;
// hard floor on the step size, relative to the fiber length
const H_MIN_FRAC: f64 = 1e-12;
// bound on consecutive rejections of a single step
const MAX_SHRINKS: usize = 100;

/// Full description of a single simulation run.
///
/// Mirrors the configuration a driver script assembles: numerical
/// parameters first, then the physical model. All fields are public;
/// construct with [`Self::new`] and override as needed before handing the
/// setup to a [`Propagator`].
pub struct GnlseSetup {
    /// Number of grid points (conventionally a power of two).
    pub resolution: usize,
    /// Total temporal span (ps).
    pub time_window: f64,
    /// Number of distance checkpoints to record, including both fiber ends.
    pub z_saves: usize,
    /// Relative tolerance for the adaptive stepper.
    pub rtol: f64,
    /// Absolute tolerance for the adaptive stepper.
    pub atol: f64,
    /// Central wavelength (nm).
    pub wavelength: f64,
    /// Nonlinear coefficient γ (1/W/m).
    pub nonlinearity: f64,
    /// Fiber length (m).
    pub fiber_length: f64,
    /// Include the shock (self-steepening) correction.
    pub self_steepening: bool,
    /// Initial pulse shape.
    pub pulse: Box<dyn PulseEnvelope>,
    /// Linear dispersion operator.
    pub dispersion: Box<dyn Dispersion>,
    /// Optional delayed Raman response.
    pub raman: Option<Box<dyn RamanResponse>>,
    /// Optional cooperative cancellation flag, checked between internal
    /// steps.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl GnlseSetup {
    /// Construct a setup with the numerical parameters defaulted to the
    /// values used by the reference drivers: 2¹³ grid points over 12.5 ps,
    /// 200 checkpoints, rtol = atol = 1e-6.
    pub fn new(
        wavelength: f64,
        fiber_length: f64,
        nonlinearity: f64,
        pulse: Box<dyn PulseEnvelope>,
        dispersion: Box<dyn Dispersion>,
    ) -> Self {
        Self {
            resolution: 1 << 13,
            time_window: 12.5,
            z_saves: 200,
            rtol: 1e-6,
            atol: 1e-6,
            wavelength,
            nonlinearity,
            fiber_length,
            self_steepening: false,
            pulse,
            dispersion,
            raman: None,
            cancel: None,
        }
    }
}

/// A validated, ready-to-run integrator for one simulation.
///
/// Construction performs all configuration validation, so a propagator that
/// exists can only fail for numerical reasons. Each propagator owns its
/// grid and drives exactly one run.
pub struct Propagator {
    grid: Grid,
    w0: f64,
    D: nd::Array1<C64>,
    nonlinear: NonlinearOperator,
    A0: nd::Array1<C64>,
    Z: nd::Array1<f64>,
    rtol: f64,
    atol: f64,
    h_min: f64,
    fiber_length: f64,
    cancel: Option<Arc<AtomicBool>>,
    plans: FftPair,
}

impl Propagator {
    pub fn new(setup: GnlseSetup) -> Result<Self, ConfigurationError> {
        ConfigurationError::check_fiber_length(setup.fiber_length)?;
        ConfigurationError::check_z_saves(setup.z_saves)?;
        ConfigurationError::check_wavelength(setup.wavelength)?;
        ConfigurationError::check_tolerances(setup.rtol, setup.atol)?;
        let grid = Grid::new(setup.resolution, setup.time_window)?;
        let w0 = units::wavelength_to_omega(setup.wavelength);
        let D = setup.dispersion.sample(grid.omega());
        let nonlinear = NonlinearOperator::new(
            &grid,
            w0,
            setup.nonlinearity,
            setup.self_steepening,
            setup.raman.as_deref(),
        );
        let A0 = setup.pulse.sample(grid.time());
        let L = setup.fiber_length;
        let n_saves = setup.z_saves;
        let Z: nd::Array1<f64>
            = (0..n_saves)
            .map(|k| k as f64 / (n_saves - 1) as f64 * L)
            .collect();
        let plans = FftPair::new(grid.len());
        Ok(Self {
            grid,
            w0,
            D,
            nonlinear,
            A0,
            Z,
            rtol: setup.rtol,
            atol: setup.atol,
            h_min: H_MIN_FRAC * L,
            fiber_length: L,
            cancel: setup.cancel,
            plans,
        })
    }

    /// The grid this run integrates over.
    pub fn grid(&self) -> &Grid { &self.grid }

    // derivative of the interaction-picture field: return to the lab frame,
    // evaluate the nonlinear operator in the time domain, and remove the
    // accumulated linear phase again
    fn rhs(&self, z: f64, PSI: &nd::Array1<C64>) -> nd::Array1<C64> {
        let mut At: nd::Array1<C64>
            = nd::Zip::from(PSI).and(&self.D)
            .map_collect(|pk, dk| *pk * (*dk * z).exp());
        self.plans.ifft_inplace(&mut At);
        let mut NW = self.nonlinear.evaluate(&At);
        nd::Zip::from(&mut NW).and(&self.D)
            .for_each(|nk, dk| { *nk *= (*dk * (-z)).exp(); });
        NW
    }

    /// Run the integration, returning the trajectory unconditionally.
    ///
    /// On failure the returned solution is tagged with the failure and the
    /// checkpoints recorded up to that point remain readable; see
    /// [`Solution::is_valid`].
    pub fn run_partial(self) -> Solution {
        let n = self.grid.len();
        let n_saves = self.Z.len();
        let mut field: nd::Array2<C64> = nd::Array2::zeros((n_saves, n));
        let mut valid: Vec<bool> = vec![false; n_saves];

        // checkpoint 0 is the unmodified input field
        field.slice_mut(nd::s![0, ..]).assign(&self.A0);
        valid[0] = true;

        let mut PSI = self.A0.clone();
        self.plans.fft_inplace(&mut PSI);
        let h0 = self.fiber_length / (n_saves - 1) as f64;
        let mut stepper = AdaptiveStepper::new(
            PSI,
            h0,
            self.rtol,
            self.atol,
            self.h_min,
            self.cancel.clone(),
        );

        let mut status = RunStatus::Completed;
        let mut last_checkpoint = 0.0;
        for (k, &zk) in self.Z.iter().enumerate().skip(1) {
            let advanced = stepper
                .advance_to(zk, &mut |z, y| self.rhs(z, y))
                .and_then(|_| {
                    stepper.y.iter().all(|c| c.is_finite())
                        .then_some(())
                        .ok_or(PropagationError::NumericalDivergence {
                            z: stepper.z,
                            last_checkpoint,
                        })
                });
            if let Err(reason) = advanced {
                status = RunStatus::Failed { at: stepper.z, reason };
                break;
            }
            // return from the interaction picture and record in the lab
            // frame
            let mut At: nd::Array1<C64>
                = nd::Zip::from(&stepper.y).and(&self.D)
                .map_collect(|pk, dk| *pk * (*dk * zk).exp());
            self.plans.ifft_inplace(&mut At);
            At.move_into(field.slice_mut(nd::s![k, ..]));
            valid[k] = true;
            last_checkpoint = zk;
        }

        let dt = self.grid.dt();
        Solution::new(
            self.grid.time().to_owned(),
            self.Z,
            field,
            valid,
            status,
            self.w0,
            dt,
        )
    }

    /// Run the integration to completion.
    ///
    /// Discards partial output on failure; use [`Self::run_partial`] to
    /// keep whatever checkpoints were recorded.
    pub fn run(self) -> PResult<Solution> {
        let sol = self.run_partial();
        match sol.failure().cloned() {
            None => Ok(sol),
            Some(reason) => Err(reason),
        }
    }
}

// perform the operation `y + h Σᵢ aᵢ kᵢ` succinctly
fn rk_stage(
    y: &nd::Array1<C64>,
    h: f64,
    terms: &[(f64, &nd::Array1<C64>)],
) -> nd::Array1<C64> {
    let mut out = y.to_owned();
    for (a, k) in terms {
        nd::Zip::from(&mut out).and(*k)
            .for_each(|ok, kk| { *ok += *kk * (h * *a); });
    }
    out
}

// estimate the ratio between the local truncation error and the mixed
// absolute/relative tolerance; acceptance is `ratio <= 1`
fn error_ratio(
    y: &nd::Array1<C64>,
    y_new: &nd::Array1<C64>,
    err: &nd::Array1<C64>,
    atol: f64,
    rtol: f64,
) -> f64 {
    let sum: f64
        = y.iter().zip(y_new).zip(err)
        .map(|((yk, ynk), ek)| {
            let scale = atol + rtol * yk.norm().max(ynk.norm());
            (ek.norm() / scale).powi(2)
        })
        .sum();
    (sum / y.len() as f64).sqrt()
}

// take a single step of the dormand-prince 5(4) embedded pair, returning
// the fifth-order advance and the per-element difference between the two
// embedded orders
fn dp45_step<F>(f: &mut F, z: f64, y: &nd::Array1<C64>, h: f64)
    -> (nd::Array1<C64>, nd::Array1<C64>)
where F: FnMut(f64, &nd::Array1<C64>) -> nd::Array1<C64>
{
    let k1 = f(z, y);
    let k2 = f(z + h / 5.0, &rk_stage(y, h, &[(0.2, &k1)]));
    let k3 = f(
        z + 3.0 * h / 10.0,
        &rk_stage(y, h, &[(3.0 / 40.0, &k1), (9.0 / 40.0, &k2)]),
    );
    let k4 = f(
        z + 4.0 * h / 5.0,
        &rk_stage(y, h, &[
            (44.0 / 45.0, &k1),
            (-56.0 / 15.0, &k2),
            (32.0 / 9.0, &k3),
        ]),
    );
    let k5 = f(
        z + 8.0 * h / 9.0,
        &rk_stage(y, h, &[
            (19372.0 / 6561.0, &k1),
            (-25360.0 / 2187.0, &k2),
            (64448.0 / 6561.0, &k3),
            (-212.0 / 729.0, &k4),
        ]),
    );
    let k6 = f(
        z + h,
        &rk_stage(y, h, &[
            (9017.0 / 3168.0, &k1),
            (-355.0 / 33.0, &k2),
            (46732.0 / 5247.0, &k3),
            (49.0 / 176.0, &k4),
            (-5103.0 / 18656.0, &k5),
        ]),
    );
    let y_new = rk_stage(y, h, &[
        (35.0 / 384.0, &k1),
        (500.0 / 1113.0, &k3),
        (125.0 / 192.0, &k4),
        (-2187.0 / 6784.0, &k5),
        (11.0 / 84.0, &k6),
    ]);
    let k7 = f(z + h, &y_new);
    let zero: nd::Array1<C64> = nd::Array1::zeros(y.len());
    let err = rk_stage(&zero, h, &[
        (71.0 / 57600.0, &k1),
        (-71.0 / 16695.0, &k3),
        (71.0 / 1920.0, &k4),
        (-17253.0 / 339200.0, &k5),
        (22.0 / 525.0, &k6),
        (-1.0 / 40.0, &k7),
    ]);
    (y_new, err)
}

/// Adaptive-step driver for the embedded pair, tracking position, state,
/// and the proposed step size.
///
/// Kept separate from the GNLSE specifics so the accept/shrink/grow logic
/// can be exercised against arbitrary right-hand sides.
pub(crate) struct AdaptiveStepper {
    pub(crate) z: f64,
    pub(crate) h: f64,
    pub(crate) y: nd::Array1<C64>,
    rtol: f64,
    atol: f64,
    h_min: f64,
    cancel: Option<Arc<AtomicBool>>,
}

impl AdaptiveStepper {
    pub(crate) fn new(
        y0: nd::Array1<C64>,
        h0: f64,
        rtol: f64,
        atol: f64,
        h_min: f64,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self { z: 0.0, h: h0, y: y0, rtol, atol, h_min, cancel }
    }

    /// Advance the state to exactly `target`, adapting the internal step
    /// and never stepping past it.
    pub(crate) fn advance_to<F>(&mut self, target: f64, f: &mut F)
        -> PResult<()>
    where F: FnMut(f64, &nd::Array1<C64>) -> nd::Array1<C64>
    {
        while self.z < target {
            self.step_to_at_most(target, f)?;
        }
        Ok(())
    }

    // take one accepted step of size at most `target - z`, shrinking and
    // retrying on tolerance failure without advancing z
    fn step_to_at_most<F>(&mut self, target: f64, f: &mut F) -> PResult<()>
    where F: FnMut(f64, &nd::Array1<C64>) -> nd::Array1<C64>
    {
        if let Some(flag) = self.cancel.as_ref() {
            if flag.load(Ordering::Relaxed) {
                return Err(PropagationError::Cancelled { z: self.z });
            }
        }
        for _ in 0..MAX_SHRINKS {
            let clamped = self.h >= target - self.z;
            let h = if clamped { target - self.z } else { self.h };
            let (y_new, err) = dp45_step(f, self.z, &self.y, h);
            let er = error_ratio(&self.y, &y_new, &err, self.atol, self.rtol);
            if er <= 1.0 {
                // accept, landing exactly on the target when clamped, and
                // grow the proposal for the next step
                let grow = if er == 0.0 {
                    SAFE2
                } else {
                    (SAFE1 * er.powf(-0.2)).clamp(1.0 / SAFE2, SAFE2)
                };
                self.z = if clamped { target } else { self.z + h };
                self.h = h * grow;
                self.y = y_new;
                return Ok(());
            }
            // reject: shrink and retry without advancing; a non-finite
            // ratio contracts at the maximum rate
            let shrink = if er.is_finite() {
                (SAFE1 * er.powf(-0.2)).max(1.0 / SAFE2)
            } else {
                1.0 / SAFE2
            };
            self.h = h * shrink;
            if self.h < self.h_min {
                return Err(PropagationError::ToleranceFailure {
                    z: self.z,
                    h_min: self.h_min,
                });
            }
        }
        Err(PropagationError::ToleranceFailure {
            z: self.z,
            h_min: self.h_min,
        })
    }
}
