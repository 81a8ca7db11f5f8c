use std::sync::{ Arc, atomic::AtomicBool };
use approx::assert_relative_eq;
use ndarray as nd;
use gnlse::{
    dispersion::TaylorDispersion,
    error::PropagationError,
    propagate::{ GnlseSetup, Propagator },
    pulse::{ GaussianEnvelope, PulseEnvelope, SechEnvelope },
    solution::RunStatus,
};

const T_FWHM: f64 = 0.100; // ps
const BETA2: f64 = -10.371877e-3; // ps²/m
const GAMMA: f64 = 0.47715253369; // 1/W/m

// sech duration parameter giving t₀ = T_FWHM
fn sech_fwhm() -> f64 {
    T_FWHM * 2.0 * 1.0_f64.asinh()
}

fn soliton_power() -> f64 {
    -BETA2 / (GAMMA * T_FWHM * T_FWHM)
}

// one soliton period (π/2)·t₀²/|β₂|
fn soliton_period() -> f64 {
    std::f64::consts::FRAC_PI_2 * T_FWHM * T_FWHM / BETA2.abs()
}

fn soliton_setup(power_scale: f64, fiber_length: f64) -> GnlseSetup {
    let mut setup = GnlseSetup::new(
        775.0,
        fiber_length,
        GAMMA,
        Box::new(SechEnvelope::new(power_scale * soliton_power(), sech_fwhm())),
        Box::new(TaylorDispersion::new(0.0, vec![BETA2]).unwrap()),
    );
    setup.resolution = 1 << 10;
    setup.time_window = 4.0;
    setup.z_saves = 3;
    setup.rtol = 1e-6;
    setup.atol = 1e-6;
    setup
}

fn linear_setup(loss_db: f64, fiber_length: f64) -> GnlseSetup {
    let mut setup = GnlseSetup::new(
        775.0,
        fiber_length,
        0.0,
        Box::new(GaussianEnvelope::new(10e3, T_FWHM)),
        Box::new(TaylorDispersion::new(loss_db, vec![-10.4e-3]).unwrap()),
    );
    setup.resolution = 1 << 10;
    setup.time_window = 12.5;
    setup.z_saves = 5;
    setup
}

#[test]
fn linear_propagation_conserves_energy() {
    let sol = Propagator::new(linear_setup(0.0, 2.0)).unwrap().run().unwrap();
    let last = sol.distances().len() - 1;
    assert_relative_eq!(
        sol.energy_at(last),
        sol.energy_at(0),
        max_relative = 1e-9,
    );
}

#[test]
fn loss_attenuates_at_the_field_rate() {
    // loss chosen so that α = 1/m: power decays by e⁻¹ over 1 m
    let loss_db = 10.0 / 10.0_f64.ln();
    let sol = Propagator::new(linear_setup(loss_db, 1.0)).unwrap().run().unwrap();
    let last = sol.distances().len() - 1;
    assert_relative_eq!(
        sol.energy_at(last) / sol.energy_at(0),
        (-1.0_f64).exp(),
        max_relative = 1e-9,
    );
}

#[test]
fn checkpoints_are_exact() {
    let fiber_length = 2.5;
    let sol = Propagator::new(linear_setup(0.0, fiber_length))
        .unwrap()
        .run()
        .unwrap();
    let zs = sol.distances();
    assert_eq!(zs[0], 0.0);
    assert_eq!(zs[zs.len() - 1], fiber_length);
    assert!(zs.iter().zip(zs.iter().skip(1)).all(|(a, b)| a < b));
    // the first checkpoint is the input envelope, unmodified
    let envelope = GaussianEnvelope::new(10e3, T_FWHM);
    let expected = envelope.sample(sol.time_axis());
    assert!(
        sol.field_at(0).iter().zip(&expected).all(|(a, b)| a == b)
    );
}

#[test]
fn fundamental_soliton_is_shape_invariant() {
    let sol = Propagator::new(soliton_setup(1.0, soliton_period()))
        .unwrap()
        .run()
        .unwrap();
    let last = sol.distances().len() - 1;
    let i0: nd::Array1<f64> = sol.field_at(0).mapv(|a| a.norm_sqr());
    let i1: nd::Array1<f64> = sol.field_at(last).mapv(|a| a.norm_sqr());
    let peak = i0.iter().cloned().fold(0.0, f64::max);
    let worst: f64
        = i0.iter().zip(&i1)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    assert!(
        worst / peak < 0.02,
        "soliton distorted by {:.3}% of peak", 100.0 * worst / peak,
    );
}

#[test]
fn off_soliton_power_changes_the_late_shape() {
    // at twice the soliton power the pulse compresses instead of holding
    // its shape; compare self-normalized profiles after half a period
    let z = soliton_period() / 2.0;
    let sol1 = Propagator::new(soliton_setup(1.0, z)).unwrap().run().unwrap();
    let sol2 = Propagator::new(soliton_setup(2.0, z)).unwrap().run().unwrap();
    let last = sol1.distances().len() - 1;
    let normalized = |sol: &gnlse::solution::Solution| {
        let i: nd::Array1<f64> = sol.field_at(last).mapv(|a| a.norm_sqr());
        let peak = i.iter().cloned().fold(0.0, f64::max);
        i.mapv(|x| x / peak)
    };
    let n1 = normalized(&sol1);
    let n2 = normalized(&sol2);
    let diff: f64
        = n1.iter().zip(&n2)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max);
    assert!(diff > 0.02, "profiles indistinguishable: max diff {diff:.4}");
}

#[test]
fn spectrum_is_centered_on_the_carrier() {
    let setup = linear_setup(0.0, 1.0);
    let w0 = gnlse::units::wavelength_to_omega(setup.wavelength);
    let sol = Propagator::new(setup).unwrap().run().unwrap();
    let spectrum = sol.spectrum_at(0);
    let freqs = sol.frequency_axis();
    let (argmax, _)
        = spectrum.iter().enumerate()
        .map(|(k, a)| (k, a.norm()))
        .fold((0, 0.0), |acc, x| if x.1 > acc.1 { x } else { acc });
    let dw = freqs[1] - freqs[0];
    assert!((freqs[argmax] - w0).abs() <= dw);
}

fn unresolvable_setup() -> GnlseSetup {
    // extreme nonlinearity on a coarse grid with very tight tolerances:
    // the step controller cannot resolve the dynamics
    let mut setup = GnlseSetup::new(
        775.0,
        100.0,
        100.0,
        Box::new(SechEnvelope::new(1e7, T_FWHM)),
        Box::new(TaylorDispersion::new(0.0, vec![BETA2]).unwrap()),
    );
    setup.resolution = 1 << 8;
    setup.time_window = 12.5;
    setup.z_saves = 10;
    setup.rtol = 1e-12;
    setup.atol = 1e-12;
    setup
}

#[test]
fn unresolvable_dynamics_fail_loudly() {
    let res = Propagator::new(unresolvable_setup()).unwrap().run();
    assert!(matches!(
        res,
        Err(PropagationError::ToleranceFailure { .. })
            | Err(PropagationError::NumericalDivergence { .. })
    ));
}

#[test]
fn failed_runs_keep_recorded_checkpoints() {
    let sol = Propagator::new(unresolvable_setup()).unwrap().run_partial();
    assert!(!sol.is_complete());
    assert!(sol.failure().is_some());
    assert!(sol.is_valid(0));
    let last = sol.distances().len() - 1;
    assert!(!sol.is_valid(last));
    // the axes are intact even though the run died
    assert_eq!(sol.distances()[0], 0.0);
    assert_eq!(sol.distances()[last], 100.0);
}

#[test]
fn cancellation_aborts_between_steps() {
    let flag = Arc::new(AtomicBool::new(true));
    let mut setup = soliton_setup(1.0, soliton_period());
    setup.cancel = Some(flag);
    let sol = Propagator::new(setup).unwrap().run_partial();
    assert!(!sol.is_complete());
    match sol.status() {
        RunStatus::Failed {
            reason: PropagationError::Cancelled { .. }, ..
        } => {}
        other => panic!("expected cancellation, got {other:?}"),
    }
    assert!(sol.is_valid(0));
    assert!(!sol.is_valid(1));
}

#[test]
fn raman_and_steepening_run_completes() {
    // smoke test of the full nonlinear operator over a short fiber
    let mut setup = soliton_setup(1.0, 0.05);
    setup.self_steepening = true;
    setup.raman = Some(Box::new(gnlse::raman::BlowWoodRaman::new()));
    let sol = Propagator::new(setup).unwrap().run().unwrap();
    assert!(sol.is_complete());
    let last = sol.distances().len() - 1;
    // energy cannot grow without gain
    assert!(sol.energy_at(last) <= sol.energy_at(0) * (1.0 + 1e-6));
}

#[test]
fn rejects_bad_configuration() {
    use gnlse::error::ConfigurationError;

    let make = || soliton_setup(1.0, 1.0);

    let mut setup = make();
    setup.z_saves = 1;
    assert!(matches!(
        Propagator::new(setup),
        Err(ConfigurationError::BadZSaves(1)),
    ));

    let mut setup = make();
    setup.fiber_length = 0.0;
    assert!(matches!(
        Propagator::new(setup),
        Err(ConfigurationError::BadFiberLength(_)),
    ));

    let mut setup = make();
    setup.resolution = 0;
    assert!(matches!(
        Propagator::new(setup),
        Err(ConfigurationError::BadResolution),
    ));

    let mut setup = make();
    setup.rtol = 0.0;
    assert!(matches!(
        Propagator::new(setup),
        Err(ConfigurationError::BadTolerance(_, _)),
    ));
}
