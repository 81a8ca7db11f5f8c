//! Miscellaneous numerical tools: Fourier transforms, frequency-axis
//! generation, and integrals over sampled fields.

use std::f64::consts::TAU;
use std::sync::Arc;
use ndarray::{ self as nd, Ix1, concatenate };
use num_traits::Num;
use rustfft as fft;
use num_complex::Complex64 as C64;

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Num + Copy,
{
    let n: usize = y.len();
    let two = A::one() + A::one();
    (dx / two) * (y[0] + two * y.slice(nd::s![1..n - 1]).sum() + y[n - 1])
}

/// Calculate the energy `∫|A(t)|² dt` of a sampled envelope via the
/// trapezoidal rule.
///
/// *Panics if `a` has length less than 2*.
pub fn pulse_energy<S>(a: &nd::ArrayBase<S, Ix1>, dt: f64) -> f64
where S: nd::Data<Elem = C64>
{
    trapz(&a.mapv(|ak| ak.norm_sqr()), dt)
}

/// Generate an array of angular-frequency coordinates to accompany a FFT of
/// `n` points for sampling time `dt`, in unshifted (FFT) storage order.
pub fn fft_omega(n: usize, dt: f64) -> nd::Array1<f64> {
    let m = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    let dw = TAU * (n as f64 * dt).recip();
    (0..n)
        .map(|i| {
            if i < m {
                i as f64 * dw
            } else {
                -((n - i) as f64) * dw
            }
        })
        .collect()
}

/// Perform the one-dimensional, complex-valued FFT.
pub fn fft<S>(x: &nd::ArrayBase<S, Ix1>) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let n: usize = x.len();
    let mut f = x.to_owned();
    let mut plan = fft::FftPlanner::new();
    let fft_plan = plan.plan_fft_forward(n);
    fft_plan.process(f.as_slice_mut().unwrap());
    f
}

/// Return a copy of `x` with indices shifted to map super-Nyquist frequency
/// components to negative frequencies.
pub fn fft_shift<S, A>(x: &nd::ArrayBase<S, Ix1>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Clone,
{
    let n = x.len();
    let (p, m)
        = if n % 2 == 0 {
            x.view().split_at(nd::Axis(0), n / 2)
        } else {
            x.view().split_at(nd::Axis(0), n / 2 + 1)
        };
    concatenate!(nd::Axis(0), m.into_owned(), p.into_owned())
}

/// Pre-planned forward/inverse transform pair for a fixed grid size.
///
/// The integrator evaluates several transforms per internal step; planning
/// once and reusing the plans keeps the transform decomposition out of the
/// hot loop.
#[derive(Clone)]
pub(crate) struct FftPair {
    n: usize,
    fwd: Arc<dyn fft::Fft<f64>>,
    inv: Arc<dyn fft::Fft<f64>>,
}

impl FftPair {
    pub(crate) fn new(n: usize) -> Self {
        let mut plan = fft::FftPlanner::new();
        let fwd = plan.plan_fft_forward(n);
        let inv = plan.plan_fft_inverse(n);
        Self { n, fwd, inv }
    }

    /// Forward transform in place.
    pub(crate) fn fft_inplace<S>(&self, f: &mut nd::ArrayBase<S, Ix1>)
    where S: nd::DataMut<Elem = C64>
    {
        self.fwd.process(f.as_slice_mut().unwrap());
    }

    /// Inverse transform in place, including the 1/N normalization.
    pub(crate) fn ifft_inplace<S>(&self, x: &mut nd::ArrayBase<S, Ix1>)
    where S: nd::DataMut<Elem = C64>
    {
        self.inv.process(x.as_slice_mut().unwrap());
        let n = self.n as f64;
        x.map_inplace(|xk| { *xk /= n; });
    }
}
