//! Time-domain nonlinear operator: Kerr effect, self-steepening, and the
//! delayed Raman contribution.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    grid::Grid,
    raman::RamanResponse,
    utils::{ FftPair, fft_shift },
};

// frequency-domain convolution kernel and fractional weight of the delayed
// response
struct RamanTerms {
    fr: f64,
    freq: nd::Array1<C64>,
}

/// Evaluates the nonlinear contribution to the field derivative per unit
/// length.
///
/// Given a time-domain field A(t), computes the frequency-domain derivative
/// term
/// ```text
/// i (γ/ω₀) W(ω) F{ A · ((1 - f_R) |A|² + f_R (h ∗ |A|²)) }
/// ```
/// where `W(ω) = ω₀ + Δω` when self-steepening is enabled and `W = ω₀`
/// otherwise, so that without self-steepening the prefactor reduces to the
/// plain Kerr coefficient γ. Without a Raman model the intensity factor is
/// the instantaneous |A|² alone.
///
/// The product is always formed in the time domain; evaluation costs one
/// forward transform, plus one additional transform pair when a Raman model
/// is present.
pub struct NonlinearOperator {
    gamma_w0: f64,
    W: nd::Array1<f64>,
    raman: Option<RamanTerms>,
    plans: FftPair,
}

impl NonlinearOperator {
    /// Build the operator for one grid and carrier angular frequency `w0`
    /// (rad/ps), with nonlinear coefficient `gamma` (1/W/m).
    pub fn new(
        grid: &Grid,
        w0: f64,
        gamma: f64,
        self_steepening: bool,
        raman: Option<&dyn RamanResponse>,
    ) -> Self {
        let W: nd::Array1<f64>
            = if self_steepening {
                grid.omega().mapv(|dw| w0 + dw)
            } else {
                nd::Array1::from_elem(grid.len(), w0)
            };
        let plans = FftPair::new(grid.len());
        let raman = raman.map(|model| {
            let h = model.sample(grid.time(), grid.dt());
            // the kernel is sampled on the zero-centered time axis; rotate
            // t = 0 to index 0 before transforming so the convolution theorem
            // applies without an extra phase ramp
            let mut hw: nd::Array1<C64> = fft_shift(&h).mapv(C64::from);
            plans.fft_inplace(&mut hw);
            // fold the dt of the convolution integral into the kernel
            hw.map_inplace(|hk| { *hk *= grid.dt(); });
            RamanTerms { fr: model.fraction(), freq: hw }
        });
        Self { gamma_w0: gamma / w0, W, raman, plans }
    }

    /// Evaluate the frequency-domain nonlinear derivative contribution for a
    /// time-domain field.
    pub fn evaluate<S>(&self, At: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = C64>
    {
        let IT: nd::Array1<f64> = At.mapv(|ak| ak.norm_sqr());
        let mix: nd::Array1<C64> = match &self.raman {
            None => IT.mapv(C64::from),
            Some(RamanTerms { fr, freq }) => {
                let fr = *fr;
                let mut HW: nd::Array1<C64> = IT.mapv(C64::from);
                self.plans.fft_inplace(&mut HW);
                nd::Zip::from(&mut HW).and(freq)
                    .for_each(|hk, rk| { *hk *= *rk; });
                self.plans.ifft_inplace(&mut HW);
                nd::Zip::from(&mut HW).and(&IT)
                    .for_each(|hk, ik| {
                        *hk = C64::from((1.0 - fr) * *ik) + *hk * fr;
                    });
                HW
            }
        };
        let mut M: nd::Array1<C64>
            = nd::Zip::from(At).and(&mix)
            .map_collect(|ak, mk| *ak * *mk);
        self.plans.fft_inplace(&mut M);
        nd::Zip::from(&mut M).and(&self.W)
            .for_each(|mk, wk| { *mk *= C64::i() * (self.gamma_w0 * wk); });
        M
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ raman::BlowWoodRaman, utils };

    fn test_field(grid: &Grid) -> nd::Array1<C64> {
        grid.time().mapv(|t| C64::new((-t * t).exp(), 0.3 * (-t * t).exp()))
    }

    #[test]
    fn kerr_term_matches_direct_formula() {
        let grid = Grid::new(64, 10.0).unwrap();
        let gamma = 2.0;
        let op = NonlinearOperator::new(&grid, 1500.0, gamma, false, None);
        let At = test_field(&grid);
        let out = op.evaluate(&At);
        let manual
            = utils::fft(&At.mapv(|ak| C64::i() * gamma * ak.norm_sqr() * ak));
        let err: f64
            = out.iter().zip(&manual)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max);
        let scale: f64 = manual.iter().map(|x| x.norm()).fold(0.0, f64::max);
        assert!(err / scale < 1e-12);
    }

    #[test]
    fn self_steepening_scales_with_frequency() {
        let grid = Grid::new(64, 10.0).unwrap();
        let gamma = 2.0;
        let w0 = 1500.0;
        let op = NonlinearOperator::new(&grid, w0, gamma, true, None);
        let At = test_field(&grid);
        let out = op.evaluate(&At);
        let base = utils::fft(&At.mapv(|ak| C64::i() * gamma * ak.norm_sqr() * ak));
        let err: f64
            = out.iter().zip(&base).zip(grid.omega())
            .map(|((a, b), &dw)| (a - *b * ((w0 + dw) / w0)).norm())
            .fold(0.0, f64::max);
        let scale: f64 = base.iter().map(|x| x.norm()).fold(0.0, f64::max);
        assert!(err / scale < 1e-12);
    }

    #[test]
    fn raman_blend_reduces_to_kerr_for_slow_fields() {
        // a field much longer than the kernel support sees the delayed
        // response as quasi-instantaneous, so the blended intensity factor
        // approaches the plain |A|²
        let grid = Grid::new(1 << 12, 40.0).unwrap();
        let raman = BlowWoodRaman::new();
        let op = NonlinearOperator::new(&grid, 1500.0, 1.0, false, Some(&raman));
        let plain = NonlinearOperator::new(&grid, 1500.0, 1.0, false, None);
        let At: nd::Array1<C64>
            = grid.time().mapv(|t| C64::from((-t * t / 18.0).exp()));
        let out = op.evaluate(&At);
        let reference = plain.evaluate(&At);
        let err: f64
            = out.iter().zip(&reference)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max);
        let scale: f64
            = reference.iter().map(|x| x.norm()).fold(0.0, f64::max);
        assert!(err / scale < 1e-2);
    }
}
