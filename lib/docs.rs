//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Interaction picture](#interaction-picture)
//! - [Adaptive stepping](#adaptive-stepping)
//!
//! # Background
//! The complex slowly-varying envelope *A*(*z*, *t*) of an optical pulse in
//! a single-mode waveguide, written in a frame co-moving with the group
//! velocity, obeys the generalized nonlinear Schrödinger equation
//! (GNLSE)[^1]
//! ```text
//! ∂A      α          iⁿ⁺¹ βₙ  ∂ⁿA
//! --- = - - A + Σ    ------- ----
//! ∂z      2      n≥2    n!    ∂tⁿ
//!
//!                  i   ∂
//!       + i γ (1 + --- -- ) [ A (R ∗ |A|²) ]
//!                  ω₀  ∂t
//! ```
//! The first group of terms is linear: scalar loss α and the Taylor
//! expansion of the propagation constant β(ω) about the carrier frequency
//! ω₀, starting at the group-velocity dispersion β₂. In the frequency
//! domain it reduces to multiplication by
//! ```text
//! L(Δω) = i Σ (βₙ/n!) Δωⁿ - α/2
//! ```
//! so propagation over a distance *z* under the linear terms alone is the
//! exact factor exp(*L*(Δω) *z*).
//!
//! The second group is nonlinear. With the response function
//! ```text
//! R(t) = (1 - f_R) δ(t) + f_R h(t)
//! ```
//! the convolution `R ∗ |A|²` splits into the instantaneous Kerr intensity
//! (1 - f_R)|A|² and the delayed Raman contribution f_R (h ∗ |A|²), with
//! h(t) a causal, unit-integral kernel such as the Blow-Wood damped
//! oscillator[^2] or the Lin-Agrawal extension[^3]. The operator
//! (1 + (i/ω₀) ∂/∂t) is the shock, or self-steepening, correction; in the
//! frequency domain it is the multiplicative factor (ω₀ + Δω)/ω₀, which is
//! how this crate applies it. Omitting self-steepening replaces that factor
//! by 1, and omitting the Raman model sets f_R = 0; in both limits the
//! nonlinear term collapses to the familiar i γ |A|² A.
//!
//! A hyperbolic-secant input `√P₀ sech(t/t₀)` with
//! ```text
//! P₀ = -β₂ / (γ t₀²),   β₂ < 0
//! ```
//! balances dispersion against the Kerr term exactly and propagates without
//! change of shape (the fundamental soliton); this provides a stringent
//! end-to-end accuracy check, since any numerical error appears directly as
//! shape distortion over a soliton period z₀ = (π/2) t₀²/|β₂|.
//!
//! # Units
//! All quantities use a single internal system: time in ps, distance in m,
//! power in W. Angular frequency is then rad/ps, βₙ is psⁿ/m, and γ is
//! 1/(W·m). Wavelengths cross the configuration boundary in nm and loss in
//! dB/m; see [`units`][crate::units] for the two conversions. No other unit
//! conversion happens anywhere in the engine.
//!
//! # Interaction picture
//! Stiffness in the GNLSE comes almost entirely from the linear factor: at
//! the grid's Nyquist edge the dispersive phase rotates orders of magnitude
//! faster than the nonlinear dynamics evolve. Since that factor is known
//! analytically, it is removed from the numerical problem by the
//! substitution[^4]
//! ```text
//! Ψ(z) = exp(-L z) Ã(z)
//! ```
//! i.e. the frequency-domain field with the accumulated linear evolution
//! divided out. The transformed equation
//! ```text
//! ∂Ψ
//! -- = exp(-L z) N( F⁻¹{ exp(L z) Ψ } )
//! ∂z
//! ```
//! contains only the nonlinear residual *N* (evaluated in the time domain,
//! where it is a pointwise product), so a general-purpose Runge-Kutta
//! scheme can take steps set by the physics of the nonlinearity rather
//! than by the fastest linear phase. Returning to the lab frame is a
//! multiplication by exp(*L* *z*) followed by an inverse transform, and is
//! exact at any *z*; checkpoints are therefore recorded by landing internal
//! steps exactly on the requested distances rather than by interpolating
//! the lab-frame field, whose wrapped phase does not interpolate cleanly.
//!
//! # Adaptive stepping
//! Steps are advanced with the Dormand-Prince embedded 5(4) pair[^5]: a
//! seven-stage scheme whose stages combine into both a fifth-order advance
//! and a fourth-order error estimate at no extra cost. A proposed step is
//! accepted when the RMS of the per-element ratios
//! ```text
//! |y₅ - y₄| / (atol + rtol max(|y|, |y₅|))
//! ```
//! is at most 1; otherwise the step size contracts by a safety factor times
//! the ratio to the power -1/5 (the order of the advance) and the step is
//! retried without advancing. Accepted steps grow the next proposal by the
//! same rule, bounded to a factor of 4 in either direction. The step size
//! has a hard floor relative to the fiber length; reaching it, or
//! exhausting the retry budget, aborts the run as a tolerance failure, and
//! a non-finite field after an accepted step aborts it as numerical
//! divergence. Both leave the checkpoints recorded so far readable.
//!
//! [^1]: G. P. Agrawal, *Nonlinear Fiber Optics* (5th ed., Academic Press,
//!     2013), ch. 2.
//!
//! [^2]: K. J. Blow and D. Wood, "Theoretical description of transient
//!     stimulated Raman scattering in optical fibers", IEEE J. Quantum
//!     Electron. 25, 2665 (1989).
//!
//! [^3]: Q. Lin and G. P. Agrawal, "Raman response function for silica
//!     fibers", Opt. Lett. 31, 3086 (2006).
//!
//! [^4]: J. Hult, "A fourth-order Runge-Kutta in the interaction picture
//!     method for simulating supercontinuum generation in optical fibers",
//!     J. Lightwave Technol. 25, 3770 (2007).
//!
//! [^5]: J. R. Dormand and P. J. Prince, "A family of embedded Runge-Kutta
//!     formulae", J. Comput. Appl. Math. 6, 19 (1980).
