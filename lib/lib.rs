#![allow(dead_code, non_snake_case)]

//! Provides a propagation engine for ultrafast optical pulse envelopes in
//! dispersive, nonlinear single-mode waveguides, integrating the generalized
//! nonlinear Schrödinger equation (GNLSE) along the propagation coordinate
//! with a pseudo-spectral, interaction-picture method.
//!
//! The engine models:
//! - linear dispersion from a Taylor expansion of the propagation constant,
//!   plus scalar loss
//! - instantaneous Kerr nonlinearity
//! - optional self-steepening (shock term)
//! - optional delayed Raman response via convolution kernels
//!
//! Integration along distance uses an embedded Dormand-Prince 5(4) pair with
//! adaptive stepsize; the linear operator is applied analytically in the
//! frequency domain and the nonlinear operator in the time domain.
//!
//! See [`docs`] for theoretical background and the unit conventions used
//! throughout.

pub mod error;
pub mod units;
pub mod utils;
pub mod grid;
pub mod pulse;
pub mod dispersion;
pub mod raman;
pub mod nonlinear;
pub mod propagate;
pub mod solution;

pub mod docs;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
