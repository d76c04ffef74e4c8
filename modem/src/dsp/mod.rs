//! Fixed-point DSP primitives.

pub mod fir;

pub use fir::FirInterpolator;
