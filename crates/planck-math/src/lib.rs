//! Numerical primitives for the Planck epoch simulator.

pub mod dop853;
pub mod stats;
