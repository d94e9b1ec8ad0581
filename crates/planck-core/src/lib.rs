//! Toy Planck-epoch cosmology: dynamic-constant law, compression schedule,
//! regularized 4-variable ODE and hypothesis evaluation.
//!
//! Stage 1: constant law and compression schedule
//! Stage 2: right-hand side and integration driver
//! Stage 3: hypothesis evaluation, stability, pipeline
//! Stage 4: sensitivity and tolerance sweeps, standard-model reference

pub mod compression;
pub mod constant_law;
pub mod cosmology;
pub mod driver;
pub mod experiments;
pub mod hypothesis;
pub mod simulation;
pub mod stability;
