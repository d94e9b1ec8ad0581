// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Regularized Cosmology RHS
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Right-hand side of the (a, ȧ, ρ, T) system.
//!
//! Every derivative is saturated before it is returned:
//!
//!   H   = clip(ȧ/a, ±H_max)
//!   p   = wρ + q,  q = clip(h c e^{-t/τ_q} / (1 + t²), 0, f_q ρ)
//!   ä   = clip(-4πG a (ρ + 3p) / (3c²), ±ä_max) / sqrt(C(t) + ε)
//!   ρ̇   = clip(-3H(ρ + p) + clip(-ρ h e^{-t/τ_c} / (δ + t), -f_c ρ, 0), ±k_ρ ρ)
//!   Ṫ   = clip(-H T clip(1 + h / (k_B T (1 + t/τ_T)), lo, hi), ±k_T T)
//!
//! with a, ρ, T floored at ε first.

use crate::compression::CompressionSchedule;
use crate::constant_law::DynamicConstantLaw;
use planck_math::dop853::OdeSystem;
use planck_types::config::{DynamicsConfig, ModelConfig};
use planck_types::constants::PhysicalConstant;
use planck_types::state::{SimulationState, STATE_DIM};
use std::f64::consts::PI;

fn clip(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosmologyModel {
    pub law: DynamicConstantLaw,
    pub compression: CompressionSchedule,
    pub dynamics: DynamicsConfig,
}

impl CosmologyModel {
    pub fn new(
        law: DynamicConstantLaw,
        compression: CompressionSchedule,
        dynamics: DynamicsConfig,
    ) -> Self {
        CosmologyModel {
            law,
            compression,
            dynamics,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        CosmologyModel::new(
            DynamicConstantLaw::new(config.constant_law),
            CompressionSchedule::new(config.compression),
            config.dynamics,
        )
    }

    /// Clipped Hubble-like rate ȧ/a of the floored state.
    pub fn hubble_rate(&self, state: &SimulationState) -> f64 {
        let d = &self.dynamics;
        let s = state.regularized(d.epsilon);
        clip(s.expansion_rate / s.scale_factor, -d.hubble_limit, d.hubble_limit)
    }

    pub fn derivative(&self, t: f64, state: &SimulationState) -> SimulationState {
        let d = &self.dynamics;
        let eps = d.epsilon;
        let s = state.regularized(eps);
        let (a, a_dot, rho, temp) = (
            s.scale_factor,
            s.expansion_rate,
            s.energy_density,
            s.temperature,
        );

        let g = self.law.value(PhysicalConstant::Gravitational, t);
        let c = self.law.value(PhysicalConstant::SpeedOfLight, t);
        let h = self.law.value(PhysicalConstant::Planck, t);

        let hubble = clip(a_dot / a, -d.hubble_limit, d.hubble_limit);

        let quantum = h * c * (-t / d.quantum_pressure_timescale).exp() / (1.0 + t * t);
        let pressure = d.equation_of_state * rho
            + clip(quantum, 0.0, d.quantum_pressure_cap * rho);

        let accel = clip(
            -4.0 * PI * g * a * (rho + 3.0 * pressure) / (3.0 * c * c),
            -d.acceleration_limit,
            d.acceleration_limit,
        ) / (self.compression.ratio(t) + eps).sqrt();

        let cooling = clip(
            -rho * h / (d.quantum_cooling_offset + t) * (-t / d.quantum_cooling_timescale).exp(),
            -d.quantum_cooling_cap * rho,
            0.0,
        );
        let rho_limit = d.density_rate_limit * rho;
        let rho_dot = clip(-3.0 * hubble * (rho + pressure) + cooling, -rho_limit, rho_limit);

        let correction = clip(
            1.0 + h / (d.boltzmann * temp * (1.0 + t / d.temperature_correction_timescale)),
            d.temperature_correction_min,
            d.temperature_correction_max,
        );
        let temp_limit = d.temperature_rate_limit * temp;
        let temp_dot = clip(-hubble * temp * correction, -temp_limit, temp_limit);

        SimulationState::new(a_dot, accel, rho_dot, temp_dot)
    }
}

impl Default for CosmologyModel {
    fn default() -> Self {
        CosmologyModel::from_config(&ModelConfig::default())
    }
}

impl OdeSystem<STATE_DIM> for CosmologyModel {
    fn rhs(&self, t: f64, y: &[f64; STATE_DIM]) -> [f64; STATE_DIM] {
        self.derivative(t, &SimulationState::from_array(*y)).to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_derivative_is_finite_and_saturated() {
        let model = CosmologyModel::default();
        let s = SimulationState::default();
        let ds = model.derivative(0.0, &s);
        assert!(ds.is_finite());
        assert_eq!(ds.scale_factor, s.expansion_rate);
        // ȧ/a = 1e11 saturates at 1e4, so ρ̇ and Ṫ hit their rate limits.
        assert_eq!(ds.energy_density, -20.0 * s.energy_density);
        assert_eq!(ds.temperature, -20.0 * s.temperature);
        assert!(ds.expansion_rate <= 0.0);
    }

    #[test]
    fn test_negative_state_is_floored() {
        let model = CosmologyModel::default();
        let s = SimulationState::new(-1.0, 0.0, -5.0, -3.0);
        let ds = model.derivative(10.0, &s);
        assert!(ds.is_finite());
        assert_eq!(model.hubble_rate(&s), 0.0);
    }

    #[test]
    fn test_acceleration_bounded() {
        let model = CosmologyModel::default();
        for &t in &[0.0, 0.5, 10.0, 1e3, 1e5, 1e7] {
            let s = SimulationState::new(1e30, 0.0, 1e300, 1.0);
            let ds = model.derivative(t, &s);
            assert!(ds.expansion_rate.abs() <= 1e4 / (1.0f64).sqrt() + 1e-9);
        }
    }

    #[test]
    fn test_ode_system_matches_derivative() {
        let model = CosmologyModel::default();
        let s = SimulationState::new(2.0, 0.1, 3.0, 4.0);
        let via_trait = model.rhs(5.0, &s.to_array());
        assert_eq!(via_trait, model.derivative(5.0, &s).to_array());
    }

    #[test]
    fn test_static_universe_keeps_density() {
        let model = CosmologyModel::default();
        // Large t: cooling and quantum terms vanish, H = 0 freezes ρ and T.
        let s = SimulationState::new(1.0, 0.0, 1.0, 1.0);
        let ds = model.derivative(1e9, &s);
        assert_eq!(ds.energy_density, 0.0);
        assert_eq!(ds.temperature, 0.0);
    }
}
