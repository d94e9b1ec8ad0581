// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{PlanckError, PlanckResult};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Number of dynamical variables in the cosmology system.
pub const STATE_DIM: usize = 4;

/// Cosmological state vector (a, ȧ, ρ, T).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationState {
    /// Dimensionless scale factor a
    pub scale_factor: f64,
    /// Expansion rate ȧ
    pub expansion_rate: f64,
    /// Energy density ρ
    pub energy_density: f64,
    /// Temperature T
    pub temperature: f64,
}

impl SimulationState {
    pub fn new(scale_factor: f64, expansion_rate: f64, energy_density: f64, temperature: f64) -> Self {
        SimulationState {
            scale_factor,
            expansion_rate,
            energy_density,
            temperature,
        }
    }

    pub fn from_array(y: [f64; STATE_DIM]) -> Self {
        SimulationState::new(y[0], y[1], y[2], y[3])
    }

    pub fn to_array(self) -> [f64; STATE_DIM] {
        [
            self.scale_factor,
            self.expansion_rate,
            self.energy_density,
            self.temperature,
        ]
    }

    /// Floor a, ρ and T at `epsilon`. ȧ may legitimately be negative and is
    /// passed through.
    pub fn regularized(self, epsilon: f64) -> Self {
        SimulationState {
            scale_factor: self.scale_factor.max(epsilon),
            expansion_rate: self.expansion_rate,
            energy_density: self.energy_density.max(epsilon),
            temperature: self.temperature.max(epsilon),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        SimulationState::new(1e-8, 1e3, 1e25, 1e12)
    }
}

/// Accepted solver samples, time strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<SimulationState>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parallel sample vectors, rejecting mismatched lengths and
    /// non-increasing time.
    pub fn from_samples(times: Vec<f64>, states: Vec<SimulationState>) -> PlanckResult<Self> {
        if times.len() != states.len() {
            return Err(PlanckError::InvalidInput(format!(
                "trajectory requires matching time/state lengths, got {} and {}",
                times.len(),
                states.len()
            )));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(PlanckError::InvalidInput(format!(
                "trajectory time must be strictly increasing: t[{}]={} >= t[{}]={}",
                i,
                times[i],
                i + 1,
                times[i + 1]
            )));
        }
        Ok(Trajectory { times, states })
    }

    pub fn push(&mut self, time: f64, state: SimulationState) -> PlanckResult<()> {
        if let Some(&last) = self.times.last() {
            if time <= last {
                return Err(PlanckError::InvalidInput(format!(
                    "trajectory time must be strictly increasing: {time} after {last}"
                )));
            }
        }
        self.times.push(time);
        self.states.push(state);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[SimulationState] {
        &self.states
    }

    pub fn first(&self) -> Option<(f64, SimulationState)> {
        Some((*self.times.first()?, *self.states.first()?))
    }

    pub fn last(&self) -> Option<(f64, SimulationState)> {
        Some((*self.times.last()?, *self.states.last()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &SimulationState)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }

    pub fn scale_factors(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.scale_factor).collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.temperature).collect()
    }

    pub fn times_array(&self) -> Array1<f64> {
        Array1::from_vec(self.times.clone())
    }

    /// States as an `(n, 4)` array, columns ordered (a, ȧ, ρ, T).
    pub fn states_array(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.states.len(), STATE_DIM));
        for (i, state) in self.states.iter().enumerate() {
            for (j, v) in state.to_array().into_iter().enumerate() {
                out[[i, j]] = v;
            }
        }
        out
    }
}
