// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Integration Driver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::cosmology::CosmologyModel;
use planck_math::dop853::{self, Dop853Options, SolverStatus};
use planck_types::config::{SolverConfig, TimeSpan};
use planck_types::error::PlanckResult;
use planck_types::results::SolverStats;
use planck_types::state::{SimulationState, Trajectory};
use tracing::{info, warn};

pub const METHOD_NAME: &str = "DOP853";

/// Accepted-step trajectory plus the solver's verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationOutcome {
    pub trajectory: Trajectory,
    pub success: bool,
    pub status: SolverStatus,
    pub message: String,
    pub stats: SolverStats,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationDriver {
    options: Dop853Options,
}

impl IntegrationDriver {
    pub fn new(solver: &SolverConfig) -> PlanckResult<Self> {
        solver.validate()?;
        let options = Dop853Options {
            rtol: solver.rtol,
            atol: solver.atol,
            max_step: solver.max_step,
            first_step: solver.first_step,
            max_steps: solver.max_steps,
        };
        options.validate()?;
        Ok(IntegrationDriver { options })
    }

    pub fn options(&self) -> &Dop853Options {
        &self.options
    }

    /// Single solve, no retry. Non-convergence comes back in the outcome.
    pub fn integrate(
        &self,
        model: &CosmologyModel,
        span: TimeSpan,
        initial: SimulationState,
    ) -> PlanckResult<IntegrationOutcome> {
        info!(
            t_start = span.start,
            t_end = span.end,
            rtol = self.options.rtol,
            atol = self.options.atol,
            "integrating cosmology system"
        );
        let sol = dop853::solve(model, (span.start, span.end), initial.to_array(), &self.options)?;

        let success = sol.success();
        let stats = SolverStats {
            accepted_steps: sol.n_accepted,
            rejected_steps: sol.n_rejected,
            rhs_evaluations: sol.n_evaluations,
        };
        let states = sol.y.into_iter().map(SimulationState::from_array).collect();
        let trajectory = Trajectory::from_samples(sol.t, states)?;

        if success {
            info!(points = trajectory.len(), accepted = stats.accepted_steps, "integration complete");
        } else {
            warn!(status = ?sol.status, points = trajectory.len(), "integration failed: {}", sol.message);
        }

        Ok(IntegrationOutcome {
            trajectory,
            success,
            status: sol.status,
            message: sol.message,
            stats,
        })
    }
}
