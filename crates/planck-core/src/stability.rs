// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Numerical Stability Assessment
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Heuristic health score of a raw (unfloored) trajectory.

use planck_math::stats;
use planck_types::results::StabilityAssessment;
use planck_types::state::Trajectory;

/// Penalty for any a ≤ 0.
const NEGATIVE_SCALE_PENALTY: f64 = 0.3;

/// Penalty for any T ≤ 0.
const NEGATIVE_TEMPERATURE_PENALTY: f64 = 0.2;

/// Penalty for any non-finite a.
const NON_FINITE_PENALTY: f64 = 0.5;

/// Penalty when consecutive samples are further apart than `MAX_TIME_GAP`.
const TIME_GAP_PENALTY: f64 = 0.2;
const MAX_TIME_GAP: f64 = 1e10;

/// Score above which a run counts as numerically stable.
const STABLE_SCORE: f64 = 0.7;

pub fn assess_stability(trajectory: &Trajectory) -> StabilityAssessment {
    let states = trajectory.states();
    let negative_scale = states.iter().any(|s| s.scale_factor <= 0.0);
    let negative_temperature = states.iter().any(|s| s.temperature <= 0.0);
    let non_finite = states.iter().any(|s| !s.scale_factor.is_finite());

    let max_time_gap = stats::max_abs_increment(trajectory.times());

    // Jumps touching a non-finite sample are already covered by the
    // non-finite penalty and would not serialize, so only finite runs
    // of a are measured.
    let scale_factors = trajectory.scale_factors();
    let max_scale_discontinuity = scale_factors
        .split(|a| !a.is_finite())
        .map(stats::max_abs_increment)
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max);

    let mut score = 1.0;
    if negative_scale {
        score -= NEGATIVE_SCALE_PENALTY;
    }
    if negative_temperature {
        score -= NEGATIVE_TEMPERATURE_PENALTY;
    }
    if non_finite {
        score -= NON_FINITE_PENALTY;
    }
    if max_time_gap > MAX_TIME_GAP {
        score -= TIME_GAP_PENALTY;
    }
    let score: f64 = score.max(0.0);

    StabilityAssessment {
        stability_score: score,
        has_negative_values: negative_scale || negative_temperature,
        has_infinite_values: non_finite,
        max_time_gap,
        max_scale_discontinuity,
        numerically_stable: score > STABLE_SCORE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planck_types::state::SimulationState;

    fn traj(times: &[f64], a: &[f64], temp: &[f64]) -> Trajectory {
        let states = a
            .iter()
            .zip(temp)
            .map(|(&a, &t)| SimulationState::new(a, 0.0, 1.0, t))
            .collect();
        Trajectory::from_samples(times.to_vec(), states).unwrap()
    }

    #[test]
    fn test_clean_trajectory_is_stable() {
        let s = assess_stability(&traj(&[0.0, 1.0, 3.0], &[1.0, 2.0, 5.0], &[9.0, 8.0, 7.0]));
        assert_eq!(s.stability_score, 1.0);
        assert!(s.numerically_stable);
        assert!(!s.has_negative_values);
        assert_eq!(s.max_time_gap, 2.0);
        assert_eq!(s.max_scale_discontinuity, 3.0);
    }

    #[test]
    fn test_penalties_accumulate() {
        let s = assess_stability(&traj(&[0.0, 1.0], &[1.0, -1.0], &[1.0, 1.0]));
        assert!((s.stability_score - 0.7).abs() < 1e-12);
        assert!(!s.numerically_stable, "0.7 is not > 0.7");
        assert!(s.has_negative_values);

        let s = assess_stability(&traj(&[0.0, 2e10], &[f64::INFINITY, -1.0], &[0.0, 1.0]));
        assert_eq!(s.stability_score, 0.0);
        assert!(s.has_infinite_values);
        assert!(s.max_scale_discontinuity.is_finite());
    }

    #[test]
    fn test_discontinuity_skips_non_finite_samples() {
        let s = assess_stability(&traj(
            &[0.0, 1.0, 2.0, 3.0, 4.0],
            &[1.0, 2.0, f64::NAN, 10.0, 10.5],
            &[1.0; 5],
        ));
        assert_eq!(s.max_scale_discontinuity, 1.0);
        assert!(s.has_infinite_values);
    }

    #[test]
    fn test_single_sample() {
        let s = assess_stability(&traj(&[0.0], &[1.0], &[1.0]));
        assert_eq!(s.max_time_gap, 0.0);
        assert!(s.numerically_stable);
    }
}
