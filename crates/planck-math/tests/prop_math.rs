// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Property-Based Tests (proptest) for planck-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for planck-math using proptest.
//!
//! Covers: DOP853 accuracy on linear decay, monotone output grid, exact
//! endpoint; statistics bounds.

use planck_math::dop853::{solve, Dop853Options, FnSystem};
use planck_math::stats::{max_abs_increment, mean, min_max, std_dev};
use proptest::prelude::*;

// ── DOP853 ───────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// y' = -λy matches the closed form to well inside tolerance.
    #[test]
    fn dop853_linear_decay(lambda in 0.1f64..5.0, y0 in 0.1f64..10.0, t_end in 0.5f64..4.0) {
        let sys = FnSystem(move |_t: f64, y: &[f64; 1]| [-lambda * y[0]]);
        let opts = Dop853Options { rtol: 1e-10, atol: 1e-12, ..Dop853Options::default() };
        let sol = solve(&sys, (0.0, t_end), [y0], &opts).unwrap();
        prop_assert!(sol.success());
        let (t, y) = sol.last().unwrap();
        prop_assert_eq!(t, t_end);
        let exact = y0 * (-lambda * t_end).exp();
        prop_assert!((y[0] - exact).abs() <= 1e-7 * y0, "y={} exact={}", y[0], exact);
    }

    /// Accepted times are strictly increasing and bounded by max_step.
    #[test]
    fn dop853_grid_monotone(max_step in 0.05f64..2.0, t_end in 1.0f64..20.0) {
        let sys = FnSystem(|t: f64, y: &[f64; 2]| [y[1], -y[0] + t.sin()]);
        let opts = Dop853Options { max_step, ..Dop853Options::default() };
        let sol = solve(&sys, (0.0, t_end), [1.0, 0.0], &opts).unwrap();
        prop_assert!(sol.success());
        prop_assert_eq!(sol.t.len(), sol.y.len());
        prop_assert_eq!(sol.t.len(), sol.n_accepted + 1);
        for w in sol.t.windows(2) {
            prop_assert!(w[1] > w[0]);
            prop_assert!(w[1] - w[0] <= max_step * (1.0 + 1e-12));
        }
    }
}

// ── Statistics ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn stats_mean_within_range(values in prop::collection::vec(-1e6f64..1e6, 1..100)) {
        let m = mean(&values).unwrap();
        let (lo, hi) = min_max(&values).unwrap();
        prop_assert!(m >= lo - 1e-6 && m <= hi + 1e-6);
        prop_assert!(std_dev(&values).unwrap() >= 0.0);
        prop_assert!(max_abs_increment(&values) <= hi - lo + 1e-9);
    }
}
