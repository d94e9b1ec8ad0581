// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — DOP853 Integrator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Dormand–Prince 8(5,3) explicit Runge–Kutta integrator with adaptive
//! step-size control.
//!
//! Coefficients follow Hairer, Nørsett & Wanner, *Solving Ordinary
//! Differential Equations I* (2nd ed.). The local error blends the embedded
//! 5th- and 3rd-order estimates:
//!
//!   err = |h| · ‖e5‖² / sqrt(N · (‖e5‖² + 0.01 ‖e3‖²))
//!
//! with every component scaled by `atol + rtol · max(|y|, |y_new|)`.
//!
//! Non-convergence is reported through [`SolverStatus`], never as an error.
//! Only malformed options are rejected up front.

use planck_types::error::{PlanckError, PlanckResult};
use tracing::{debug, warn};

const N_STAGES: usize = 12;

/// Order of the embedded error estimator; sets the step-control exponent.
const ERROR_ESTIMATOR_ORDER: f64 = 7.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

const C: [f64; N_STAGES] = [
    0.0,
    0.526001519587677318785587544488e-1,
    0.789002279381515978178381316732e-1,
    0.118350341907227396726757197510,
    0.281649658092772603273242802490,
    0.333333333333333333333333333333,
    0.25,
    0.307692307692307692307692307692,
    0.651282051282051282051282051282,
    0.6,
    0.857142857142857142857142857142,
    1.0,
];

const A: [[f64; N_STAGES]; N_STAGES] = [
    [0.0; N_STAGES],
    [
        5.26001519587677318785587544488e-2,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ],
    [
        1.97250569845378994544595329183e-2,
        5.91751709536136983633785987549e-2,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ],
    [
        2.95875854768068491816892993775e-2,
        0.0,
        8.87627564304205475450678981324e-2,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ],
    [
        2.41365134159266685502369798665e-1,
        0.0,
        -8.84549479328286085344864962717e-1,
        9.24834003261792003115737966543e-1,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ],
    [
        3.7037037037037037037037037037e-2,
        0.0,
        0.0,
        1.70828608729473871279604482173e-1,
        1.25467687566822425016691814123e-1,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ],
    [
        3.7109375e-2,
        0.0,
        0.0,
        1.70252211019544039314978060272e-1,
        6.02165389804559606850219397283e-2,
        -1.7578125e-2,
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
    ],
    [
        3.70920001185047927108779319836e-2,
        0.0,
        0.0,
        1.70383925712239993810214054705e-1,
        1.07262030446373284651809199168e-1,
        -1.53194377486244017527936158236e-2,
        8.27378916381402288758473766002e-3,
        0.0, 0.0, 0.0, 0.0, 0.0,
    ],
    [
        6.24110958716075717114429577812e-1,
        0.0,
        0.0,
        -3.36089262944694129406857109825,
        -8.68219346841726006818189891453e-1,
        2.75920996994467083049415600797e1,
        2.01540675504778934086186788979e1,
        -4.34898841810699588477366255144e1,
        0.0, 0.0, 0.0, 0.0,
    ],
    [
        4.77662536438264365890433908527e-1,
        0.0,
        0.0,
        -2.48811461997166764192642586468,
        -5.90290826836842996371446475743e-1,
        2.12300514481811942347288949897e1,
        1.52792336328824235832596922938e1,
        -3.32882109689848629194453265587e1,
        -2.03312017085086261358222928593e-2,
        0.0, 0.0, 0.0,
    ],
    [
        -9.3714243008598732571704021658e-1,
        0.0,
        0.0,
        5.18637242884406370830023853209,
        1.09143734899672957818500254654,
        -8.14978701074692612513997267357,
        -1.85200656599969598641566180701e1,
        2.27394870993505042818970056734e1,
        2.49360555267965238987089396762,
        -3.0467644718982195003823669022,
        0.0, 0.0,
    ],
    [
        2.27331014751653820792359768449,
        0.0,
        0.0,
        -1.05344954667372501984066689879e1,
        -2.00087205822486249909675718444,
        -1.79589318631187989172765950534e1,
        2.79488845294199600508499808837e1,
        -2.85899827713502369474065508674,
        -8.87285693353062954433549289258,
        1.23605671757943030647266201528e1,
        6.43392746015763530355970484046e-1,
        0.0,
    ],
];

/// 8th-order solution weights.
const B: [f64; N_STAGES] = [
    5.42937341165687622380535766363e-2,
    0.0,
    0.0,
    0.0,
    0.0,
    4.45031289275240888144113950566,
    1.89151789931450038304281599044,
    -5.8012039600105847814672114227,
    3.1116436695781989440891606237e-1,
    -1.52160949662516078556178806805e-1,
    2.01365400804030348374776537501e-1,
    4.47106157277725905176885569043e-2,
];

/// 3rd-order embedded weights, subtracted from `B` to form the e3 estimator.
const BHH: [f64; N_STAGES] = [
    0.244094488188976377952755905512,
    0.0,
    0.0,
    0.0,
    0.0,
    0.0,
    0.0,
    0.0,
    0.733846688281611857341361741547,
    0.0,
    0.0,
    0.220588235294117647058823529412e-1,
];

/// 5th-order error estimator weights.
const E5: [f64; N_STAGES] = [
    0.1312004499419488073250102996e-1,
    0.0,
    0.0,
    0.0,
    0.0,
    -0.1225156446376204440720569753e1,
    -0.4957589496572501915214079952,
    0.1664377182454986536961530415e1,
    -0.3503288487499736816886487290,
    0.3341791187130174790297318841,
    0.8192320648511571246570742613e-1,
    -0.2235530786388629525884427845e-1,
];

/// First-order system y' = f(t, y) of fixed dimension `N`.
pub trait OdeSystem<const N: usize> {
    fn rhs(&self, t: f64, y: &[f64; N]) -> [f64; N];
}

/// Adapter turning a closure into an [`OdeSystem`].
pub struct FnSystem<F>(pub F);

impl<F, const N: usize> OdeSystem<N> for FnSystem<F>
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
{
    fn rhs(&self, t: f64, y: &[f64; N]) -> [f64; N] {
        (self.0)(t, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dop853Options {
    pub rtol: f64,
    pub atol: f64,
    pub max_step: f64,
    /// Initial step; `None` runs the Hairer starting-step heuristic.
    pub first_step: Option<f64>,
    /// Budget of attempted steps (accepted + rejected).
    pub max_steps: usize,
}

impl Default for Dop853Options {
    fn default() -> Self {
        Dop853Options {
            rtol: 1e-3,
            atol: 1e-6,
            max_step: f64::INFINITY,
            first_step: None,
            max_steps: 100_000,
        }
    }
}

impl Dop853Options {
    pub fn validate(&self) -> PlanckResult<()> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(PlanckError::ConfigError(format!(
                "dop853 rtol must be finite and > 0, got {}",
                self.rtol
            )));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(PlanckError::ConfigError(format!(
                "dop853 atol must be finite and > 0, got {}",
                self.atol
            )));
        }
        if self.max_step.is_nan() || self.max_step <= 0.0 {
            return Err(PlanckError::ConfigError(format!(
                "dop853 max_step must be > 0, got {}",
                self.max_step
            )));
        }
        if let Some(h0) = self.first_step {
            if !h0.is_finite() || h0 <= 0.0 {
                return Err(PlanckError::ConfigError(format!(
                    "dop853 first_step must be finite and > 0, got {h0}"
                )));
            }
        }
        if self.max_steps == 0 {
            return Err(PlanckError::ConfigError(
                "dop853 max_steps must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Reached the end of the interval.
    Success,
    /// Step size fell below the floating-point spacing at the current time.
    StepSizeTooSmall,
    /// `max_steps` attempts were spent before reaching the end.
    MaxStepsExceeded,
    /// Initial state or initial derivative was not finite.
    NonFiniteState,
}

/// Accepted steps of one integration, including the initial point.
#[derive(Debug, Clone, PartialEq)]
pub struct OdeSolution<const N: usize> {
    pub t: Vec<f64>,
    pub y: Vec<[f64; N]>,
    pub status: SolverStatus,
    pub message: String,
    pub n_accepted: usize,
    pub n_rejected: usize,
    pub n_evaluations: usize,
}

impl<const N: usize> OdeSolution<N> {
    pub fn success(&self) -> bool {
        self.status == SolverStatus::Success
    }

    pub fn last(&self) -> Option<(f64, [f64; N])> {
        Some((*self.t.last()?, *self.y.last()?))
    }
}

fn all_finite<const N: usize>(v: &[f64; N]) -> bool {
    v.iter().all(|x| x.is_finite())
}

fn rms(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    (values.map(|v| v * v).sum::<f64>() / n as f64).sqrt()
}

/// Distance from `t` to the next representable float above it.
fn spacing(t: f64) -> f64 {
    let a = t.abs();
    if a == 0.0 {
        return f64::from_bits(1);
    }
    f64::from_bits(a.to_bits() + 1) - a
}

/// Hairer's starting-step heuristic.
fn select_initial_step<S: OdeSystem<N>, const N: usize>(
    system: &S,
    t0: f64,
    y0: &[f64; N],
    f0: &[f64; N],
    interval: f64,
    opts: &Dop853Options,
) -> f64 {
    if N == 0 {
        return interval;
    }
    let mut scale = [0.0; N];
    for j in 0..N {
        scale[j] = opts.atol + y0[j].abs() * opts.rtol;
    }
    let d0 = rms((0..N).map(|j| y0[j] / scale[j]), N);
    let d1 = rms((0..N).map(|j| f0[j] / scale[j]), N);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(interval);

    let mut y1 = [0.0; N];
    for j in 0..N {
        y1[j] = y0[j] + h0 * f0[j];
    }
    let f1 = system.rhs(t0 + h0, &y1);
    let d2 = rms((0..N).map(|j| (f1[j] - f0[j]) / scale[j]), N) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (ERROR_ESTIMATOR_ORDER + 1.0))
    };

    let h = (100.0 * h0).min(h1).min(interval);
    if h.is_finite() && h > 0.0 {
        h
    } else {
        1e-6_f64.min(interval)
    }
}

/// One DOP853 step: returns (y_new, f_new, stage derivatives).
fn rk_step<S: OdeSystem<N>, const N: usize>(
    system: &S,
    t: f64,
    y: &[f64; N],
    f: &[f64; N],
    h: f64,
) -> ([f64; N], [f64; N], [[f64; N]; N_STAGES]) {
    let mut k = [[0.0; N]; N_STAGES];
    k[0] = *f;
    for s in 1..N_STAGES {
        let mut y_stage = *y;
        for j in 0..N {
            let mut dy = 0.0;
            for (i, ki) in k.iter().enumerate().take(s) {
                dy += A[s][i] * ki[j];
            }
            y_stage[j] += h * dy;
        }
        k[s] = system.rhs(t + C[s] * h, &y_stage);
    }

    let mut y_new = *y;
    for j in 0..N {
        let mut incr = 0.0;
        for (i, ki) in k.iter().enumerate() {
            incr += B[i] * ki[j];
        }
        y_new[j] += h * incr;
    }
    let f_new = system.rhs(t + h, &y_new);
    (y_new, f_new, k)
}

fn error_norm<const N: usize>(
    k: &[[f64; N]; N_STAGES],
    h: f64,
    y: &[f64; N],
    y_new: &[f64; N],
    opts: &Dop853Options,
) -> f64 {
    let mut err5_sq = 0.0;
    let mut err3_sq = 0.0;
    for j in 0..N {
        let scale = opts.atol + y[j].abs().max(y_new[j].abs()) * opts.rtol;
        let mut e5 = 0.0;
        let mut e3 = 0.0;
        for (i, ki) in k.iter().enumerate() {
            e5 += E5[i] * ki[j];
            e3 += (B[i] - BHH[i]) * ki[j];
        }
        err5_sq += (e5 / scale).powi(2);
        err3_sq += (e3 / scale).powi(2);
    }
    if err5_sq == 0.0 && err3_sq == 0.0 {
        return 0.0;
    }
    let denom = err5_sq + 0.01 * err3_sq;
    h.abs() * err5_sq / (denom * N as f64).sqrt()
}

/// Integrate `system` forward over `t_span` from `y0`.
///
/// Returns every accepted step. `Err` only for malformed options or span;
/// a failed integration comes back as `Ok` with a non-success status and
/// the samples accepted so far.
pub fn solve<S: OdeSystem<N>, const N: usize>(
    system: &S,
    t_span: (f64, f64),
    y0: [f64; N],
    opts: &Dop853Options,
) -> PlanckResult<OdeSolution<N>> {
    opts.validate()?;
    let (t0, t_end) = t_span;
    if !t0.is_finite() || !t_end.is_finite() || t_end <= t0 {
        return Err(PlanckError::InvalidInput(format!(
            "dop853 requires finite t_span with end > start, got ({t0}, {t_end})"
        )));
    }

    let mut sol = OdeSolution {
        t: vec![t0],
        y: vec![y0],
        status: SolverStatus::Success,
        message: String::new(),
        n_accepted: 0,
        n_rejected: 0,
        n_evaluations: 0,
    };

    let mut f = system.rhs(t0, &y0);
    sol.n_evaluations += 1;
    if !all_finite(&y0) || !all_finite(&f) {
        sol.status = SolverStatus::NonFiniteState;
        sol.message = format!("Initial state or derivative is not finite at t={t0}");
        warn!(t = t0, "dop853 initial state not finite");
        return Ok(sol);
    }

    let mut h_abs = match opts.first_step {
        Some(h) => h,
        None => {
            sol.n_evaluations += 1;
            select_initial_step(system, t0, &y0, &f, t_end - t0, opts)
        }
    };

    let exponent = -1.0 / (ERROR_ESTIMATOR_ORDER + 1.0);
    let mut t = t0;
    let mut y = y0;
    let mut attempts = 0usize;

    'outer: while t < t_end {
        let min_step = 10.0 * spacing(t);
        if h_abs > opts.max_step {
            h_abs = opts.max_step;
        } else if h_abs < min_step {
            h_abs = min_step;
        }

        let mut step_rejected = false;
        loop {
            if attempts >= opts.max_steps {
                sol.status = SolverStatus::MaxStepsExceeded;
                sol.message = format!(
                    "Step budget of {} attempts exhausted at t={t:e}",
                    opts.max_steps
                );
                break 'outer;
            }
            if h_abs < min_step {
                sol.status = SolverStatus::StepSizeTooSmall;
                sol.message = format!(
                    "Required step size is less than spacing between numbers at t={t:e}"
                );
                break 'outer;
            }
            attempts += 1;

            let t_new = (t + h_abs).min(t_end);
            let h = t_new - t;
            h_abs = h.abs();

            let (y_new, f_new, k) = rk_step(system, t, &y, &f, h);
            sol.n_evaluations += N_STAGES;

            let err = if all_finite(&y_new) && all_finite(&f_new) {
                error_norm(&k, h, &y, &y_new, opts)
            } else {
                f64::INFINITY
            };

            if err < 1.0 {
                let mut factor = if err == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * err.powf(exponent))
                };
                if step_rejected {
                    factor = factor.min(1.0);
                }
                h_abs *= factor;

                t = t_new;
                y = y_new;
                f = f_new;
                sol.t.push(t);
                sol.y.push(y);
                sol.n_accepted += 1;
                break;
            }

            h_abs *= MIN_FACTOR.max(SAFETY * err.powf(exponent));
            step_rejected = true;
            sol.n_rejected += 1;
        }
    }

    if sol.status == SolverStatus::Success {
        sol.message = "The solver successfully reached the end of the integration interval.".to_string();
        debug!(
            accepted = sol.n_accepted,
            rejected = sol.n_rejected,
            nfev = sol.n_evaluations,
            "dop853 finished"
        );
    } else {
        warn!(status = ?sol.status, message = %sol.message, "dop853 did not converge");
    }

    Ok(sol)
}
