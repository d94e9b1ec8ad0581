// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — PNG Overview
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 3×2 overview of a run:
//!
//! 1. constants normalized to present-day values vs time (log t)
//! 2. compression ratio vs scale-factor growth (log-log)
//! 3. scale factor vs time, dashed a ∝ t^(2/3) reference (log-log)
//! 4. temperature vs time, dashed T ∝ t^(-1/2) reference (log-log)
//! 5. model / reference ratios for a and T (log-log)
//! 6. hypothesis verdicts: one bar per check, green when supported
//!
//! Text is rasterized with an embedded DejaVu Sans registered as the
//! `sans-serif` family. Non-positive samples are skipped on log axes.

use planck_core::experiments::StandardModelReference;
use planck_core::simulation::SimulationRun;
use planck_types::constants::PhysicalConstant;
use planck_types::error::{PlanckError, PlanckResult};
use plotters::prelude::*;
use plotters::style::register_font;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const SIZE: (u32, u32) = (1500, 1700);

const SANS_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

/// Register the embedded font once per process.
fn ensure_font() -> PlanckResult<()> {
    let ok = *FONT_REGISTERED
        .get_or_init(|| register_font("sans-serif", FontStyle::Normal, SANS_FONT).is_ok());
    if ok {
        Ok(())
    } else {
        Err(PlanckError::Plot("embedded sans-serif font is invalid".to_string()))
    }
}

fn plot_err(e: impl std::fmt::Display) -> PlanckError {
    PlanckError::Plot(e.to_string())
}

fn constant_color(c: PhysicalConstant) -> RGBColor {
    match c {
        PhysicalConstant::Gravitational => BLUE,
        PhysicalConstant::SpeedOfLight => RED,
        PhysicalConstant::Planck => GREEN,
        PhysicalConstant::FineStructure => MAGENTA,
    }
}

/// Min/max over finite values, widened when degenerate. `positive` restricts
/// to strictly positive values for log axes.
fn bounds<'a>(values: impl Iterator<Item = &'a f64>, positive: bool) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .copied()
        .filter(|v| v.is_finite() && (!positive || *v > 0.0))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return None;
    }
    if lo == hi {
        return Some(if positive { (lo * 0.5, hi * 2.0) } else { (lo - 1.0, hi + 1.0) });
    }
    Some((lo, hi))
}

fn positive_pairs(xs: &[f64], ys: &[f64]) -> Vec<(f64, f64)> {
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite() && **x > 0.0 && **y > 0.0)
        .map(|(x, y)| (*x, *y))
        .collect()
}

/// Log-log panel of model curves against a dashed reference.
fn draw_against_reference(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    caption: &str,
    y_desc: &str,
    curves: Vec<(Vec<(f64, f64)>, RGBColor)>,
    reference: Vec<(f64, f64)>,
) -> PlanckResult<()> {
    let all = || curves.iter().flat_map(|(c, _)| c).chain(&reference);
    let (xs, ys) = (all().map(|(x, _)| x), all().map(|(_, y)| y));
    let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (bounds(xs, true), bounds(ys, true)) else {
        return Ok(());
    };
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d((x_lo..x_hi).log_scale(), (y_lo..y_hi).log_scale())
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("t [t_P]")
        .y_desc(y_desc)
        .draw()
        .map_err(plot_err)?;
    for (points, color) in curves {
        chart
            .draw_series(LineSeries::new(points, &color))
            .map_err(plot_err)?;
    }
    chart
        .draw_series(DashedLineSeries::new(reference, 8, 6, BLACK.stroke_width(1)))
        .map_err(plot_err)?;
    Ok(())
}

pub fn render_overview(path: &Path, run: &SimulationRun) -> PlanckResult<()> {
    ensure_font()?;
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let panels = root.split_evenly((3, 2));

    let trajectory = run.trajectory();
    let times = trajectory.times();
    let Some((t_lo, t_hi)) = bounds(times.iter(), true) else {
        root.present().map_err(plot_err)?;
        return Ok(());
    };

    // (1) normalized constants
    let normalized = run.derived.normalized_constants();
    let (y_lo, y_hi) = bounds(normalized.values().flatten(), false).unwrap_or((0.5, 1.5));
    let mut chart = ChartBuilder::on(&panels[0])
        .caption("Normalized constants", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d((t_lo..t_hi).log_scale(), (y_lo - 0.02)..(y_hi + 0.02))
        .map_err(plot_err)?;
    chart
        .configure_mesh()
        .x_desc("t [t_P]")
        .y_desc("X(t) / X_0")
        .draw()
        .map_err(plot_err)?;
    for (&c, values) in &normalized {
        let points: Vec<(f64, f64)> = times
            .iter()
            .zip(values)
            .filter(|(t, v)| **t > 0.0 && v.is_finite())
            .map(|(t, v)| (*t, *v))
            .collect();
        chart
            .draw_series(LineSeries::new(points, &constant_color(c)))
            .map_err(plot_err)?;
    }

    // (2) compression vs scale growth
    let a0 = trajectory.first().map(|(_, s)| s.scale_factor).unwrap_or(1.0);
    let growth: Vec<f64> = trajectory.scale_factors().iter().map(|a| a / a0).collect();
    let comp_points = positive_pairs(&growth, &run.derived.compression);
    if let (Some((gx_lo, gx_hi)), Some((gy_lo, gy_hi))) = (
        bounds(comp_points.iter().map(|(x, _)| x), true),
        bounds(comp_points.iter().map(|(_, y)| y), true),
    ) {
        let mut chart = ChartBuilder::on(&panels[1])
            .caption("Compression vs expansion", ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d((gx_lo..gx_hi).log_scale(), (gy_lo..gy_hi).log_scale())
            .map_err(plot_err)?;
        chart
            .configure_mesh()
            .x_desc("a / a_0")
            .y_desc("C(t)")
            .draw()
            .map_err(plot_err)?;
        chart
            .draw_series(LineSeries::new(comp_points, &BLACK))
            .map_err(plot_err)?;
    }

    // (3)-(5) against radiation-era expansion
    if let Some(reference) = StandardModelReference::from_trajectory(trajectory) {
        let rt = &reference.times;
        draw_against_reference(
            &panels[2],
            "Scale factor vs a ∝ t^(2/3)",
            "a",
            vec![(positive_pairs(times, &trajectory.scale_factors()), BLUE)],
            positive_pairs(rt, &reference.scale_factor),
        )?;
        draw_against_reference(
            &panels[3],
            "Temperature vs T ∝ t^(-1/2)",
            "T",
            vec![(positive_pairs(times, &trajectory.temperatures()), RED)],
            positive_pairs(rt, &reference.temperature),
        )?;
        draw_against_reference(
            &panels[4],
            "Model / standard (a blue, T red)",
            "ratio",
            vec![
                (positive_pairs(rt, &reference.scale_factor_ratio()), BLUE),
                (positive_pairs(rt, &reference.temperature_ratio()), RED),
            ],
            rt.iter().map(|&t| (t, 1.0)).collect(),
        )?;
    }

    // (6) verdicts
    let verdicts = [
        ("dynamic constants", run.hypotheses.dynamic_constants.supported),
        ("compression", run.hypotheses.compression.supported),
        ("solver", run.success()),
        ("stability", run.stability.numerically_stable),
    ];
    let mut chart = ChartBuilder::on(&panels[5])
        .caption("Verdicts", ("sans-serif", 22))
        .margin(20)
        .build_cartesian_2d(0.0..verdicts.len() as f64, 0.0..1.0)
        .map_err(plot_err)?;
    chart
        .draw_series(verdicts.iter().enumerate().map(|(i, (_, ok))| {
            let color = if *ok { GREEN.mix(0.7) } else { RED.mix(0.7) };
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.1), (x + 0.9, 0.9)], color.filled())
        }))
        .map_err(plot_err)?;
    chart
        .draw_series(verdicts.iter().enumerate().map(|(i, (label, ok))| {
            let mark = if *ok { "yes" } else { "no" };
            Text::new(
                format!("{label}: {mark}"),
                (i as f64 + 0.15, 0.5),
                ("sans-serif", 16).into_font(),
            )
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    debug!(path = %path.display(), "overview plot written");
    Ok(())
}
