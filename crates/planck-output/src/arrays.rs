// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Series Bundle (npz)
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Compressed `.npz` bundle of a run's sampled series.
//!
//! Entries: `times` (n), `states` (n×4, columns a, ȧ, ρ, T), `hubble`,
//! `compression`, and one array per constant symbol (`G`, `c`, `h`, `alpha`).

use ndarray_npy::NpzWriter;
use planck_core::simulation::SimulationRun;
use planck_types::error::{PlanckError, PlanckResult};
use std::fs::File;
use std::path::Path;
use tracing::debug;

fn npz_err(e: impl std::fmt::Display) -> PlanckError {
    PlanckError::Npz(e.to_string())
}

pub fn write_series_npz(path: &Path, run: &SimulationRun) -> PlanckResult<()> {
    let file = File::create(path)?;
    let mut npz = NpzWriter::new_compressed(file);

    let trajectory = run.trajectory();
    npz.add_array("times", &trajectory.times_array())
        .map_err(npz_err)?;
    npz.add_array("states", &trajectory.states_array())
        .map_err(npz_err)?;
    for (name, array) in run.derived.named_arrays() {
        npz.add_array(name.as_str(), &array).map_err(npz_err)?;
    }
    npz.finish().map_err(npz_err)?;

    debug!(path = %path.display(), points = trajectory.len(), "series bundle written");
    Ok(())
}
