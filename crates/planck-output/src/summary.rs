// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — JSON Summary
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use planck_types::error::PlanckResult;
use planck_types::results::SimulationSummary;
use std::path::Path;
use tracing::debug;

/// Pretty-printed JSON.
pub fn write_summary(path: &Path, summary: &SimulationSummary) -> PlanckResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    debug!(path = %path.display(), "summary written");
    Ok(())
}

pub fn read_summary(path: &Path) -> PlanckResult<SimulationSummary> {
    SimulationSummary::from_file(path)
}
