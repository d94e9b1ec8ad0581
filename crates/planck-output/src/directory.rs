// ─────────────────────────────────────────────────────────────────────
// Planck Epoch Lab — Results Directory
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Output directory created on demand, with timestamped file names:
//!
//! - `physics_test_results_<ts>.json`
//! - `physics_test_series_<ts>.npz`
//! - `physics_test_visualization_<ts>.png`

use crate::arrays::write_series_npz;
use crate::plot::render_overview;
use crate::summary::write_summary;
use planck_core::simulation::SimulationRun;
use planck_types::config::OutputConfig;
use planck_types::error::PlanckResult;
use planck_types::results::SimulationSummary;
use std::path::{Path, PathBuf};
use tracing::info;

const SUMMARY_PREFIX: &str = "physics_test_results";
const SERIES_PREFIX: &str = "physics_test_series";
const PLOT_PREFIX: &str = "physics_test_visualization";

/// Paths actually written by [`ResultsDirectory::save_run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedOutputs {
    pub summary: Option<PathBuf>,
    pub series: Option<PathBuf>,
    pub plot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsDirectory {
    root: PathBuf,
}

impl ResultsDirectory {
    /// Create `path` (and parents) if missing.
    pub fn create(path: impl AsRef<Path>) -> PlanckResult<Self> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(ResultsDirectory { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn summary_path(&self, timestamp: &str) -> PathBuf {
        self.root.join(format!("{SUMMARY_PREFIX}_{timestamp}.json"))
    }

    pub fn series_path(&self, timestamp: &str) -> PathBuf {
        self.root.join(format!("{SERIES_PREFIX}_{timestamp}.npz"))
    }

    pub fn plot_path(&self, timestamp: &str) -> PathBuf {
        self.root.join(format!("{PLOT_PREFIX}_{timestamp}.png"))
    }

    /// Write the outputs enabled in `output` for one run.
    pub fn save_run(
        &self,
        run: &SimulationRun,
        summary: &SimulationSummary,
        output: &OutputConfig,
    ) -> PlanckResult<SavedOutputs> {
        let ts = summary.timestamp.as_str();
        let mut saved = SavedOutputs::default();

        if output.save_json {
            let path = self.summary_path(ts);
            write_summary(&path, summary)?;
            saved.summary = Some(path);
        }
        if output.save_arrays {
            let path = self.series_path(ts);
            write_series_npz(&path, run)?;
            saved.series = Some(path);
        }
        if output.save_plots {
            let path = self.plot_path(ts);
            render_overview(&path, run)?;
            saved.plot = Some(path);
        }

        info!(dir = %self.root.display(), timestamp = ts, "results saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ResultsDirectory::create(tmp.path().join("a/b/results")).unwrap();
        assert!(dir.path().is_dir());
        // Idempotent on an existing directory.
        assert!(ResultsDirectory::create(dir.path()).is_ok());
    }

    #[test]
    fn test_file_names() {
        let dir = ResultsDirectory {
            root: PathBuf::from("out"),
        };
        let ts = "20250828_202132";
        assert_eq!(
            dir.summary_path(ts),
            Path::new("out/physics_test_results_20250828_202132.json")
        );
        assert!(dir.series_path(ts).to_string_lossy().ends_with("physics_test_series_20250828_202132.npz"));
        assert!(dir.plot_path(ts).to_string_lossy().ends_with(".png"));
    }
}
