//! Persistence for simulation runs: JSON summaries, npz series bundles and
//! PNG overviews under a timestamped naming scheme.

pub mod arrays;
pub mod directory;
pub mod plot;
pub mod summary;
pub mod timestamp;

pub use directory::{ResultsDirectory, SavedOutputs};
