//! autodrop sim crate - the self-playing driver loop and batch runs.

mod batch;
mod model;
mod outcome;

pub use batch::{run_batch, seed_range, BatchReport, RunSpec};
pub use model::Simulation;
pub use outcome::{EndReason, RunOutcome, StepReport};

use autodrop_core::CoreError;
use autodrop_engine::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
}
