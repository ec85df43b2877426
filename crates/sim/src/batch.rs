//! Independent runs side by side. Every run owns its board and piece source;
//! only the weights are shared.

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use autodrop_engine::SimConfig;
use autodrop_eval::Weights;

use crate::{RunOutcome, SimError, Simulation};

/// One run in a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    pub config: SimConfig,
}

impl RunSpec {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn play(&self, weights: &Weights) -> Result<RunOutcome, SimError> {
        let mut sim = Simulation::from_config(&self.config, weights)?;
        Ok(sim.run(self.config.piece_limit))
    }
}

/// `count` copies of `base` with seeds `first_seed..first_seed + count`.
pub fn seed_range(base: &SimConfig, first_seed: u64, count: usize) -> Vec<RunSpec> {
    (0..count as u64)
        .map(|i| RunSpec::new(base.clone().with_seed(first_seed.wrapping_add(i))))
        .collect()
}

/// Play every spec. Outcomes come back in input order; the first invalid
/// configuration fails the whole batch.
pub fn run_batch(specs: &[RunSpec], weights: &Weights) -> Result<Vec<RunOutcome>, SimError> {
    #[cfg(feature = "rayon")]
    let iter = specs.par_iter();
    #[cfg(not(feature = "rayon"))]
    let iter = specs.iter();

    iter.map(|spec| spec.play(weights)).collect()
}

/// Summary of a batch, ready for JSON output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub runs: Vec<(u64, RunOutcome)>,
    pub total_pieces: u64,
    pub total_lines: u64,
    pub mean_lines: f64,
    pub top_outs: usize,
}

impl BatchReport {
    pub fn new(specs: &[RunSpec], outcomes: &[RunOutcome]) -> Self {
        let runs: Vec<(u64, RunOutcome)> = specs
            .iter()
            .zip(outcomes)
            .map(|(spec, outcome)| (spec.config.seed, *outcome))
            .collect();
        let total_pieces = runs.iter().map(|(_, o)| o.pieces).sum();
        let total_lines = runs.iter().map(|(_, o)| o.lines_cleared).sum();
        let top_outs = runs.iter().filter(|(_, o)| o.topped_out()).count();
        let mean_lines = if runs.is_empty() {
            0.0
        } else {
            total_lines as f64 / runs.len() as f64
        };
        Self {
            runs,
            total_pieces,
            total_lines,
            mean_lines,
            top_outs,
        }
    }
}
