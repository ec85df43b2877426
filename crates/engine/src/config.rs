use autodrop_core::{Board, CoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bag::SevenBag;
use crate::generator::{Lcg, PieceProvider};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Board(#[from] CoreError),
}

/// Which piece source a run draws from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    #[default]
    Lcg,
    SevenBag,
}

impl GeneratorKind {
    pub fn build(self, seed: u64) -> Box<dyn PieceProvider> {
        match self {
            GeneratorKind::Lcg => Box::new(Lcg::new(seed)),
            GeneratorKind::SevenBag => Box::new(SevenBag::new(seed)),
        }
    }
}

/// Parameters of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    /// Upper bound on driver iterations (pieces placed).
    pub piece_limit: u64,
    pub generator: GeneratorKind,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl SimConfig {
    /// 10x20, seed 12345, one million pieces, LCG pieces.
    pub fn reference() -> Self {
        Self {
            width: Board::DEFAULT_WIDTH,
            height: Board::DEFAULT_HEIGHT,
            seed: 12345,
            piece_limit: 1_000_000,
            generator: GeneratorKind::Lcg,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_limit(mut self, piece_limit: u64) -> Self {
        self.piece_limit = piece_limit;
        self
    }

    /// Checks the board dimensions without allocating.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width_ok = (Board::MIN_WIDTH..=Board::MAX_WIDTH).contains(&self.width);
        if !width_ok || self.height < Board::MIN_HEIGHT {
            return Err(CoreError::InvalidDimensions {
                width: self.width,
                height: self.height,
                min_width: Board::MIN_WIDTH,
                max_width: Board::MAX_WIDTH,
                min_height: Board::MIN_HEIGHT,
            }
            .into());
        }
        Ok(())
    }

    pub fn provider(&self) -> Box<dyn PieceProvider> {
        self.generator.build(self.seed)
    }
}
