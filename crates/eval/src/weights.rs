use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("expected {expected} weights, found {found}")]
    WeightCount { expected: usize, found: usize },

    #[error("invalid weight {value:?}: {reason}")]
    Parse { value: String, reason: String },
}

/// Six feature coefficients, in evaluator order:
/// landing height, lines melted, row transitions, column transitions, holes, well sums.
///
/// The evaluator treats these as opaque; no sign or range checks are made.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(pub [f64; Weights::LEN]);

impl Weights {
    pub const LEN: usize = 6;

    /// Hand-tuned vector used for the reference verification run.
    pub const REFERENCE: Weights = Weights([
        -4.500158825082766,
        3.4181268101392694,
        -3.2178882868487753,
        -9.348695305445199,
        -7.899265427351652,
        -3.3855972247263626,
    ]);

    pub fn new(values: [f64; Weights::LEN]) -> Self {
        Self(values)
    }

    #[inline(always)]
    pub fn landing_height(&self) -> f64 {
        self.0[0]
    }

    #[inline(always)]
    pub fn lines_cleared(&self) -> f64 {
        self.0[1]
    }

    #[inline(always)]
    pub fn row_transitions(&self) -> f64 {
        self.0[2]
    }

    #[inline(always)]
    pub fn column_transitions(&self) -> f64 {
        self.0[3]
    }

    #[inline(always)]
    pub fn holes(&self) -> f64 {
        self.0[4]
    }

    #[inline(always)]
    pub fn well_sums(&self) -> f64 {
        self.0[5]
    }

    pub fn as_array(&self) -> &[f64; Weights::LEN] {
        &self.0
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl TryFrom<&[f64]> for Weights {
    type Error = EvalError;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let arr: [f64; Weights::LEN] = values.try_into().map_err(|_| EvalError::WeightCount {
            expected: Weights::LEN,
            found: values.len(),
        })?;
        Ok(Self(arr))
    }
}

/// Comma separated, e.g. `-4.5,3.4,-3.2,-9.3,-7.9,-3.4`.
impl FromStr for Weights {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(str::trim)
            .map(|part| {
                part.parse::<f64>().map_err(|e| EvalError::Parse {
                    value: part.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Weights::try_from(values.as_slice())
    }
}
