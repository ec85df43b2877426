//! autodrop eval crate - six-feature board heuristic.
//!
//! The evaluator judges a candidate board that already contains the piece being
//! considered. It first clears full rows on a private copy, then measures the
//! cleared board: row transitions, column transitions, holes and wells, plus the
//! landing height of the piece before the clear.

mod weights;

use autodrop_core::{melt_rows, Board, RotationState};
use smallvec::SmallVec;

pub use weights::{EvalError, Weights};

/// Inline capacity for call-local row copies; taller boards spill to the heap.
pub const SCRATCH_ROWS: usize = 32;

pub type ScratchRows = SmallVec<[u64; SCRATCH_ROWS]>;

/// Raw feature values of one candidate board.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoardFeatures {
    pub landing_height: f64,
    pub melted: u32,
    pub row_transitions: u32,
    pub column_transitions: u32,
    /// Closed-form per-column count; can go negative for some stacks.
    pub holes: i32,
    pub well_sums: u32,
}

impl BoardFeatures {
    /// Measure `rows` (top first, `width` columns). The piece was dropped with
    /// `rotation` and its box top came to rest at `landing_y`.
    pub fn compute(rows: &[u64], width: usize, landing_y: i32, rotation: &RotationState) -> Self {
        let height = rows.len();
        let full = (1u64 << width) - 1;

        let mut cleared: ScratchRows = SmallVec::from_slice(rows);
        let melted = melt_rows(&mut cleared, full);

        let row_transitions = row_transitions(&cleared, width);
        let (column_transitions, well_sums) = column_transitions_and_wells(&cleared, width);
        let holes = holes(&cleared, width);

        let box_height = rotation.height() as f64;
        let landing_height =
            (height as f64 - (landing_y as f64 + box_height)) + (box_height - 1.0) / 2.0;

        Self {
            landing_height,
            melted,
            row_transitions,
            column_transitions,
            holes,
            well_sums,
        }
    }

    /// Weighted sum of the features.
    #[inline]
    pub fn score(&self, weights: &Weights) -> f64 {
        weights.landing_height() * self.landing_height
            + weights.lines_cleared() * self.melted as f64
            + weights.row_transitions() * self.row_transitions as f64
            + weights.column_transitions() * self.column_transitions as f64
            + weights.holes() * self.holes as f64
            + weights.well_sums() * self.well_sums as f64
    }
}

/// Score a candidate board given as rows. `rows` is left untouched.
#[inline]
pub fn evaluate(
    rows: &[u64],
    width: usize,
    landing_y: i32,
    rotation: &RotationState,
    weights: &Weights,
) -> f64 {
    BoardFeatures::compute(rows, width, landing_y, rotation).score(weights)
}

pub fn evaluate_board(
    board: &Board,
    landing_y: i32,
    rotation: &RotationState,
    weights: &Weights,
) -> f64 {
    evaluate(board.rows(), board.width(), landing_y, rotation, weights)
}

#[inline(always)]
fn bit(row: u64, x: usize) -> u64 {
    (row >> x) & 1
}

/// Left to right, with occupied walls on both sides of every row.
fn row_transitions(rows: &[u64], width: usize) -> u32 {
    let mut transitions = 0u32;
    for &row in rows {
        let mut last = 1u64;
        for x in 0..width {
            let cell = bit(row, x);
            if cell != last {
                transitions += 1;
            }
            last = cell;
        }
        if last == 0 {
            transitions += 1;
        }
    }
    transitions
}

/// Top to bottom per column: empty sky above, occupied floor below.
/// Wells are empty cells walled in horizontally (the board edge only counts
/// as a wall on the outer side of the edge columns); a run of n adds n(n+1)/2.
fn column_transitions_and_wells(rows: &[u64], width: usize) -> (u32, u32) {
    let mut transitions = 0u32;
    let mut well_sums = 0u32;

    for x in 0..width {
        let mut last = 0u64;
        let mut run = 0u32;
        for &row in rows {
            let cell = bit(row, x);
            if cell != last {
                transitions += 1;
            }
            last = cell;

            let is_well = cell == 0
                && if x == 0 {
                    bit(row, 1) == 1
                } else if x == width - 1 {
                    bit(row, x - 1) == 1
                } else {
                    bit(row, x - 1) == 1 && bit(row, x + 1) == 1
                };

            if is_well {
                run += 1;
            } else if run > 0 {
                well_sums += run * (run + 1) / 2;
                run = 0;
            }
        }
        if run > 0 {
            well_sums += run * (run + 1) / 2;
        }
        if last == 0 {
            transitions += 1;
        }
    }

    (transitions, well_sums)
}

/// Per column: height - mark - filled, where `mark` takes the row of an occupied
/// cell for as long as it is still 0. A column whose top occupied cell sits in
/// row 0 therefore takes its mark from the next occupied cell down.
fn holes(rows: &[u64], width: usize) -> i32 {
    let height = rows.len() as i32;
    let mut holes = 0i32;
    for x in 0..width {
        let mut mark = 0i32;
        let mut filled = 0i32;
        for (y, &row) in rows.iter().enumerate() {
            if bit(row, x) == 1 {
                filled += 1;
                if mark == 0 {
                    mark = y as i32;
                }
            }
        }
        if filled > 0 {
            holes += height - mark - filled;
        }
    }
    holes
}
