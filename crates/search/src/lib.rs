//! autodrop search crate - exhaustive placement search for the current piece.

mod exhaustive;

pub use exhaustive::{Candidate, CandidateList, ExhaustiveSearch, INITIAL_BEST, INLINE_CANDIDATES};

use autodrop_core::{Board, PieceKind, Placement};
use autodrop_eval::Weights;

/// Best hard-drop landing of `kind` on `board` under `weights`.
pub fn solve(board: &Board, kind: PieceKind, weights: &Weights) -> Option<Placement> {
    ExhaustiveSearch::new(weights).find_best_placement(board, kind)
}
