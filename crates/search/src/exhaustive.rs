use std::cmp::Ordering;

use autodrop_core::{Board, PieceKind, Placement};
use autodrop_engine::{hard_drop_y, stamp_rows};
use autodrop_eval::{BoardFeatures, ScratchRows, Weights};
use smallvec::SmallVec;

/// Starting incumbent score; a landing must beat this to be chosen.
pub const INITIAL_BEST: f64 = -1e9;

/// Inline candidate slots. Covers the most landings any kind has on a 10-wide
/// board (T/L/J: 8 + 9 + 8 + 9 = 34), rounded up to a size smallvec supports.
pub const INLINE_CANDIDATES: usize = 36;

/// One scored landing together with the features that produced its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub placement: Placement,
    pub features: BoardFeatures,
}

pub type CandidateList = SmallVec<[Candidate; INLINE_CANDIDATES]>;

/// Tries every rotation at every column, hard-drops it, and scores the result.
pub struct ExhaustiveSearch<'w> {
    weights: &'w Weights,
}

impl<'w> ExhaustiveSearch<'w> {
    pub fn new(weights: &'w Weights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &'w Weights {
        self.weights
    }

    /// Best landing for `kind`. Ties keep the first one found: lowest rotation
    /// index, then lowest column.
    pub fn find_best_placement(&self, board: &Board, kind: PieceKind) -> Option<Placement> {
        let mut best: Option<Placement> = None;
        let mut best_score = INITIAL_BEST;
        self.for_each_landing(board, kind, |placement, features| {
            let score = features.score(self.weights);
            if score > best_score {
                best_score = score;
                best = Some(placement.with_score(score));
            }
        });
        best
    }

    /// Every landing in enumeration order, scored.
    pub fn candidates(&self, board: &Board, kind: PieceKind) -> CandidateList {
        let mut out = CandidateList::new();
        self.for_each_landing(board, kind, |placement, features| {
            out.push(Candidate {
                placement: placement.with_score(features.score(self.weights)),
                features,
            });
        });
        out
    }

    /// The `n` best landings, best first. Equal scores stay in enumeration order.
    pub fn find_top_placements(&self, board: &Board, kind: PieceKind, n: usize) -> Vec<Candidate> {
        if n == 0 {
            return Vec::new();
        }
        let mut scored = self.candidates(board, kind).into_vec();
        scored.sort_by(|a, b| score_cmp(a.placement.score, b.placement.score));
        scored.truncate(n);
        scored
    }

    fn for_each_landing<F>(&self, board: &Board, kind: PieceKind, mut visit: F)
    where
        F: FnMut(Placement, BoardFeatures),
    {
        let width = board.width();
        let mut scratch: ScratchRows = SmallVec::with_capacity(board.height());

        for (index, rotation) in kind.rotations().iter().enumerate() {
            let Some(max_x) = width.checked_sub(rotation.width()) else {
                continue;
            };
            for x in 0..=max_x as i32 {
                let y = hard_drop_y(board, rotation, x);

                scratch.clear();
                scratch.extend_from_slice(board.rows());
                stamp_rows(&mut scratch, width, rotation, x, y);

                let features = BoardFeatures::compute(&scratch, width, y, rotation);
                visit(Placement::new(kind, index, x, y), features);
            }
        }
    }
}

fn score_cmp(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
