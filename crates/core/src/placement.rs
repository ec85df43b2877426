//! Placement - where a piece comes to rest after a hard drop.

use serde::{Deserialize, Serialize};

use crate::{PieceKind, RotationState};

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PieceKind,
    /// Index into `kind.rotations()`.
    pub rotation: usize,
    /// Column of the bounding box's left edge.
    pub x: i32,
    /// Row of the bounding box's top edge (row 0 is the top of the board).
    pub y: i32,
    pub score: f64,
}

impl Placement {
    pub fn new(kind: PieceKind, rotation: usize, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
            score: 0.0,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Rotation state this placement uses, if the index is valid for the kind.
    pub fn rotation_state(&self) -> Option<&'static RotationState> {
        self.kind.rotation(self.rotation)
    }

    /// Same landing spot, ignoring score.
    pub fn same_spot(&self, other: &Placement) -> bool {
        self.kind == other.kind
            && self.rotation == other.rotation
            && self.x == other.x
            && self.y == other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_new() {
        let p = Placement::new(PieceKind::T, 2, 4, 17);
        assert_eq!(p.kind, PieceKind::T);
        assert_eq!(p.rotation, 2);
        assert_eq!(p.x, 4);
        assert_eq!(p.y, 17);
        assert_eq!(p.score, 0.0);
    }

    #[test]
    fn test_with_score_keeps_spot() {
        let p = Placement::new(PieceKind::L, 1, 0, 18);
        let scored = p.with_score(-12.5);
        assert!(scored.same_spot(&p));
        assert_eq!(scored.score, -12.5);
    }

    #[test]
    fn test_rotation_state_lookup() {
        assert!(Placement::new(PieceKind::O, 0, 0, 0).rotation_state().is_some());
        assert!(Placement::new(PieceKind::O, 1, 0, 0).rotation_state().is_none());
    }
}
