//! Piece kinds and their rotation tables.
//! Every rotation is a short list of row bitmasks inside its own bounding box,
//! top row first, bit 0 = leftmost column of the box.

use serde::{Deserialize, Serialize};

/// One fixed orientation of a piece kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct RotationState {
    rows: &'static [u64],
    width: usize,
    height: usize,
}

impl RotationState {
    const fn new(rows: &'static [u64], width: usize, height: usize) -> Self {
        assert!(rows.len() == height && height <= 4 && width <= 4);
        Self {
            rows,
            width,
            height,
        }
    }

    /// Row bitmasks, top to bottom.
    #[inline(always)]
    pub fn rows(&self) -> &'static [u64] {
        self.rows
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row `h` of the box moved `x` columns to the right on the board.
    #[inline(always)]
    pub fn shifted_row(&self, h: usize, x: usize) -> u64 {
        self.rows[h] << x
    }

    /// Occupied (column, row) cells relative to the bounding box.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(y, &row)| {
            (0..self.width)
                .filter(move |&x| (row >> x) & 1 == 1)
                .map(move |x| (x, y))
        })
    }
}

static I_ROTATIONS: [RotationState; 2] = [
    RotationState::new(&[1, 1, 1, 1], 1, 4),
    RotationState::new(&[15], 4, 1),
];

static T_ROTATIONS: [RotationState; 4] = [
    RotationState::new(&[2, 7], 3, 2),
    RotationState::new(&[2, 3, 2], 2, 3),
    RotationState::new(&[7, 2], 3, 2),
    RotationState::new(&[1, 3, 1], 2, 3),
];

static O_ROTATIONS: [RotationState; 1] = [RotationState::new(&[3, 3], 2, 2)];

static L_ROTATIONS: [RotationState; 4] = [
    RotationState::new(&[2, 2, 3], 2, 3),
    RotationState::new(&[7, 4], 3, 2),
    RotationState::new(&[3, 1, 1], 2, 3),
    RotationState::new(&[1, 7], 3, 2),
];

static J_ROTATIONS: [RotationState; 4] = [
    RotationState::new(&[7, 1], 3, 2),
    RotationState::new(&[1, 1, 3], 2, 3),
    RotationState::new(&[4, 7], 3, 2),
    RotationState::new(&[3, 2, 2], 2, 3),
];

static Z_ROTATIONS: [RotationState; 2] = [
    RotationState::new(&[6, 3], 3, 2),
    RotationState::new(&[1, 3, 2], 2, 3),
];

static S_ROTATIONS: [RotationState; 2] = [
    RotationState::new(&[3, 6], 3, 2),
    RotationState::new(&[2, 3, 1], 2, 3),
];

/// The seven tetromino kinds, in generator index order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    T,
    O,
    L,
    J,
    Z,
    S,
}

impl PieceKind {
    pub const COUNT: usize = 7;

    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::T,
        PieceKind::O,
        PieceKind::L,
        PieceKind::J,
        PieceKind::Z,
        PieceKind::S,
    ];

    /// Position in [`PieceKind::ALL`]; this is the value the generator draws.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Rotation cycle in catalog order.
    #[inline]
    pub fn rotations(self) -> &'static [RotationState] {
        match self {
            PieceKind::I => &I_ROTATIONS,
            PieceKind::T => &T_ROTATIONS,
            PieceKind::O => &O_ROTATIONS,
            PieceKind::L => &L_ROTATIONS,
            PieceKind::J => &J_ROTATIONS,
            PieceKind::Z => &Z_ROTATIONS,
            PieceKind::S => &S_ROTATIONS,
        }
    }

    #[inline]
    pub fn rotation(self, index: usize) -> Option<&'static RotationState> {
        self.rotations().get(index)
    }

    #[inline]
    pub fn rotation_count(self) -> usize {
        self.rotations().len()
    }

    pub fn letter(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::T => 'T',
            PieceKind::O => 'O',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_counts() {
        let counts: Vec<usize> = PieceKind::ALL.iter().map(|k| k.rotation_count()).collect();
        assert_eq!(counts, vec![2, 4, 1, 4, 4, 2, 2]);
    }

    #[test]
    fn test_every_rotation_has_four_cells() {
        for kind in PieceKind::ALL {
            for (i, rot) in kind.rotations().iter().enumerate() {
                assert_eq!(rot.cells().count(), 4, "{} rotation {}", kind, i);
            }
        }
    }

    #[test]
    fn test_rows_fit_bounding_box() {
        for kind in PieceKind::ALL {
            for rot in kind.rotations() {
                assert_eq!(rot.rows().len(), rot.height());
                let mut union = 0u64;
                for &row in rot.rows() {
                    assert!(row < (1 << rot.width()));
                    assert_ne!(row, 0);
                    union |= row;
                }
                // box is tight: every column is used by some row
                assert_eq!(union, (1 << rot.width()) - 1);
            }
        }
    }

    #[test]
    fn test_catalog_reads_are_stable() {
        let first = PieceKind::T.rotation(2).copied();
        let second = PieceKind::T.rotation(2).copied();
        assert_eq!(first, second);
        assert_eq!(first.map(|r| r.rows()), Some(&[7u64, 2][..]));
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceKind::from_index(i), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
    }

    #[test]
    fn test_shifted_row() {
        let rot = PieceKind::I.rotation(1).copied().expect("horizontal I");
        assert_eq!(rot.shifted_row(0, 3), 15 << 3);
    }

    #[test]
    fn test_t_cells() {
        let rot = PieceKind::T.rotation(0).copied().expect("T spawn rotation");
        let cells: Vec<_> = rot.cells().collect();
        assert_eq!(cells, vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
    }
}
