//! board representation - one u64 bitset per row, row 0 on top
//! bit x of a row is column x, so a full row is (1 << width) - 1

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Remove full rows in place, compacting the survivors toward the bottom
/// (the end of the slice) and zero-filling the vacated top rows.
/// Returns how many rows were removed.
///
/// Both the real line clear and the evaluator's simulated clear go through
/// here, so they always agree on the resulting rows and count.
pub fn melt_rows(rows: &mut [u64], full_mask: u64) -> u32 {
    let mut melted = 0u32;
    let mut write = rows.len();
    for read in (0..rows.len()).rev() {
        let row = rows[read];
        if row == full_mask {
            melted += 1;
        } else {
            write -= 1;
            rows[write] = row;
        }
    }
    rows[..write].fill(0);
    melted
}

/// Row-major Tetris board.
/// Width is bounded by the row word: at most 63 columns.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr", into = "BoardRepr")]
pub struct Board {
    width: usize,
    rows: Vec<u64>,
}

#[derive(Serialize, Deserialize)]
struct BoardRepr {
    width: usize,
    rows: Vec<u64>,
}

impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        Self {
            width: board.width,
            rows: board.rows,
        }
    }
}

impl TryFrom<BoardRepr> for Board {
    type Error = CoreError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        Board::from_rows(repr.width, repr.rows)
    }
}

impl Board {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;

    /// Every rotation of the I piece must fit: 4 wide lying down, 4 tall standing.
    pub const MIN_WIDTH: usize = 4;
    pub const MIN_HEIGHT: usize = 4;
    pub const MAX_WIDTH: usize = 63;

    /// Empty board. Fails on dimensions outside the supported envelope or when
    /// the row storage cannot be allocated.
    pub fn new(width: usize, height: usize) -> Result<Self, CoreError> {
        Self::check_dimensions(width, height)?;
        let mut rows = Vec::new();
        rows.try_reserve_exact(height)
            .map_err(|_| CoreError::Allocation { rows: height })?;
        rows.resize(height, 0);
        Ok(Self { width, rows })
    }

    /// Build from explicit rows (top first). Every row must fit the width.
    pub fn from_rows(width: usize, rows: Vec<u64>) -> Result<Self, CoreError> {
        Self::check_dimensions(width, rows.len())?;
        let full = full_mask(width);
        if let Some((index, &value)) = rows.iter().enumerate().find(|(_, &r)| r & !full != 0) {
            return Err(CoreError::RowOutOfRange {
                index,
                value,
                width,
            });
        }
        Ok(Self { width, rows })
    }

    fn check_dimensions(width: usize, height: usize) -> Result<(), CoreError> {
        if !(Self::MIN_WIDTH..=Self::MAX_WIDTH).contains(&width) || height < Self::MIN_HEIGHT {
            return Err(CoreError::InvalidDimensions {
                width,
                height,
                min_width: Self::MIN_WIDTH,
                max_width: Self::MAX_WIDTH,
                min_height: Self::MIN_HEIGHT,
            });
        }
        Ok(())
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline(always)]
    pub fn full_row_mask(&self) -> u64 {
        full_mask(self.width)
    }

    #[inline(always)]
    pub fn row(&self, y: usize) -> u64 {
        self.rows[y]
    }

    /// All rows, top first - for copying into scratch buffers
    #[inline]
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// OR bits into a row. Cells are never cleared by this.
    #[inline(always)]
    pub fn or_row(&mut self, y: usize, bits: u64) {
        self.rows[y] |= bits;
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        (self.rows[y] >> x) & 1 == 1
    }

    pub fn set(&mut self, x: usize, y: usize, filled: bool) {
        if filled {
            self.rows[y] |= 1 << x;
        } else {
            self.rows[y] &= !(1 << x);
        }
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y] == self.full_row_mask()
    }

    pub fn is_row_empty(&self, y: usize) -> bool {
        self.rows[y] == 0
    }

    /// Top-out condition: anything in the topmost row.
    #[inline]
    pub fn top_row_occupied(&self) -> bool {
        self.rows[0] != 0
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }

    pub fn filled_cells(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    /// Remove full rows, shift the rest down, zero the top. Returns rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let full = self.full_row_mask();
        melt_rows(&mut self.rows, full)
    }
}

#[inline(always)]
fn full_mask(width: usize) -> u64 {
    (1u64 << width) - 1
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height() {
            write!(f, "|")?;
            for x in 0..self.width {
                write!(f, "{}", if self.get(x, y) { "[]" } else { "  " })?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "+{}+", "-".repeat(self.width * 2))
    }
}
