use autodrop_core::{Board, Placement, RotationState};

/// OR a rotation's rows into row storage at (x, y), top row of the box first.
/// Bits are only ever added. Rows past the end of `rows` and columns past
/// `width` are clipped; the search never produces such positions.
#[inline]
pub fn stamp_rows(rows: &mut [u64], width: usize, rotation: &RotationState, x: i32, y: i32) {
    debug_assert!(x >= 0 && y >= 0, "stamp at negative position ({x}, {y})");
    let (x, y) = (x.max(0) as usize, y.max(0) as usize);
    let mask = (1u64 << width) - 1;
    for (h, &row) in rotation.rows().iter().enumerate() {
        if let Some(target) = rows.get_mut(y + h) {
            *target |= (row << x) & mask;
        }
    }
}

/// Write a rotation into a board in place.
#[inline]
pub fn stamp(board: &mut Board, rotation: &RotationState, x: i32, y: i32) {
    debug_assert!(x >= 0 && y >= 0, "stamp at negative position ({x}, {y})");
    let (x, y) = (x.max(0) as usize, y.max(0) as usize);
    let mask = board.full_row_mask();
    for (h, &row) in rotation.rows().iter().enumerate() {
        if y + h < board.height() {
            board.or_row(y + h, (row << x) & mask);
        }
    }
}

/// Apply a placement to a copy of the board and clear lines.
/// Returns the resulting board and lines cleared; unknown rotations leave the
/// board unchanged.
pub fn apply_placement(board: &Board, placement: &Placement) -> (Board, u32) {
    let mut next = board.clone();
    if let Some(rotation) = placement.rotation_state() {
        stamp(&mut next, rotation, placement.x, placement.y);
    }
    let lines = next.clear_lines();
    (next, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodrop_core::PieceKind;

    #[test]
    fn test_apply_t_piece_empty() {
        let board = Board::new(10, 20).expect("board");
        let p = Placement::new(PieceKind::T, 0, 4, 18);
        let (next, lines) = apply_placement(&board, &p);

        assert_eq!(lines, 0);
        assert!(next.get(5, 18));
        assert!(next.get(4, 19));
        assert!(next.get(5, 19));
        assert!(next.get(6, 19));
        assert_eq!(next.filled_cells(), 4);
    }

    #[test]
    fn test_apply_i_piece_line_clear() {
        let mut board = Board::new(10, 20).expect("board");
        // bottom row full except columns 3..=6
        board.or_row(19, 0x3FF & !(0b1111 << 3));

        let p = Placement::new(PieceKind::I, 1, 3, 19);
        let (next, lines) = apply_placement(&board, &p);

        assert_eq!(lines, 1);
        assert!(next.is_empty());
    }

    #[test]
    fn test_stamp_never_clears_cells() {
        let mut board = Board::new(10, 20).expect("board");
        board.or_row(19, 0x3FF);
        let o = PieceKind::O.rotation(0).expect("O");
        stamp(&mut board, o, 0, 18);
        assert_eq!(board.row(19), 0x3FF);
        assert_eq!(board.row(18), 0b11);
    }

    #[test]
    fn test_stamp_rows_matches_stamp() {
        let mut board = Board::new(10, 20).expect("board");
        let mut rows = board.rows().to_vec();
        let z = PieceKind::Z.rotation(1).expect("Z vertical");
        stamp(&mut board, z, 7, 5);
        stamp_rows(&mut rows, 10, z, 7, 5);
        assert_eq!(board.rows(), &rows[..]);
    }
}
