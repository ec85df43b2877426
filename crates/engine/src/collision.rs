//! collision detection - walls, floor, other blocks

use autodrop_core::{Board, RotationState};

/// Does the rotation's bounding box at (x, y) leave the board or overlap a cell?
/// `y` is the box's top row, measured from the top of the board.
#[inline]
pub fn collides(board: &Board, rotation: &RotationState, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 {
        return true;
    }
    let (x, y) = (x as usize, y as usize);
    if x + rotation.width() > board.width() {
        return true;
    }
    if y + rotation.height() > board.height() {
        return true;
    }
    rotation
        .rows()
        .iter()
        .enumerate()
        .any(|(h, &row)| (row << x) & board.row(y + h) != 0)
}

/// Drop straight down from the top row until one more step would collide.
/// The starting row itself is not checked.
#[inline]
pub fn hard_drop_y(board: &Board, rotation: &RotationState, x: i32) -> i32 {
    let mut y = 0;
    while !collides(board, rotation, x, y + 1) {
        y += 1;
    }
    y
}
