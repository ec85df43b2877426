//! autodrop core crate - board, piece catalog, and placement types.

mod board;
mod error;
mod piece;
mod placement;

pub use board::{melt_rows, Board};
pub use error::CoreError;
pub use piece::{PieceKind, RotationState};
pub use placement::Placement;
