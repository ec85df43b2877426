use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(
        "board dimensions {width}x{height} outside supported range \
         (width {min_width}..={max_width}, height >= {min_height})"
    )]
    InvalidDimensions {
        width: usize,
        height: usize,
        min_width: usize,
        max_width: usize,
        min_height: usize,
    },

    #[error("failed to allocate storage for {rows} board rows")]
    Allocation { rows: usize },

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {index} value {value:#x} does not fit a {width}-column board")]
    RowOutOfRange { index: usize, value: u64, width: usize },
}
