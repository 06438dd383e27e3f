use crate::grid::Coord;

pub type Result<T> = std::result::Result<T, MazeError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze needs at least one room in each direction, got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("endpoint {0} is not an open cell")]
    InvalidEndpoint(Coord),
    #[error("no open cell is left to choose from")]
    NoCandidateCell,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },
}
