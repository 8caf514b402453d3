use thiserror::Error;

use crate::grid::BoardPos;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("maze dimensions must hold at least two cells, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("board dimensions {width}x{height} are not both odd; is this a generated maze?")]
    InvalidBoard { width: usize, height: usize },

    #[error("source {0:?} is not a cell center (2m+1, 2n+1)")]
    InvalidSource(BoardPos),

    #[error("all rows in a maze must have the same length: expected {expected}, got {found} on line {line}")]
    InconsistentRowWidth {
        expected: usize,
        found: usize,
        line: usize,
    },

    #[error("maze cannot have multiple start points")]
    MultipleStartPoints,

    #[error("maze cannot have multiple end points")]
    MultipleEndPoints,

    #[error("maze has no start point")]
    MissingStartPoint,

    #[error("maze has no end point")]
    MissingEndPoint,

    #[error("invalid maze tile {tile:?} at line {line}, column {column}")]
    InvalidTile {
        tile: char,
        line: usize,
        column: usize,
    },

    #[error("failed to read maze file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
