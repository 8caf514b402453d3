//! Seeded perfect-maze generation with longest-path endpoint selection.

pub mod error;
pub mod generate;
pub mod grid;
pub mod maze;
pub mod pathfind;
pub mod play;

pub use error::{MazeError, Result};
pub use generate::{generate, generate_with, Generated, Strategy};
pub use grid::{board_to_cell, cell_to_board, is_open, wall_between, Board, BoardPos, CellId, Dir, Tile};
pub use maze::Maze;
pub use pathfind::{shortest_paths, DistanceTable};
pub use play::{score, score_endless, Player, Step};
