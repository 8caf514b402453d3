use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{MazeError, Result};
use crate::grid::{cell_to_board, wall_between, Board, CellId, Dir, Tile};
use crate::maze::Maze;
use crate::pathfind::shortest_paths;

/// How the start and end cells are chosen once the maze is carved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Two shortest-path runs: from the first carved cell to the farthest
    /// cell A, then from A to the farthest cell B.
    #[default]
    DoubleSweep,
    /// One shortest-path run from every recorded dead end.
    DeadEnds,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "double-sweep" => Ok(Strategy::DoubleSweep),
            "dead-ends" => Ok(Strategy::DeadEnds),
            other => Err(format!(
                "unknown strategy {other:?} (expected double-sweep or dead-ends)"
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::DoubleSweep => f.write_str("double-sweep"),
            Strategy::DeadEnds => f.write_str("dead-ends"),
        }
    }
}

/// Output of [`generate_with`]: the finished maze plus the carving trace.
#[derive(Clone, Debug)]
pub struct Generated {
    pub maze: Maze,
    /// The cell carving started from.
    pub origin: CellId,
    /// Cells that had no unvisited neighbour when the walk reached them.
    pub dead_ends: Vec<CellId>,
}

/// Generates a perfect maze of `width x height` cells on a
/// `(2*width+1) x (2*height+1)` board. The same arguments always produce the
/// same board for a given `rand` release: `StdRng` does not promise a stable
/// stream across versions, which is why `rand` is held at 0.8.
pub fn generate(width: usize, height: usize, seed: u64) -> Result<Maze> {
    generate_with(width, height, seed, Strategy::default()).map(|g| g.maze)
}

pub fn generate_with(width: usize, height: usize, seed: u64, strategy: Strategy) -> Result<Generated> {
    let invalid = MazeError::InvalidDimensions { width, height };
    if width.saturating_mul(height) < 2 {
        return Err(invalid);
    }
    let board_w = width.checked_mul(2).and_then(|w| w.checked_add(1));
    let board_h = height.checked_mul(2).and_then(|h| h.checked_add(1));
    let (Some(board_w), Some(board_h)) = (board_w, board_h) else {
        return Err(invalid);
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::filled(board_w, board_h, Tile::Wall);
    let (origin, dead_ends) = carve(&mut board, width, height, &mut rng);
    debug!(
        "carved {}x{} maze (seed {}): origin {:?}, {} dead ends",
        width,
        height,
        seed,
        origin,
        dead_ends.len()
    );

    let (start, end, path_len) = match strategy {
        Strategy::DoubleSweep => double_sweep(&board, origin)?,
        Strategy::DeadEnds => farthest_dead_ends(&board, origin, &dead_ends)?,
    };
    debug!(
        "endpoints {:?} -> {:?} ({}), path length {}",
        start, end, strategy, path_len
    );

    let start = cell_to_board(start);
    let end = cell_to_board(end);
    board.set(start, Tile::Start);
    board.set(end, Tile::End);

    Ok(Generated {
        maze: Maze::new(board, start, end, Some(path_len)),
        origin,
        dead_ends,
    })
}

/// Directions from `cell` whose neighbour is still solid wall.
fn candidates(board: &Board, cell: CellId, width: usize, height: usize) -> Vec<CellId> {
    Dir::CARVE_ORDER
        .iter()
        .filter_map(|&dir| cell.neighbor(dir, width, height))
        .filter(|&next| board.get(cell_to_board(next)) == Some(Tile::Wall))
        .collect()
}

/// Randomized depth-first carve with an explicit backtracking stack.
/// Returns the origin cell and every dead end reached, in visit order.
fn carve(board: &mut Board, width: usize, height: usize, rng: &mut impl Rng) -> (CellId, Vec<CellId>) {
    let origin = CellId::new(rng.gen_range(0..width), rng.gen_range(0..height));
    board.set(cell_to_board(origin), Tile::Empty);

    let mut to_visit = width * height - 1;
    let mut stack: Vec<CellId> = Vec::with_capacity(width * height);
    stack.push(origin);
    let mut dead_ends = Vec::new();
    let mut current = origin;

    while to_visit > 0 {
        let mut options = candidates(board, current, width, height);
        if options.is_empty() {
            dead_ends.push(current);
            while options.is_empty() {
                match stack.pop() {
                    Some(cell) => {
                        current = cell;
                        options = candidates(board, current, width, height);
                    }
                    None => return (origin, dead_ends),
                }
            }
            // Keep the branching cell on the trail for the next backtrack.
            stack.push(current);
        }

        let next = options[rng.gen_range(0..options.len())];
        board.set(wall_between(current, next), Tile::Empty);
        board.set(cell_to_board(next), Tile::Empty);
        to_visit -= 1;
        stack.push(next);
        current = next;
    }

    // The last carved cell is a leaf the loop exits before inspecting.
    dead_ends.push(current);
    (origin, dead_ends)
}

fn double_sweep(board: &Board, origin: CellId) -> Result<(CellId, CellId, usize)> {
    let first = shortest_paths(board, cell_to_board(origin))?;
    let (a, _) = first.farthest().unwrap_or((origin, 0));
    let second = shortest_paths(board, cell_to_board(a))?;
    let (b, len) = second.farthest().unwrap_or((a, 0));
    Ok((a, b, len))
}

fn farthest_dead_ends(board: &Board, origin: CellId, dead_ends: &[CellId]) -> Result<(CellId, CellId, usize)> {
    let mut best = (origin, origin, 0);
    let mut found = false;
    for &src in std::iter::once(&origin).chain(dead_ends) {
        let table = shortest_paths(board, cell_to_board(src))?;
        if let Some((dest, len)) = table.farthest() {
            if !found || len > best.2 {
                best = (src, dest, len);
                found = true;
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BoardPos;

    fn passages(board: &Board) -> usize {
        let mut n = 0;
        for (y, row) in board.rows().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                if (x + y) % 2 == 1 && tile == Tile::Empty {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        for (w, h) in [(0, 3), (3, 0), (0, 0), (1, 1), (usize::MAX, 1), (2, usize::MAX / 2 + 1)] {
            assert!(matches!(
                generate(w, h, 7),
                Err(MazeError::InvalidDimensions { .. })
            ));
        }
    }

    // Carved by rand 0.8 StdRng; a new rand release may need this re-recorded.
    const SEED_42_3X3: &str = "\
#######
#.....#
#.###.#
#.#<#.#
#.#.#.#
#...#>#
#######
";

    #[test]
    fn three_by_three_seed_42() {
        let maze = generate(3, 3, 42).unwrap();
        assert_eq!(maze.width(), 7);
        assert_eq!(maze.height(), 7);
        assert_eq!(maze.board().count(Tile::Start), 1);
        assert_eq!(maze.board().count(Tile::End), 1);
        assert_eq!(maze.path_len(), Some(8));
        assert_eq!(maze.to_string(), SEED_42_3X3);
        for _ in 0..10 {
            assert_eq!(generate(3, 3, 42).unwrap().to_string(), SEED_42_3X3);
        }
    }

    #[test]
    fn carves_a_spanning_tree() {
        for seed in 0..20 {
            let maze = generate(6, 4, seed).unwrap();
            assert_eq!(passages(maze.board()), 6 * 4 - 1);
            let table = shortest_paths(maze.board(), maze.start()).unwrap();
            assert_eq!(table.reached(), 24);
        }
    }

    #[test]
    fn single_row_runs_end_to_end() {
        let maze = generate(5, 1, 3).unwrap();
        assert_eq!(maze.path_len(), Some(4));
        let ends = [maze.start(), maze.end()];
        assert!(ends.contains(&BoardPos::new(1, 1)));
        assert!(ends.contains(&BoardPos::new(9, 1)));
    }

    #[test]
    fn dead_ends_are_leaves() {
        let generated = generate_with(8, 8, 99, Strategy::DeadEnds).unwrap();
        assert!(!generated.dead_ends.is_empty());
        let board = generated.maze.board();
        for cell in &generated.dead_ends {
            let open = Dir::ALL
                .iter()
                .filter_map(|&d| cell.neighbor(d, 8, 8))
                .filter(|&n| board.get(wall_between(*cell, n)) == Some(Tile::Empty))
                .count();
            assert_eq!(open, 1, "dead end {cell:?} has {open} passages");
        }
    }

    #[test]
    fn strategies_agree_on_path_length() {
        for seed in 0..10 {
            let sweep = generate_with(7, 5, seed, Strategy::DoubleSweep).unwrap();
            let dead = generate_with(7, 5, seed, Strategy::DeadEnds).unwrap();
            assert_eq!(sweep.maze.path_len(), dead.maze.path_len());
        }
    }

    #[test]
    fn strategy_parses_from_cli_names() {
        assert_eq!("dead-ends".parse::<Strategy>(), Ok(Strategy::DeadEnds));
        assert_eq!(
            Strategy::DoubleSweep.to_string().parse::<Strategy>(),
            Ok(Strategy::DoubleSweep)
        );
        assert!("bfs".parse::<Strategy>().is_err());
    }
}
