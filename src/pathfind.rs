use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;

use crate::error::{MazeError, Result};
use crate::grid::{board_to_cell, is_open, wall_between, Board, BoardPos, CellId, Dir};

/// Per-cell distance from one source, indexed by [`CellId`]. `None` means
/// the cell was never reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceTable {
    cells_w: usize,
    cells_h: usize,
    dist: Vec<Vec<Option<usize>>>,
}

impl DistanceTable {
    fn unreached(cells_w: usize, cells_h: usize) -> Self {
        Self {
            cells_w,
            cells_h,
            dist: vec![vec![None; cells_w]; cells_h],
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.cells_w, self.cells_h)
    }

    pub fn get(&self, cell: CellId) -> Option<usize> {
        self.dist.get(cell.y).and_then(|row| row.get(cell.x)).copied().flatten()
    }

    pub fn reached(&self) -> usize {
        self.dist
            .iter()
            .flat_map(|row| row.iter())
            .filter(|d| d.is_some())
            .count()
    }

    /// Farthest reached cell. Ties go to the first one in row-major order.
    pub fn farthest(&self) -> Option<(CellId, usize)> {
        let mut best: Option<(CellId, usize)> = None;
        for (y, row) in self.dist.iter().enumerate() {
            for (x, d) in row.iter().enumerate() {
                if let Some(d) = *d {
                    match best {
                        Some((_, bd)) if d <= bd => {}
                        _ => best = Some((CellId { x, y }, d)),
                    }
                }
            }
        }
        best
    }
}

/// Dijkstra from `source` over the carved passages of `board`. Every passage
/// costs 1. Stale heap entries are skipped on pop rather than decreased.
pub fn shortest_paths(board: &Board, source: BoardPos) -> Result<DistanceTable> {
    if board.width() % 2 != 1 || board.height() % 2 != 1 {
        return Err(MazeError::InvalidBoard {
            width: board.width(),
            height: board.height(),
        });
    }
    let (cells_w, cells_h) = board.cell_dims();
    let src = match board_to_cell(source) {
        Some(c) if c.x < cells_w && c.y < cells_h => c,
        _ => return Err(MazeError::InvalidSource(source)),
    };

    let mut table = DistanceTable::unreached(cells_w, cells_h);
    table.dist[src.y][src.x] = Some(0);

    let mut queue = BinaryHeap::with_capacity(cells_w * cells_h);
    queue.push(Reverse((0usize, src.y, src.x)));

    while let Some(Reverse((d, y, x))) = queue.pop() {
        if table.dist[y][x] != Some(d) {
            continue;
        }
        let current = CellId { x, y };
        for dir in Dir::ALL {
            let Some(next) = current.neighbor(dir, cells_w, cells_h) else {
                continue;
            };
            if !is_open(board, wall_between(current, next)) {
                continue;
            }
            let nd = d + 1;
            let slot = &mut table.dist[next.y][next.x];
            if slot.map_or(true, |old| nd < old) {
                *slot = Some(nd);
                queue.push(Reverse((nd, next.y, next.x)));
            }
        }
    }

    trace!(
        "shortest paths from {:?}: reached {}/{} cells",
        source,
        table.reached(),
        cells_w * cells_h
    );
    Ok(table)
}
