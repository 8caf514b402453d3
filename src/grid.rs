//! Board representation and the two coordinate spaces laid over it.
//!
//! A maze of `w x h` cells lives on a `(2w+1) x (2h+1)` board. Cell `(x, y)`
//! sits at board position `(2x+1, 2y+1)`; the board positions between two
//! adjacent cells hold the wall (or carved passage) that separates them.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Wall,
    Start,
    End,
}

impl Tile {
    pub fn glyph(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::Start => '>',
            Tile::End => '<',
        }
    }

    /// Parses a text-format glyph. A literal space is read as `Empty`.
    pub fn from_glyph(c: char) -> Option<Tile> {
        match c {
            '.' | ' ' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            '>' => Some(Tile::Start),
            '<' => Some(Tile::End),
            _ => None,
        }
    }
}

/// Position on the board grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardPos {
    pub x: usize,
    pub y: usize,
}

/// Position on the coarse cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// +Y, -Y, +X, -X. The generator indexes into candidates built in this order.
    pub const CARVE_ORDER: [Dir; 4] = [Dir::Down, Dir::Up, Dir::Right, Dir::Left];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

fn offset(x: usize, y: usize, dir: Dir, width: usize, height: usize) -> Option<(usize, usize)> {
    let (dx, dy) = dir.delta();
    let nx = x.checked_add_signed(dx)?;
    let ny = y.checked_add_signed(dy)?;
    if nx >= width || ny >= height {
        return None;
    }
    Some((nx, ny))
}

impl BoardPos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbouring board position, or `None` when it falls off a
    /// `width x height` board.
    pub fn step(self, dir: Dir, width: usize, height: usize) -> Option<BoardPos> {
        offset(self.x, self.y, dir, width, height).map(|(x, y)| BoardPos { x, y })
    }
}

impl CellId {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn neighbor(self, dir: Dir, cells_w: usize, cells_h: usize) -> Option<CellId> {
        offset(self.x, self.y, dir, cells_w, cells_h).map(|(x, y)| CellId { x, y })
    }
}

pub fn cell_to_board(c: CellId) -> BoardPos {
    BoardPos {
        x: 2 * c.x + 1,
        y: 2 * c.y + 1,
    }
}

/// Inverse of [`cell_to_board`]; `None` unless `p` is a cell center.
pub fn board_to_cell(p: BoardPos) -> Option<CellId> {
    if p.x % 2 == 1 && p.y % 2 == 1 {
        Some(CellId {
            x: (p.x - 1) / 2,
            y: (p.y - 1) / 2,
        })
    } else {
        None
    }
}

/// Board position strictly between two axis-aligned adjacent cells.
pub fn wall_between(a: CellId, b: CellId) -> BoardPos {
    let pa = cell_to_board(a);
    let pb = cell_to_board(b);
    BoardPos {
        x: (pa.x + pb.x) / 2,
        y: (pa.y + pb.y) / 2,
    }
}

pub fn is_open(board: &Board, pos: BoardPos) -> bool {
    board.get(pos) == Some(Tile::Empty)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    grid: Vec<Vec<Tile>>,
}

impl Board {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            grid: vec![vec![tile; width]; height],
        }
    }

    /// Builds a board from rows that the caller has already checked are
    /// all `width` long.
    pub(crate) fn from_rows(width: usize, grid: Vec<Vec<Tile>>) -> Self {
        Self {
            width,
            height: grid.len(),
            grid,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell-grid dimensions `(w, h)` of a generated-shape board.
    pub fn cell_dims(&self) -> (usize, usize) {
        (self.width.saturating_sub(1) / 2, self.height.saturating_sub(1) / 2)
    }

    pub fn get(&self, pos: BoardPos) -> Option<Tile> {
        self.grid.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    pub(crate) fn set(&mut self, pos: BoardPos, tile: Tile) {
        self.grid[pos.y][pos.x] = tile;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.grid.iter().map(|row| row.as_slice())
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }
}
