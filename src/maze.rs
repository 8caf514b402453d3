use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{MazeError, Result};
use crate::grid::{Board, BoardPos, Tile};
use crate::pathfind::shortest_paths;

pub const PLAYER_GLYPH: char = '@';

/// A finished maze. Read-only once built; overlays are drawn at render time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    board: Board,
    start: BoardPos,
    end: BoardPos,
    path_len: Option<usize>,
}

impl Maze {
    pub(crate) fn new(board: Board, start: BoardPos, end: BoardPos, path_len: Option<usize>) -> Self {
        Self {
            board,
            start,
            end,
            path_len,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start(&self) -> BoardPos {
        self.start
    }

    pub fn end(&self) -> BoardPos {
        self.end
    }

    /// Edges on the shortest Start -> End path; `None` if never computed.
    pub fn path_len(&self) -> Option<usize> {
        self.path_len
    }

    pub fn width(&self) -> usize {
        self.board.width()
    }

    pub fn height(&self) -> usize {
        self.board.height()
    }

    /// Runs the shortest-path engine from Start and reads the distance at End.
    /// `Ok(None)` when End is unreachable or not a cell center.
    pub fn measure_path_len(&self) -> Result<Option<usize>> {
        let table = shortest_paths(&self.board, self.start)?;
        Ok(crate::grid::board_to_cell(self.end).and_then(|c| table.get(c)))
    }

    /// Parses the text format: `.` empty, `#` wall, `>` start, `<` end,
    /// a space reads as empty. Blank lines are skipped.
    pub fn parse(s: &str) -> Result<Maze> {
        let mut grid: Vec<Vec<Tile>> = Vec::new();
        let mut width: Option<usize> = None;
        let mut start = None;
        let mut end = None;

        for (i, line) in s.lines().enumerate() {
            let glyphs: Vec<char> = line.chars().collect();
            if glyphs.is_empty() {
                continue;
            }
            match width {
                None => width = Some(glyphs.len()),
                Some(w) if w != glyphs.len() => {
                    return Err(MazeError::InconsistentRowWidth {
                        expected: w,
                        found: glyphs.len(),
                        line: i + 1,
                    })
                }
                Some(_) => {}
            }

            let y = grid.len();
            let mut row = Vec::with_capacity(glyphs.len());
            for (x, &c) in glyphs.iter().enumerate() {
                let tile = Tile::from_glyph(c).ok_or(MazeError::InvalidTile {
                    tile: c,
                    line: i + 1,
                    column: x + 1,
                })?;
                match tile {
                    Tile::Start if start.is_some() => return Err(MazeError::MultipleStartPoints),
                    Tile::End if end.is_some() => return Err(MazeError::MultipleEndPoints),
                    Tile::Start => start = Some(BoardPos::new(x, y)),
                    Tile::End => end = Some(BoardPos::new(x, y)),
                    _ => {}
                }
                row.push(tile);
            }
            grid.push(row);
        }

        let start = start.ok_or(MazeError::MissingStartPoint)?;
        let end = end.ok_or(MazeError::MissingEndPoint)?;
        let board = Board::from_rows(width.unwrap_or(0), grid);
        Ok(Maze::new(board, start, end, None))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Maze> {
        let content = std::fs::read_to_string(path)?;
        Maze::parse(&content)
    }

    /// Text rendering with `@` drawn over `player`. The board is untouched.
    pub fn render_with(&self, player: Option<BoardPos>) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for (y, row) in self.board.rows().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if player == Some(BoardPos::new(x, y)) {
                    out.push(PLAYER_GLYPH);
                } else {
                    out.push(tile.glyph());
                }
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(None))
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self> {
        Maze::parse(s)
    }
}
