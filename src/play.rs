use crate::grid::{BoardPos, Dir, Tile};
use crate::maze::Maze;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Blocked,
    Moved,
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: BoardPos,
    pub steps: usize,
}

impl Player {
    pub fn spawn(maze: &Maze) -> Self {
        Self {
            pos: maze.start(),
            steps: 0,
        }
    }

    pub fn can_move(&self, maze: &Maze, dir: Dir) -> bool {
        match self.pos.step(dir, maze.width(), maze.height()) {
            Some(next) => !matches!(maze.board().get(next), Some(Tile::Wall) | None),
            None => false,
        }
    }

    pub fn try_step(&mut self, maze: &Maze, dir: Dir) -> Step {
        if !self.can_move(maze, dir) {
            return Step::Blocked;
        }
        if let Some(next) = self.pos.step(dir, maze.width(), maze.height()) {
            self.pos = next;
            self.steps += 1;
        }
        if self.pos == maze.end() {
            Step::Won
        } else {
            Step::Moved
        }
    }
}

/// One million for a perfect run, falling off logistically as the step
/// count exceeds `best`.
pub fn score(steps: usize, best: usize) -> f64 {
    let diff = steps as f64 - best as f64;
    let e = (-diff / 15.0).exp();
    let coef = (1.0 - e) / (1.0 + e);
    1_000_000.0 * (1.0 - coef)
}

pub fn score_endless(steps: usize, best: usize, round: u32) -> f64 {
    let multiplier = 1.0 + f64::from(round).powi(2) / 32.0;
    multiplier * score(steps, best)
}
