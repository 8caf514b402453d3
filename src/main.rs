use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use labyrinth::maze::PLAYER_GLYPH;
use labyrinth::{generate_with, score, score_endless, Dir, Maze, Player, Step, Strategy, Tile};
use log::{info, warn};
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const ENDLESS_BASE_WIDTH: usize = 5;

/// The Labyrinth: find the way from > to < in as few steps as you can.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(short = 'W', long, env = "LABYRINTH_WIDTH", default_value_t = 10)]
    width: usize,

    /// Maze height in cells
    #[arg(short = 'H', long, env = "LABYRINTH_HEIGHT", default_value_t = 8)]
    height: usize,

    /// Random seed; drawn from entropy when absent
    #[arg(long, env = "LABYRINTH_SEED")]
    seed: Option<u64>,

    /// Endpoint selection: double-sweep or dead-ends
    #[arg(long, env = "LABYRINTH_STRATEGY", default_value_t = Strategy::DoubleSweep)]
    strategy: Strategy,

    /// Play a maze file instead of generating one
    #[arg(long, conflicts_with = "endless")]
    load: Option<PathBuf>,

    /// Keep generating larger mazes until you quit
    #[arg(long)]
    endless: bool,

    /// Print the maze in text form and exit
    #[arg(long)]
    print: bool,
}

enum Input {
    Move(Dir),
    Confirm,
    Retry,
    Quit,
}

struct Game {
    maze: Maze,
    name: String,
    best: Option<usize>,
    player: Player,
    blocked: bool,
}

impl Game {
    fn new(maze: Maze, name: String) -> Self {
        let best = match maze.path_len() {
            Some(len) => Some(len),
            None => match maze.measure_path_len() {
                Ok(len) => len,
                Err(err) => {
                    warn!("cannot measure shortest path for {}: {}", name, err);
                    None
                }
            },
        };
        let player = Player::spawn(&maze);
        Self {
            maze,
            name,
            best,
            player,
            blocked: false,
        }
    }

    fn restart(&mut self) {
        self.player = Player::spawn(&self.maze);
        self.blocked = false;
    }

    fn width(&self) -> usize {
        self.maze.width()
    }

    fn height(&self) -> usize {
        self.maze.height()
    }

    fn hud(&self) -> String {
        let best = self.best.map_or_else(|| "?".to_string(), |b| b.to_string());
        let status = if self.blocked { "Can't move there" } else { "q to quit" };
        format!(
            "{}  Steps: {}  Best: {}  ({})",
            self.name, self.player.steps, best, status
        )
    }
}

/// Redraws only the board glyphs that changed since the last frame. Frames
/// come from the maze's own overlay rendering, so the board is never touched.
struct Renderer {
    frame: Vec<char>,
    hud: String,
    needs_full: bool,
    origin: Option<(u16, u16)>,
}

impl Renderer {
    fn new() -> Self {
        Self {
            frame: Vec::new(),
            hud: String::new(),
            needs_full: true,
            origin: None,
        }
    }

    /// Centers the board in the terminal; `None` when it does not fit.
    fn place(&mut self, game: &Game) -> io::Result<Option<(u16, u16)>> {
        let cols = (game.width() * CELL_W) as u16;
        let rows = (game.height() + 2) as u16;
        let (term_w, term_h) = terminal::size()?;
        let origin = (term_w >= cols && term_h >= rows)
            .then(|| ((term_w - cols) / 2, (term_h - rows) / 2 + 1));
        if origin != self.origin {
            self.origin = origin;
            self.needs_full = true;
        }
        Ok(origin)
    }

    fn draw(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let Some((ox, oy)) = self.place(game)? else {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Print(format!(
                "Terminal too small for a {}x{} board. Resize, or press q.",
                game.width(),
                game.height()
            )))?;
            self.needs_full = true;
            return stdout.flush();
        };
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
            self.frame.clear();
            self.hud.clear();
        }

        let hud = game.hud();
        if hud != self.hud {
            stdout.queue(MoveTo(ox, oy - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.hud = hud;
        }

        let frame: Vec<char> = game
            .maze
            .render_with(Some(game.player.pos))
            .chars()
            .filter(|&c| c != '\n')
            .collect();
        for (idx, &c) in frame.iter().enumerate() {
            if self.frame.get(idx) == Some(&c) {
                continue;
            }
            let col = ox + ((idx % game.width()) * CELL_W) as u16;
            let row = oy + (idx / game.width()) as u16;
            draw_glyph(stdout, col, row, c)?;
        }
        self.frame = frame;
        self.needs_full = false;
        stdout.flush()
    }

    /// Screen position of the line just below the board.
    fn footer(&self, game: &Game) -> (u16, u16) {
        match self.origin {
            Some((ox, oy)) => (ox, oy + game.height() as u16),
            None => (0, 1),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| {
        let seed = rand::random();
        info!("no seed given, using {}", seed);
        seed
    });

    if args.print {
        let (maze, _) = first_maze(&args, seed)?;
        print!("{maze}");
        return Ok(());
    }

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &args, seed);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    if let Some(summary) = result? {
        println!("{summary}");
    }
    Ok(())
}

fn first_maze(args: &Args, seed: u64) -> Result<(Maze, String)> {
    if let Some(path) = &args.load {
        let maze = Maze::load(path).with_context(|| format!("loading {}", path.display()))?;
        info!("loaded {}x{} maze from {}", maze.width(), maze.height(), path.display());
        return Ok((maze, path.display().to_string()));
    }
    if args.endless {
        return endless_maze(seed, 1, args.strategy);
    }
    let maze = generate_with(args.width, args.height, seed, args.strategy)
        .with_context(|| format!("generating {}x{} maze", args.width, args.height))?
        .maze;
    info!("generated {}x{} maze with seed {}", args.width, args.height, seed);
    Ok((maze, format!("seed {seed}")))
}

fn endless_maze(seed: u64, round: u32, strategy: Strategy) -> Result<(Maze, String)> {
    let width = ENDLESS_BASE_WIDTH + round as usize;
    let height = width * 4 / 5;
    let round_seed = seed.wrapping_add(u64::from(round));
    let maze = generate_with(width, height, round_seed, strategy)
        .with_context(|| format!("generating endless round {round}"))?
        .maze;
    info!("endless round {} ({}x{}, seed {})", round, width, height, round_seed);
    Ok((maze, format!("Endless {round}")))
}

fn run(stdout: &mut Stdout, args: &Args, seed: u64) -> Result<Option<String>> {
    let (maze, name) = first_maze(args, seed)?;
    let mut game = Game::new(maze, name);
    let mut renderer = Renderer::new();
    let mut round = 1u32;
    let mut total = 0.0;

    loop {
        renderer.draw(stdout, &game)?;
        let dir = match read_input()? {
            Input::Quit => break,
            Input::Move(dir) => dir,
            Input::Confirm | Input::Retry => continue,
        };

        game.blocked = false;
        match game.player.try_step(&game.maze, dir) {
            Step::Blocked => game.blocked = true,
            Step::Moved => {}
            Step::Won => {
                renderer.draw(stdout, &game)?;
                let best = game.best.unwrap_or(game.player.steps);
                let points = if args.endless {
                    score_endless(game.player.steps, best, round)
                } else {
                    score(game.player.steps, best)
                };
                total += points;
                info!(
                    "cleared {} in {} steps (best {}), score {}",
                    game.name, game.player.steps, best, points as u64
                );

                if !stage_clear(stdout, &renderer, &game, points as u64, args.endless)? {
                    break;
                }
                if args.endless {
                    round += 1;
                    let (maze, name) = endless_maze(seed, round, args.strategy)?;
                    game = Game::new(maze, name);
                    renderer.needs_full = true;
                } else {
                    game.restart();
                    renderer.needs_full = true;
                }
            }
        }
    }

    if total > 0.0 {
        Ok(Some(format!("Final score: {}", total as u64)))
    } else {
        Ok(None)
    }
}

fn read_input() -> io::Result<Input> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
                continue;
            }
            let input = match key.code {
                KeyCode::Up | KeyCode::Char('k') => Input::Move(Dir::Up),
                KeyCode::Down | KeyCode::Char('j') => Input::Move(Dir::Down),
                KeyCode::Left | KeyCode::Char('h') => Input::Move(Dir::Left),
                KeyCode::Right | KeyCode::Char('l') => Input::Move(Dir::Right),
                KeyCode::Enter | KeyCode::Char(' ') => Input::Confirm,
                KeyCode::Char('r') => Input::Retry,
                KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
                _ => continue,
            };
            return Ok(input);
        }
    }
}

fn draw_glyph(stdout: &mut Stdout, col: u16, row: u16, c: char) -> io::Result<()> {
    let (text, color) = if c == PLAYER_GLYPH {
        ("@", Color::Yellow)
    } else {
        match Tile::from_glyph(c) {
            Some(Tile::Wall) => ("██", Color::Blue),
            Some(Tile::Start) => (">", Color::Green),
            Some(Tile::End) => ("<", Color::Red),
            Some(Tile::Empty) | None => ("", Color::Reset),
        }
    };
    stdout.queue(MoveTo(col, row))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let pad = CELL_W.saturating_sub(UnicodeWidthStr::width(text));
    stdout.queue(Print(" ".repeat(pad)))?;
    stdout.queue(ResetColor)?;
    Ok(())
}

/// Shows the stage-clear line under the board. Returns `false` to quit.
fn stage_clear(
    stdout: &mut Stdout,
    renderer: &Renderer,
    game: &Game,
    points: u64,
    endless: bool,
) -> io::Result<bool> {
    let (col, row) = renderer.footer(game);
    let next = if endless { "Enter: next round" } else { "r: retry" };
    stdout.queue(MoveTo(col, row))?;
    stdout.queue(Print(format!(
        "STAGE CLEAR: {} - Your score was: {} ({}, q: quit)",
        game.name, points, next
    )))?;
    stdout.flush()?;
    loop {
        match read_input()? {
            Input::Quit => return Ok(false),
            Input::Confirm if endless => return Ok(true),
            Input::Retry if !endless => return Ok(true),
            _ => {}
        }
    }
}
