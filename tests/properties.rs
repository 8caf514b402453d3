use labyrinth::{
    board_to_cell, generate, generate_with, shortest_paths, Board, BoardPos, CellId, Maze, Tile,
    Strategy as Endpoints,
};
use proptest::prelude::*;

fn carved_connectors(board: &Board) -> usize {
    let mut n = 0;
    for (y, row) in board.rows().enumerate() {
        for (x, &tile) in row.iter().enumerate() {
            let interior = x > 0 && y > 0 && x + 1 < board.width() && y + 1 < board.height();
            if interior && (x + y) % 2 == 1 && tile == Tile::Empty {
                n += 1;
            }
        }
    }
    n
}

fn dims() -> impl Strategy<Value = (usize, usize)> {
    (1usize..14, 1usize..14).prop_filter("need two cells", |(w, h)| w * h >= 2)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn board_shape_and_endpoints((w, h) in dims(), seed in any::<u64>()) {
        let maze = generate(w, h, seed).unwrap();
        prop_assert_eq!(maze.width(), 2 * w + 1);
        prop_assert_eq!(maze.height(), 2 * h + 1);
        prop_assert_eq!(maze.board().count(Tile::Start), 1);
        prop_assert_eq!(maze.board().count(Tile::End), 1);
        prop_assert!(board_to_cell(maze.start()).is_some());
        prop_assert!(board_to_cell(maze.end()).is_some());
        prop_assert_ne!(maze.start(), maze.end());
    }

    #[test]
    fn passages_form_a_spanning_tree((w, h) in dims(), seed in any::<u64>()) {
        let maze = generate(w, h, seed).unwrap();
        prop_assert_eq!(carved_connectors(maze.board()), w * h - 1);

        let table = shortest_paths(maze.board(), maze.start()).unwrap();
        prop_assert_eq!(table.reached(), w * h);
        let end = board_to_cell(maze.end()).unwrap();
        prop_assert_eq!(table.get(end), maze.path_len());
    }

    #[test]
    fn endpoints_span_the_diameter((w, h) in dims(), seed in any::<u64>()) {
        let maze = generate(w, h, seed).unwrap();
        let best = maze.path_len().unwrap();
        for y in 0..h {
            for x in 0..w {
                let table = shortest_paths(maze.board(), BoardPos::new(2 * x + 1, 2 * y + 1)).unwrap();
                let (_, far) = table.farthest().unwrap();
                prop_assert!(far <= best);
            }
        }
    }

    #[test]
    fn generation_is_deterministic((w, h) in dims(), seed in any::<u64>()) {
        let a = generate_with(w, h, seed, Endpoints::DeadEnds).unwrap();
        let b = generate_with(w, h, seed, Endpoints::DeadEnds).unwrap();
        prop_assert_eq!(a.maze.board(), b.maze.board());
        prop_assert_eq!(a.dead_ends, b.dead_ends);
    }

    #[test]
    fn text_round_trip((w, h) in dims(), seed in any::<u64>()) {
        let maze = generate(w, h, seed).unwrap();
        let parsed = Maze::parse(&maze.to_string()).unwrap();
        prop_assert_eq!(parsed.board(), maze.board());

        let overlaid = maze.render_with(Some(maze.start()));
        let restored = overlaid.replacen('@', ">", 1);
        let reparsed = Maze::parse(&restored).unwrap();
        prop_assert_eq!(reparsed.board(), maze.board());
    }
}

#[test]
fn strategies_choose_equally_long_paths() {
    for seed in 0..25 {
        let sweep = generate_with(12, 9, seed, Endpoints::DoubleSweep).unwrap();
        let dead = generate_with(12, 9, seed, Endpoints::DeadEnds).unwrap();
        assert_eq!(sweep.maze.board().rows().count(), 19);
        assert_eq!(sweep.maze.path_len(), dead.maze.path_len());
    }
}

#[test]
fn corridor_distance_is_cell_count_minus_one() {
    let maze = Maze::parse("#####\n#>..#\n###.#\n###<#\n#####\n").unwrap();
    let table = shortest_paths(maze.board(), maze.start()).unwrap();
    assert_eq!(table.get(CellId::new(1, 1)), Some(2));
    assert_eq!(maze.measure_path_len().unwrap(), Some(2));
}

#[test]
fn bundled_level_loads_and_measures() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/mazes/maze_1.txt");
    let maze = Maze::load(path).unwrap();
    assert_eq!((maze.width(), maze.height()), (11, 7));
    assert_eq!(maze.path_len(), None);
    assert_eq!(maze.measure_path_len().unwrap(), Some(14));
}
