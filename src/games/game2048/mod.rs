//! 2048: slide and merge tiles on a 4x4 board.

pub mod render;

pub use render::Game2048;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::games::GameEvent;
use crate::input::Direction;

pub const SIZE: usize = 4;
pub const WIN_TILE: u32 = 2048;

/// Compact one line toward index 0, merging each equal adjacent pair once.
/// Returns the new line and the points scored by its merges.
pub fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], u32) {
    let mut out = [0; SIZE];
    let mut gained = 0;
    let mut write = 0;
    let mut held: Option<u32> = None;

    for value in line.into_iter().filter(|v| *v != 0) {
        match held {
            Some(h) if h == value => {
                out[write] = h * 2;
                gained += h * 2;
                write += 1;
                held = None;
            }
            Some(h) => {
                out[write] = h;
                write += 1;
                held = Some(value);
            }
            None => held = Some(value),
        }
    }
    if let Some(h) = held {
        out[write] = h;
    }
    (out, gained)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[u32; SIZE]; SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self {
        Self { cells: rows }
    }

    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] {
        &self.cells
    }

    /// Cells of line `i` ordered from the edge tiles move toward.
    fn line_coords(dir: Direction, i: usize) -> [(usize, usize); SIZE] {
        std::array::from_fn(|k| match dir {
            Direction::Left => (i, k),
            Direction::Right => (i, SIZE - 1 - k),
            Direction::Up => (k, i),
            Direction::Down => (SIZE - 1 - k, i),
        })
    }

    /// The board after a move, with points gained. `None` when nothing
    /// would change.
    pub fn apply_move(&self, dir: Direction) -> Option<(Board, u32)> {
        let mut next = *self;
        let mut gained = 0;
        for i in 0..SIZE {
            let coords = Self::line_coords(dir, i);
            let line = coords.map(|(r, c)| self.cells[r][c]);
            let (slid, points) = slide_line(line);
            gained += points;
            for (k, (r, c)) in coords.into_iter().enumerate() {
                next.cells[r][c] = slid[k];
            }
        }
        (next != *self).then_some((next, gained))
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..SIZE)
            .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.cells[r][c] == 0)
            .collect()
    }

    /// Place a 2 (90%) or 4 (10%) on a random empty cell.
    pub fn spawn_tile(&mut self, rng: &mut impl Rng) -> Option<(usize, usize)> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let (r, c) = empty[rng.gen_range(0..empty.len())];
        self.cells[r][c] = if rng.gen_bool(0.9) { 2 } else { 4 };
        Some((r, c))
    }

    /// True while any empty cell or equal neighbour pair remains.
    pub fn can_move(&self) -> bool {
        for r in 0..SIZE {
            for c in 0..SIZE {
                let v = self.cells[r][c];
                if v == 0 {
                    return true;
                }
                if c + 1 < SIZE && self.cells[r][c + 1] == v {
                    return true;
                }
                if r + 1 < SIZE && self.cells[r + 1][c] == v {
                    return true;
                }
            }
        }
        false
    }

    pub fn has_tile(&self, value: u32) -> bool {
        self.cells.iter().flatten().any(|v| *v == value)
    }

    #[cfg(test)]
    pub fn sum(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}

pub struct Game2048State {
    pub board: Board,
    pub score: u32,
    /// Set the first time a 2048 tile appears; play continues.
    pub won: bool,
    pub show_win_banner: bool,
    pub over: bool,
    pub moves: u32,
    rng: StdRng,
}

impl Game2048State {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        let mut state = Self {
            board: Board::new(),
            score: 0,
            won: false,
            show_win_banner: false,
            over: false,
            moves: 0,
            rng,
        };
        state.reset();
        state
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.board.spawn_tile(&mut self.rng);
        self.board.spawn_tile(&mut self.rng);
        self.score = 0;
        self.won = false;
        self.show_win_banner = false;
        self.over = false;
        self.moves = 0;
    }

    /// Apply a move. A move that changes nothing spawns nothing.
    pub fn play(&mut self, dir: Direction) -> Vec<GameEvent> {
        if self.over {
            return Vec::new();
        }
        let Some((board, gained)) = self.board.apply_move(dir) else {
            return Vec::new();
        };
        self.board = board;
        self.score += gained;
        self.moves += 1;
        self.board.spawn_tile(&mut self.rng);

        let mut events = vec![GameEvent::TilesMoved { gained }];
        if !self.won && self.board.has_tile(WIN_TILE) {
            self.won = true;
            self.show_win_banner = true;
            log::info!("2048 reached after {} moves", self.moves);
            events.push(GameEvent::Won);
        }
        if !self.board.can_move() {
            self.over = true;
            log::info!("2048 game over: score {}", self.score);
            events.push(GameEvent::GameOver { score: self.score });
        }
        events
    }

    pub fn dismiss_banner(&mut self) {
        self.show_win_banner = false;
    }
}

impl Default for Game2048State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Game2048State {
        Game2048State::with_rng(StdRng::seed_from_u64(5))
    }

    #[test]
    fn merges_pair_then_slides() {
        assert_eq!(slide_line([2, 2, 4, 0]), ([4, 4, 0, 0], 4));
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        assert_eq!(slide_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(slide_line([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
        assert_eq!(slide_line([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
    }

    #[test]
    fn gaps_close_without_merging_unequal() {
        assert_eq!(slide_line([0, 2, 0, 4]), ([2, 4, 0, 0], 0));
        assert_eq!(slide_line([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
    }

    #[test]
    fn right_and_down_traverse_from_far_edge() {
        let board = Board::from_rows([
            [2, 2, 4, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [2, 0, 0, 0],
        ]);
        let (right, gained) = board.apply_move(Direction::Right).unwrap();
        assert_eq!(right.rows()[0], [0, 0, 4, 4]);
        assert_eq!(gained, 4);

        let (down, gained) = board.apply_move(Direction::Down).unwrap();
        assert_eq!(down.rows()[3], [4, 2, 4, 0]);
        assert_eq!(gained, 4);
    }

    #[test]
    fn blocked_move_is_none() {
        let board = Board::from_rows([
            [2, 4, 0, 0],
            [4, 2, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert!(board.apply_move(Direction::Left).is_none());
        assert!(board.apply_move(Direction::Up).is_none());
        assert!(board.apply_move(Direction::Right).is_some());
    }

    #[test]
    fn no_move_spawns_nothing() {
        let mut s = seeded();
        s.board = Board::from_rows([
            [2, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert!(s.play(Direction::Left).is_empty());
        assert_eq!(s.board.empty_cells().len(), 14);
        assert_eq!(s.moves, 0);
    }

    #[test]
    fn full_board_without_pairs_is_stuck() {
        let board = Board::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(!board.can_move());
        let mut with_pair = board;
        with_pair.cells[3][3] = 4;
        assert!(with_pair.can_move());
    }

    #[test]
    fn last_move_ends_the_game() {
        let mut s = seeded();
        // Sliding left opens only the top-right cell, whose neighbours are
        // 8 and 16, so neither a 2 nor a 4 can pair up there.
        s.board = Board::from_rows([
            [0, 2, 4, 8],
            [4, 2, 4, 16],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        let events = s.play(Direction::Left);
        assert_eq!(
            events,
            vec![GameEvent::TilesMoved { gained: 0 }, GameEvent::GameOver { score: 0 }]
        );
        assert!(s.over);
        assert!(s.play(Direction::Right).is_empty());
    }

    #[test]
    fn win_is_flagged_once() {
        let mut s = seeded();
        s.board = Board::from_rows([
            [1024, 1024, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let events = s.play(Direction::Left);
        assert!(events.contains(&GameEvent::Won));
        assert!(s.won && s.show_win_banner);
        assert_eq!(s.score, 2048);
        s.dismiss_banner();
        assert!(!s.show_win_banner);

        let again = s.play(Direction::Right);
        assert!(!again.contains(&GameEvent::Won));
        assert!(s.won);
    }

    #[test]
    fn reset_places_two_tiles() {
        let s = seeded();
        assert_eq!(s.board.empty_cells().len(), SIZE * SIZE - 2);
        assert!(s.board.rows().iter().flatten().all(|v| matches!(v, 0 | 2 | 4)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_board() -> impl Strategy<Value = Board> {
        let tile = prop_oneof![
            3 => Just(0u32),
            1 => (1u32..8).prop_map(|p| 1 << p),
        ];
        prop::array::uniform4(prop::array::uniform4(tile)).prop_map(Board::from_rows)
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    fn tiles(board: &Board) -> usize {
        board.rows().iter().flatten().filter(|v| **v != 0).count()
    }

    proptest! {
        #[test]
        fn prop_move_conserves_sum_and_scores_merges(board in arb_board(), dir in arb_direction()) {
            if let Some((next, gained)) = board.apply_move(dir) {
                prop_assert_eq!(next.sum(), board.sum());
                let merges = tiles(&board) - tiles(&next);
                prop_assert_eq!(gained == 0, merges == 0);
                prop_assert!(gained >= 4 * merges as u32);
                prop_assert!(next.rows().iter().flatten().all(|v| *v == 0 || v.is_power_of_two()));
            }
        }

        #[test]
        fn prop_play_adds_exactly_one_tile_or_nothing(
            board in arb_board(),
            dir in arb_direction(),
            seed in any::<u64>(),
        ) {
            let mut s = Game2048State::with_rng(StdRng::seed_from_u64(seed));
            s.board = board;
            let before_sum = board.sum();
            let before_score = s.score;
            let events = s.play(dir);
            match board.apply_move(dir) {
                None => {
                    prop_assert!(events.is_empty());
                    prop_assert_eq!(s.board, board);
                }
                Some((moved, gained)) => {
                    let spawned = s.board.sum() - before_sum;
                    prop_assert!(spawned == 2 || spawned == 4);
                    prop_assert_eq!(s.score, before_score + gained);
                    prop_assert_eq!(tiles(&s.board), tiles(&moved) + 1);
                }
            }
        }

        #[test]
        fn prop_move_is_idempotent_once_settled(board in arb_board(), dir in arb_direction()) {
            // Sliding the same way twice without a spawn only merges further.
            if let Some((once, _)) = board.apply_move(dir) {
                if let Some((twice, _)) = once.apply_move(dir) {
                    prop_assert!(tiles(&twice) < tiles(&once));
                }
            }
        }
    }
}
