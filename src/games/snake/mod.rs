//! Snake: grid movement, food, and self-collision.
//!
//! Pure game logic. The body is stored head first; a tick moves the head one
//! cell along the heading and either grows (food eaten) or drops the tail.

pub mod render;
pub mod skin;

pub use render::SnakeGame;

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::clock::SpeedModifier;
use crate::games::{GameEvent, GameMode};
use crate::input::Direction;

pub const GRID_WIDTH: i32 = 20;
pub const GRID_HEIGHT: i32 = 20;
/// Logical pixels per grid cell (400x400 canvas).
pub const CELL_SIZE: i32 = 20;
/// Milliseconds between ticks at normal speed.
pub const BASE_INTERVAL_MS: u64 = 150;

const FOOD_POINTS: u32 = 10;
/// Ticks a special food stays on the board before it is replaced.
const SPECIAL_FOOD_TICKS: u32 = 60;
const SCISSORS_CUT: usize = 3;

const BLUE_POTION: (f32, u32) = (0.6, 150);
const RED_POTION: (f32, u32) = (1.5, 100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn in_bounds(&self) -> bool {
        (0..GRID_WIDTH).contains(&self.x) && (0..GRID_HEIGHT).contains(&self.y)
    }

    fn wrapped(&self) -> Self {
        Self {
            x: self.x.rem_euclid(GRID_WIDTH),
            y: self.y.rem_euclid(GRID_HEIGHT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnakeMode {
    #[default]
    Classic,
    PowerUp,
    /// Walls wrap around instead of killing.
    Zen,
}

impl SnakeMode {
    pub fn game_mode(&self) -> GameMode {
        match self {
            SnakeMode::Classic => GameMode::SnakeClassic,
            SnakeMode::PowerUp => GameMode::SnakePowerUp,
            SnakeMode::Zen => GameMode::SnakeZen,
        }
    }

    pub fn next(self) -> Self {
        match self {
            SnakeMode::Classic => SnakeMode::PowerUp,
            SnakeMode::PowerUp => SnakeMode::Zen,
            SnakeMode::Zen => SnakeMode::Classic,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SnakeMode::Classic => "Classic",
            SnakeMode::PowerUp => "Power-Up",
            SnakeMode::Zen => "Zen",
        }
    }

    pub fn wraps(&self) -> bool {
        matches!(self, SnakeMode::Zen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Normal,
    Golden,
    BluePotion,
    RedPotion,
    Scissors,
}

impl FoodKind {
    /// Cumulative thresholds: golden 5%, blue 10%, red 10%, scissors 10%.
    fn roll(rng: &mut impl Rng) -> Self {
        let r: f64 = rng.gen();
        if r < 0.05 {
            FoodKind::Golden
        } else if r < 0.15 {
            FoodKind::BluePotion
        } else if r < 0.25 {
            FoodKind::RedPotion
        } else if r < 0.35 {
            FoodKind::Scissors
        } else {
            FoodKind::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FoodKind::Normal => "Food",
            FoodKind::Golden => "Golden",
            FoodKind::BluePotion => "Slow potion",
            FoodKind::RedPotion => "Fast potion",
            FoodKind::Scissors => "Scissors",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub cell: Cell,
    pub kind: FoodKind,
    /// Remaining ticks for special food; normal food never expires.
    pub expires_in: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

pub struct SnakeState {
    pub body: VecDeque<Cell>,
    pub heading: Option<Direction>,
    pending: Option<Direction>,
    pub food: Food,
    pub score: u32,
    pub phase: Phase,
    pub mode: SnakeMode,
    pub speed: SpeedModifier,
    pub ticks: u64,
    rng: StdRng,
}

impl SnakeState {
    pub fn new(mode: SnakeMode) -> Self {
        Self::with_rng(mode, StdRng::from_entropy())
    }

    pub fn with_rng(mode: SnakeMode, rng: StdRng) -> Self {
        let mut state = Self {
            body: VecDeque::new(),
            heading: None,
            pending: None,
            food: Food {
                cell: Cell::new(0, 0),
                kind: FoodKind::Normal,
                expires_in: None,
            },
            score: 0,
            phase: Phase::NotStarted,
            mode,
            speed: SpeedModifier::none(),
            ticks: 0,
            rng,
        };
        state.reset();
        state
    }

    /// Head at the centre facing up, body trailing below it.
    pub fn reset(&mut self) {
        self.body = VecDeque::from(vec![Cell::new(10, 10), Cell::new(10, 11), Cell::new(10, 12)]);
        self.heading = None;
        self.pending = None;
        self.score = 0;
        self.phase = Phase::NotStarted;
        self.speed = SpeedModifier::none();
        self.ticks = 0;
        self.regenerate_food();
    }

    /// Switch mode between rounds. Ignored while a round is in progress.
    pub fn set_mode(&mut self, mode: SnakeMode) -> bool {
        if matches!(self.phase, Phase::Running | Phase::Paused) {
            return false;
        }
        self.mode = mode;
        self.reset();
        true
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Buffer a turn for the next tick. The first accepted direction starts
    /// the round; turning straight back into the body is ignored.
    pub fn queue_direction(&mut self, dir: Direction) -> Vec<GameEvent> {
        match self.phase {
            Phase::NotStarted => {
                // The body lies below the head at reset.
                if dir == Direction::Down {
                    return Vec::new();
                }
                self.heading = Some(dir);
                self.pending = Some(dir);
                self.phase = Phase::Running;
                log::debug!("snake started heading {:?}", dir);
                vec![GameEvent::Started]
            }
            Phase::Running => {
                if self.heading.map(|h| h.opposite()) != Some(dir) {
                    self.pending = Some(dir);
                }
                Vec::new()
            }
            Phase::Paused | Phase::GameOver => Vec::new(),
        }
    }

    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        match self.phase {
            Phase::Running => {
                self.phase = Phase::Paused;
                vec![GameEvent::Paused]
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                vec![GameEvent::Resumed]
            }
            _ => Vec::new(),
        }
    }

    /// One logic tick.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }
        self.ticks += 1;

        // The tick that ends a potion only restores the speed.
        if self.speed.tick() {
            return vec![GameEvent::SpeedReset];
        }

        if let Some(left) = self.food.expires_in {
            if left <= 1 {
                self.regenerate_food();
                events.push(GameEvent::FoodExpired);
            } else {
                self.food.expires_in = Some(left - 1);
            }
        }

        let Some(dir) = self.pending.or(self.heading) else {
            return events;
        };
        self.heading = Some(dir);

        let (dx, dy) = dir.delta();
        let head = self.head();
        let mut next = Cell::new(head.x + dx, head.y + dy);
        if self.mode.wraps() {
            next = next.wrapped();
        } else if !next.in_bounds() {
            self.finish(&mut events);
            return events;
        }

        let eating = next == self.food.cell;
        // The tail moves out of the way this tick unless the snake grows.
        let solid = if eating { self.body.len() } else { self.body.len() - 1 };
        if self.body.iter().take(solid).any(|c| *c == next) {
            self.finish(&mut events);
            return events;
        }

        self.body.push_front(next);
        if eating {
            self.eat(&mut events);
            if self.phase == Phase::Running && !self.regenerate_food() {
                // No free cell left: the board is full.
                self.finish(&mut events);
            }
        } else {
            self.body.pop_back();
        }
        events
    }

    fn eat(&mut self, events: &mut Vec<GameEvent>) {
        let kind = self.food.kind;
        self.score += FOOD_POINTS;
        events.push(GameEvent::FoodEaten { kind });
        match kind {
            FoodKind::Normal | FoodKind::Golden => {}
            FoodKind::BluePotion => {
                self.speed = SpeedModifier::new(BLUE_POTION.0, BLUE_POTION.1);
                events.push(GameEvent::SpeedChanged { factor: BLUE_POTION.0 });
            }
            FoodKind::RedPotion => {
                self.speed = SpeedModifier::new(RED_POTION.0, RED_POTION.1);
                events.push(GameEvent::SpeedChanged { factor: RED_POTION.0 });
            }
            FoodKind::Scissors => {
                let cut = SCISSORS_CUT.min(self.body.len() - 1);
                for _ in 0..cut {
                    self.body.pop_back();
                }
            }
        }
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = Phase::GameOver;
        log::info!("snake game over: score {}", self.score);
        events.push(GameEvent::GameOver { score: self.score });
    }

    /// Place new food on a free cell. Returns false when the snake fills the
    /// whole board.
    fn regenerate_food(&mut self) -> bool {
        let Some(cell) = spawn_food(&self.body, &mut self.rng) else {
            return false;
        };
        let kind = if self.mode == SnakeMode::PowerUp {
            FoodKind::roll(&mut self.rng)
        } else {
            FoodKind::Normal
        };
        let expires_in = (kind != FoodKind::Normal).then_some(SPECIAL_FOOD_TICKS);
        self.food = Food {
            cell,
            kind,
            expires_in,
        };
        true
    }
}

/// Pick a random cell not covered by `body`, retrying until one is found.
pub fn spawn_food<'a>(
    body: impl IntoIterator<Item = &'a Cell> + Copy,
    rng: &mut impl Rng,
) -> Option<Cell> {
    let occupied = body.into_iter().count();
    if occupied >= (GRID_WIDTH * GRID_HEIGHT) as usize {
        return None;
    }
    loop {
        let candidate = Cell::new(rng.gen_range(0..GRID_WIDTH), rng.gen_range(0..GRID_HEIGHT));
        if !body.into_iter().any(|c| *c == candidate) {
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(mode: SnakeMode) -> SnakeState {
        SnakeState::with_rng(mode, StdRng::seed_from_u64(7))
    }

    fn park_food(state: &mut SnakeState, cell: Cell, kind: FoodKind) {
        state.food = Food {
            cell,
            kind,
            expires_in: None,
        };
    }

    fn far_food(state: &mut SnakeState) {
        park_food(state, Cell::new(0, 19), FoodKind::Normal);
    }

    #[test]
    fn down_cannot_start_the_round() {
        let mut s = seeded(SnakeMode::Classic);
        assert!(s.queue_direction(Direction::Down).is_empty());
        assert_eq!(s.phase, Phase::NotStarted);
        assert_eq!(s.queue_direction(Direction::Left), vec![GameEvent::Started]);
        assert_eq!(s.phase, Phase::Running);
    }

    #[test]
    fn moves_one_cell_per_tick() {
        let mut s = seeded(SnakeMode::Classic);
        far_food(&mut s);
        s.queue_direction(Direction::Up);
        s.step();
        assert_eq!(s.head(), Cell::new(10, 9));
        assert_eq!(s.body.len(), 3);
        assert_eq!(s.body.back(), Some(&Cell::new(10, 11)));
    }

    #[test]
    fn reversal_is_rejected() {
        let mut s = seeded(SnakeMode::Classic);
        far_food(&mut s);
        s.queue_direction(Direction::Up);
        s.queue_direction(Direction::Down);
        s.step();
        assert_eq!(s.heading, Some(Direction::Up));
        assert_eq!(s.phase, Phase::Running);
    }

    #[test]
    fn reversal_checks_current_heading_not_buffer() {
        let mut s = seeded(SnakeMode::Classic);
        far_food(&mut s);
        s.queue_direction(Direction::Up);
        s.step();
        // Left is buffered, then Down is still opposite the live heading.
        s.queue_direction(Direction::Left);
        s.queue_direction(Direction::Down);
        s.step();
        assert_eq!(s.heading, Some(Direction::Left));
        assert_eq!(s.phase, Phase::Running);
    }

    #[test]
    fn wall_ends_classic_round() {
        let mut s = seeded(SnakeMode::Classic);
        far_food(&mut s);
        s.queue_direction(Direction::Up);
        let mut events = Vec::new();
        for _ in 0..11 {
            events.extend(s.step());
        }
        assert_eq!(s.phase, Phase::GameOver);
        assert_eq!(events.last(), Some(&GameEvent::GameOver { score: 0 }));
        // No further movement after game over.
        let head = s.head();
        assert!(s.step().is_empty());
        assert_eq!(s.head(), head);
    }

    #[test]
    fn zen_wraps_around() {
        let mut s = seeded(SnakeMode::Zen);
        far_food(&mut s);
        s.queue_direction(Direction::Up);
        for _ in 0..11 {
            s.step();
        }
        assert_eq!(s.phase, Phase::Running);
        assert_eq!(s.head(), Cell::new(10, GRID_HEIGHT - 1));
    }

    #[test]
    fn eating_grows_and_scores() {
        let mut s = seeded(SnakeMode::Classic);
        park_food(&mut s, Cell::new(10, 9), FoodKind::Normal);
        s.queue_direction(Direction::Up);
        let events = s.step();
        assert!(events.contains(&GameEvent::FoodEaten { kind: FoodKind::Normal }));
        assert_eq!(s.body.len(), 4);
        assert_eq!(s.score, 10);
        assert!(!s.body.contains(&s.food.cell));
    }

    #[test]
    fn crossing_the_body_ends_the_round() {
        let mut s = seeded(SnakeMode::Classic);
        // A hook shape: head at (5,5) heading left, body curls below and right.
        s.body = VecDeque::from(vec![
            Cell::new(5, 5),
            Cell::new(6, 5),
            Cell::new(6, 6),
            Cell::new(5, 6),
            Cell::new(4, 6),
            Cell::new(4, 7),
        ]);
        s.phase = Phase::Running;
        s.heading = Some(Direction::Left);
        s.pending = Some(Direction::Left);
        far_food(&mut s);
        s.queue_direction(Direction::Down);
        let events = s.step();
        assert_eq!(events, vec![GameEvent::GameOver { score: 0 }]);
    }

    #[test]
    fn chasing_the_tail_is_allowed() {
        let mut s = seeded(SnakeMode::Classic);
        // 2x2 loop: the head moves into the cell the tail is leaving.
        s.body = VecDeque::from(vec![
            Cell::new(5, 5),
            Cell::new(5, 6),
            Cell::new(6, 6),
            Cell::new(6, 5),
        ]);
        s.phase = Phase::Running;
        s.heading = Some(Direction::Up);
        s.pending = Some(Direction::Right);
        far_food(&mut s);
        s.step();
        assert_eq!(s.phase, Phase::Running);
        assert_eq!(s.head(), Cell::new(6, 5));
    }

    #[test]
    fn potions_change_speed_then_revert() {
        let mut s = seeded(SnakeMode::PowerUp);
        park_food(&mut s, Cell::new(10, 9), FoodKind::BluePotion);
        s.queue_direction(Direction::Up);
        let events = s.step();
        assert!(events.contains(&GameEvent::SpeedChanged { factor: 0.6 }));
        assert_eq!(s.speed.factor(), 0.6);

        // Keep the snake alive by wrapping around in a small square.
        s.mode = SnakeMode::Zen;
        far_food(&mut s);
        let mut reset_seen = false;
        for _ in 0..BLUE_POTION.1 {
            s.food.expires_in = None;
            if s.step().contains(&GameEvent::SpeedReset) {
                reset_seen = true;
            }
        }
        assert!(reset_seen);
        assert_eq!(s.speed.factor(), 1.0);
    }

    #[test]
    fn potion_expiry_tick_does_not_move() {
        let mut s = seeded(SnakeMode::PowerUp);
        far_food(&mut s);
        s.queue_direction(Direction::Up);
        s.speed = SpeedModifier::new(1.5, 1);
        let body = s.body.clone();
        assert_eq!(s.step(), vec![GameEvent::SpeedReset]);
        assert_eq!(s.body, body);
        assert_eq!(s.speed.factor(), 1.0);
        s.step();
        assert_eq!(s.head(), Cell::new(10, 9));
    }

    #[test]
    fn scissors_trim_the_tail() {
        let mut s = seeded(SnakeMode::PowerUp);
        s.body = (0..8).map(|i| Cell::new(10, 10 + i)).collect();
        park_food(&mut s, Cell::new(10, 9), FoodKind::Scissors);
        s.queue_direction(Direction::Up);
        s.step();
        // grew to 9, then lost 3
        assert_eq!(s.body.len(), 6);
        assert_eq!(s.head(), Cell::new(10, 9));
    }

    #[test]
    fn scissors_never_remove_the_head() {
        let mut s = seeded(SnakeMode::PowerUp);
        s.body = VecDeque::from(vec![Cell::new(10, 10)]);
        park_food(&mut s, Cell::new(10, 9), FoodKind::Scissors);
        s.queue_direction(Direction::Up);
        s.step();
        assert_eq!(s.body.len(), 1);
    }

    #[test]
    fn special_food_expires() {
        let mut s = seeded(SnakeMode::PowerUp);
        s.food = Food {
            cell: Cell::new(0, 19),
            kind: FoodKind::Golden,
            expires_in: Some(2),
        };
        s.queue_direction(Direction::Left);
        assert!(!s.step().contains(&GameEvent::FoodExpired));
        assert!(s.step().contains(&GameEvent::FoodExpired));
    }

    #[test]
    fn pause_blocks_steering_and_ticks() {
        let mut s = seeded(SnakeMode::Classic);
        far_food(&mut s);
        s.queue_direction(Direction::Up);
        assert_eq!(s.toggle_pause(), vec![GameEvent::Paused]);
        let head = s.head();
        s.queue_direction(Direction::Left);
        assert!(s.step().is_empty());
        assert_eq!(s.head(), head);
        assert_eq!(s.toggle_pause(), vec![GameEvent::Resumed]);
        s.step();
        assert_eq!(s.heading, Some(Direction::Up));
    }

    #[test]
    fn mode_locked_during_round() {
        let mut s = seeded(SnakeMode::Classic);
        s.queue_direction(Direction::Up);
        assert!(!s.set_mode(SnakeMode::Zen));
        assert_eq!(s.mode, SnakeMode::Classic);
    }

    #[test]
    fn food_avoids_the_body() {
        let mut rng = StdRng::seed_from_u64(3);
        // Everything but one cell is occupied.
        let body: Vec<Cell> = (0..GRID_WIDTH)
            .flat_map(|x| (0..GRID_HEIGHT).map(move |y| Cell::new(x, y)))
            .filter(|c| *c != Cell::new(13, 4))
            .collect();
        assert_eq!(spawn_food(&body, &mut rng), Some(Cell::new(13, 4)));

        let full: Vec<Cell> = (0..GRID_WIDTH)
            .flat_map(|x| (0..GRID_HEIGHT).map(move |y| Cell::new(x, y)))
            .collect();
        assert_eq!(spawn_food(&full, &mut rng), None);
    }
}
