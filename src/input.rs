//! Input translation: raw terminal events become game intents.
//!
//! Intents are queued in arrival order and drained once per frame by the
//! active game, so the order keys were pressed is the order they apply.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Minimum swipe length, in logical pixels.
pub const SWIPE_THRESHOLD: f32 = 30.0;

/// Approximate pixel size of one terminal cell, used to measure drags.
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Grid step for this direction (y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// What the player asked for, independent of the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Steer(Direction),
    /// Launch, flap, or start, depending on the game.
    Action,
    Pause,
    Restart,
    /// Switch mode or difficulty while a round is not in progress.
    CycleVariant,
    /// Next colour theme, between rounds.
    CycleTheme,
    /// Next snake skin, between rounds.
    CycleSkin,
    /// Horizontal pointer position as a fraction of the play area (0.0..=1.0).
    Pointer(f32),
}

#[derive(Debug, Default)]
pub struct InputQueue {
    pending: VecDeque<Intent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        // Consecutive pointer moves collapse into the latest position.
        if let Intent::Pointer(x) = intent {
            if let Some(Intent::Pointer(last)) = self.pending.back_mut() {
                *last = x;
                return;
            }
        }
        self.pending.push_back(intent);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Intent> + '_ {
        self.pending.drain(..)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Map a key press to a game intent. Keys with global meaning (Tab, Esc,
/// q, Ctrl-C) are handled by the app before this is consulted.
pub fn intent_for_key(key: KeyEvent) -> Option<Intent> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let intent = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Intent::Steer(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Intent::Steer(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Intent::Steer(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Intent::Steer(Direction::Right)
        }
        KeyCode::Char(' ') | KeyCode::Enter => Intent::Action,
        KeyCode::Char('p') | KeyCode::Char('P') => Intent::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') => Intent::Restart,
        KeyCode::Char('m') | KeyCode::Char('M') => Intent::CycleVariant,
        KeyCode::Char('t') | KeyCode::Char('T') => Intent::CycleTheme,
        KeyCode::Char('k') | KeyCode::Char('K') => Intent::CycleSkin,
        _ => return None,
    };
    Some(intent)
}

/// Classify a drag as a swipe. The dominant axis wins; drags shorter than
/// `SWIPE_THRESHOLD` on that axis are not swipes.
pub fn detect_swipe(dx: f32, dy: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx.abs() < SWIPE_THRESHOLD {
            return None;
        }
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        if dy.abs() < SWIPE_THRESHOLD {
            return None;
        }
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Tracks a mouse press so the matching release can be turned into a swipe.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn press(&mut self, column: u16, row: u16) {
        self.start = Some((column, row));
    }

    /// Finish the gesture. Returns `None` for taps and short drags.
    pub fn release(&mut self, column: u16, row: u16) -> Option<Direction> {
        let (start_col, start_row) = self.start.take()?;
        let dx = (column as f32 - start_col as f32) * CELL_WIDTH_PX;
        let dy = (row as f32 - start_row as f32) * CELL_HEIGHT_PX;
        detect_swipe(dx, dy)
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}
