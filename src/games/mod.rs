pub mod breakout;
pub mod flappy;
pub mod game2048;
pub mod snake;

use std::time::Duration;

use ratatui::prelude::*;
use serde::{Deserialize, Serialize};

use crate::input::Intent;
use snake::FoodKind;

/// Every game is a pure state machine plus a presentation adapter. The
/// adapter implements this trait; the app never reaches into game state.
pub trait Game {
    /// Storage partition for this game's scores.
    fn mode(&self) -> GameMode;
    /// Apply one queued intent.
    fn handle_input(&mut self, intent: Intent) -> Vec<GameEvent>;
    /// Advance by one frame's worth of wall-clock time.
    fn update(&mut self, elapsed: Duration) -> Vec<GameEvent>;
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn is_game_over(&self) -> bool;
    /// Best stored score for the current mode, shown in the status bar.
    fn set_high_score(&mut self, score: u32);

    /// Cosmetic choices as (preference key, value) pairs.
    fn appearance(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    /// Apply a stored cosmetic choice. Unknown keys and values are ignored.
    fn restore_appearance(&mut self, _key: &str, _value: &str) {}
}

/// Things that happened during an update, reported back to the app instead
/// of being acted on inside game logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    FoodEaten { kind: FoodKind },
    FoodExpired,
    SpeedChanged { factor: f32 },
    SpeedReset,
    BrickHit,
    LifeLost { lives_left: u32 },
    LevelComplete { level: u32 },
    PipePassed,
    TilesMoved { gained: u32 },
    Won,
    GameOver { score: u32 },
    /// A theme or skin changed and should be persisted.
    AppearanceChanged,
}

/// A game plus variant; the string key partitions persisted scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    SnakeClassic,
    SnakePowerUp,
    SnakeZen,
    Breakout,
    Flappy,
    Game2048,
}

impl GameMode {
    pub fn all() -> &'static [GameMode] {
        &[
            GameMode::SnakeClassic,
            GameMode::SnakePowerUp,
            GameMode::SnakeZen,
            GameMode::Breakout,
            GameMode::Flappy,
            GameMode::Game2048,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            GameMode::SnakeClassic => "snake_classic",
            GameMode::SnakePowerUp => "snake_powerup",
            GameMode::SnakeZen => "snake_zen",
            GameMode::Breakout => "breakout",
            GameMode::Flappy => "flappy",
            GameMode::Game2048 => "2048",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameMode::SnakeClassic => "Snake (Classic)",
            GameMode::SnakePowerUp => "Snake (Power-Up)",
            GameMode::SnakeZen => "Snake (Zen)",
            GameMode::Breakout => "Breakout",
            GameMode::Flappy => "Flappy Bird",
            GameMode::Game2048 => "2048",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_keys_are_unique() {
        let keys: std::collections::HashSet<_> = GameMode::all().iter().map(|m| m.key()).collect();
        assert_eq!(keys.len(), GameMode::all().len());
    }

    #[test]
    fn difficulty_cycles() {
        let d = Difficulty::Easy;
        assert_eq!(d.next().next().next(), d);
    }
}
