//! Breakout: paddle, ball and a wall of bricks on an 800x600 field.

pub mod render;
pub mod theme;

pub use render::BreakoutGame;

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::games::{Difficulty, GameEvent};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 600.0;
pub const BALL_RADIUS: f32 = 10.0;
pub const PADDLE_HEIGHT: f32 = 10.0;
pub const PADDLE_Y: f32 = HEIGHT - PADDLE_HEIGHT - 10.0;

const BRICK_PADDING: f32 = 5.0;
const BRICK_TOP: f32 = 60.0;
const BRICK_POINTS: u32 = 10;
const START_LIVES: u32 = 3;
/// Added to the ball speed every frame of play.
const SPEED_RAMP: f32 = 0.0005;
const LEVEL_SPEEDUP: f32 = 0.3;
/// Steepest bounce off the paddle edge, from vertical.
const MAX_BOUNCE: f32 = PI / 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub paddle_width: f32,
    pub ball_speed: f32,
    pub rows: usize,
    pub cols: usize,
    pub brick_width: f32,
    pub brick_height: f32,
}

pub fn preset(difficulty: Difficulty) -> Preset {
    match difficulty {
        Difficulty::Easy => Preset {
            paddle_width: 120.0,
            ball_speed: 3.0,
            rows: 4,
            cols: 8,
            brick_width: 65.0,
            brick_height: 25.0,
        },
        Difficulty::Medium => Preset {
            paddle_width: 100.0,
            ball_speed: 4.0,
            rows: 5,
            cols: 10,
            brick_width: 55.0,
            brick_height: 20.0,
        },
        Difficulty::Hard => Preset {
            paddle_width: 80.0,
            ball_speed: 5.0,
            rows: 7,
            cols: 12,
            brick_width: 45.0,
            brick_height: 18.0,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brick {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub row: usize,
    pub visible: bool,
}

impl Brick {
    fn right(&self) -> f32 {
        self.x + self.width
    }

    fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Ball {
    pub fn speed(&self) -> f32 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ball resting on the paddle, waiting for a launch.
    Ready,
    Running,
    Paused,
    GameOver,
}

pub struct BreakoutState {
    pub difficulty: Difficulty,
    pub paddle_x: f32,
    pub paddle_width: f32,
    pub ball: Ball,
    pub base_speed: f32,
    pub speed: f32,
    /// Frames since launch, drives the speed ramp.
    pub frames: u32,
    pub bricks: Vec<Brick>,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub phase: Phase,
    rng: StdRng,
}

impl BreakoutState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    pub fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        let p = preset(difficulty);
        let mut state = Self {
            difficulty,
            paddle_x: 0.0,
            paddle_width: p.paddle_width,
            ball: Ball {
                x: 0.0,
                y: 0.0,
                dx: 0.0,
                dy: 0.0,
            },
            base_speed: p.ball_speed,
            speed: p.ball_speed,
            frames: 0,
            bricks: Vec::new(),
            score: 0,
            lives: START_LIVES,
            level: 1,
            phase: Phase::Ready,
            rng,
        };
        state.reset();
        state
    }

    pub fn reset(&mut self) {
        let p = preset(self.difficulty);
        self.paddle_width = p.paddle_width;
        self.paddle_x = (WIDTH - self.paddle_width) / 2.0;
        self.base_speed = p.ball_speed;
        self.speed = p.ball_speed;
        self.frames = 0;
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.bricks = build_bricks(&p);
        self.ready_ball();
    }

    /// Change difficulty before the first launch or after game over.
    /// True before the first launch of a game and after it ends.
    pub fn between_rounds(&self) -> bool {
        let fresh = self.phase == Phase::Ready && self.level == 1 && self.score == 0;
        fresh || self.phase == Phase::GameOver
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if !self.between_rounds() {
            return false;
        }
        self.difficulty = difficulty;
        self.reset();
        true
    }

    /// Fire the ball upward at a random angle between 60° and 120°.
    pub fn launch(&mut self) -> Vec<GameEvent> {
        if self.phase != Phase::Ready {
            return Vec::new();
        }
        let angle = self.rng.gen_range(PI / 3.0..2.0 * PI / 3.0);
        self.ball.dx = angle.cos() * self.speed;
        self.ball.dy = -angle.sin().abs() * self.speed;
        self.phase = Phase::Running;
        log::debug!("breakout launch at level {}", self.level);
        vec![GameEvent::Started]
    }

    pub fn move_paddle(&mut self, delta: f32) {
        self.paddle_to(self.paddle_x + self.paddle_width / 2.0 + delta);
    }

    /// Centre the paddle on `x`, clamped to the field.
    pub fn paddle_to(&mut self, x: f32) {
        if matches!(self.phase, Phase::Paused | Phase::GameOver) {
            return;
        }
        self.paddle_x = (x - self.paddle_width / 2.0).clamp(0.0, WIDTH - self.paddle_width);
        if self.phase == Phase::Ready {
            self.ball.x = self.paddle_x + self.paddle_width / 2.0;
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

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }

    /// One physics frame.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }

        self.frames += 1;
        self.speed = self.base_speed + self.frames as f32 * SPEED_RAMP;
        let current = self.ball.speed();
        if current > 0.0 {
            let ratio = self.speed / current;
            self.ball.dx *= ratio;
            self.ball.dy *= ratio;
        }

        self.ball.x += self.ball.dx;
        self.ball.y += self.ball.dy;

        self.bounce_walls();
        self.bounce_paddle();

        if self.hit_brick() {
            events.push(GameEvent::BrickHit);
            if self.bricks.iter().all(|b| !b.visible) {
                self.next_level();
                events.push(GameEvent::LevelComplete { level: self.level });
                return events;
            }
        }

        if self.ball.y > HEIGHT {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.phase = Phase::GameOver;
                log::info!("breakout game over: score {}", self.score);
                events.push(GameEvent::GameOver { score: self.score });
            } else {
                self.speed = self.base_speed;
                self.frames = 0;
                self.ready_ball();
                events.push(GameEvent::LifeLost {
                    lives_left: self.lives,
                });
            }
        }
        events
    }

    fn bounce_walls(&mut self) {
        let ball = &mut self.ball;
        if ball.x - BALL_RADIUS <= 0.0 {
            ball.dx = ball.dx.abs();
            ball.x = BALL_RADIUS;
        } else if ball.x + BALL_RADIUS >= WIDTH {
            ball.dx = -ball.dx.abs();
            ball.x = WIDTH - BALL_RADIUS;
        }
        if ball.y - BALL_RADIUS <= 0.0 {
            ball.dy = ball.dy.abs();
            ball.y = BALL_RADIUS;
        }
    }

    /// Reflect off the paddle at an angle proportional to the hit offset
    /// from its centre. Only a descending ball bounces.
    fn bounce_paddle(&mut self) {
        let ball = &mut self.ball;
        let overlaps = ball.y + BALL_RADIUS >= PADDLE_Y
            && ball.y - BALL_RADIUS <= PADDLE_Y + PADDLE_HEIGHT
            && ball.x + BALL_RADIUS >= self.paddle_x
            && ball.x - BALL_RADIUS <= self.paddle_x + self.paddle_width;
        if !overlaps || ball.dy <= 0.0 {
            return;
        }
        let half = self.paddle_width / 2.0;
        let hit = ((ball.x - (self.paddle_x + half)) / half).clamp(-1.0, 1.0);
        let angle = hit * MAX_BOUNCE;
        ball.dx = angle.sin() * self.speed;
        ball.dy = -angle.cos().abs() * self.speed;
        ball.y = PADDLE_Y - BALL_RADIUS - 1.0;
    }

    /// Break at most one brick, reflecting on the axis of least overlap.
    fn hit_brick(&mut self) -> bool {
        let ball = &mut self.ball;
        let (left, right) = (ball.x - BALL_RADIUS, ball.x + BALL_RADIUS);
        let (top, bottom) = (ball.y - BALL_RADIUS, ball.y + BALL_RADIUS);

        let Some(brick) = self.bricks.iter_mut().find(|b| {
            b.visible && right > b.x && left < b.right() && bottom > b.y && top < b.bottom()
        }) else {
            return false;
        };

        brick.visible = false;
        self.score += BRICK_POINTS;

        let overlap_x = (right - brick.x).min(brick.right() - left);
        let overlap_y = (bottom - brick.y).min(brick.bottom() - top);
        if overlap_x < overlap_y {
            ball.dx = -ball.dx;
            ball.x = if ball.x > brick.x + brick.width / 2.0 {
                brick.right() + BALL_RADIUS
            } else {
                brick.x - BALL_RADIUS
            };
        } else {
            ball.dy = -ball.dy;
            ball.y = if ball.y > brick.y + brick.height / 2.0 {
                brick.bottom() + BALL_RADIUS
            } else {
                brick.y - BALL_RADIUS
            };
        }
        true
    }

    fn next_level(&mut self) {
        self.level += 1;
        self.lives += 1;
        self.frames = 0;
        self.base_speed += LEVEL_SPEEDUP;
        self.speed = self.base_speed;
        self.bricks = build_bricks(&preset(self.difficulty));
        self.ready_ball();
        log::info!("breakout level {} reached, score {}", self.level, self.score);
    }

    fn ready_ball(&mut self) {
        self.ball = Ball {
            x: self.paddle_x + self.paddle_width / 2.0,
            y: PADDLE_Y - BALL_RADIUS - 5.0,
            dx: 0.0,
            dy: 0.0,
        };
        self.phase = Phase::Ready;
    }
}

/// Lay out `rows x cols` bricks, centred horizontally.
fn build_bricks(p: &Preset) -> Vec<Brick> {
    let total = p.cols as f32 * p.brick_width + (p.cols as f32 - 1.0) * BRICK_PADDING;
    let left = (WIDTH - total) / 2.0;
    let mut bricks = Vec::with_capacity(p.rows * p.cols);
    for row in 0..p.rows {
        for col in 0..p.cols {
            bricks.push(Brick {
                x: left + col as f32 * (p.brick_width + BRICK_PADDING),
                y: BRICK_TOP + row as f32 * (p.brick_height + BRICK_PADDING),
                width: p.brick_width,
                height: p.brick_height,
                row,
                visible: true,
            });
        }
    }
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(difficulty: Difficulty) -> BreakoutState {
        BreakoutState::with_rng(difficulty, StdRng::seed_from_u64(11))
    }

    /// Put the ball just under `brick` heading straight up.
    fn aim_at(state: &mut BreakoutState, index: usize) {
        let b = state.bricks[index];
        state.ball = Ball {
            x: b.x + b.width / 2.0,
            y: b.bottom() + BALL_RADIUS + 2.0,
            dx: 0.0,
            dy: -state.speed,
        };
    }

    #[test]
    fn presets_match_brick_counts() {
        assert_eq!(seeded(Difficulty::Easy).bricks.len(), 32);
        assert_eq!(seeded(Difficulty::Medium).bricks.len(), 50);
        assert_eq!(seeded(Difficulty::Hard).bricks.len(), 84);
    }

    #[test]
    fn bricks_are_centred() {
        let s = seeded(Difficulty::Medium);
        let first = s.bricks.first().map(|b| b.x).unwrap_or_default();
        let last = s.bricks.last().map(|b| b.right()).unwrap_or_default();
        assert!((first - (WIDTH - last)).abs() < 1e-3);
    }

    #[test]
    fn launch_goes_upward_at_configured_speed() {
        let mut s = seeded(Difficulty::Medium);
        assert_eq!(s.launch(), vec![GameEvent::Started]);
        assert!(s.ball.dy < 0.0);
        assert!((s.ball.speed() - 4.0).abs() < 1e-3);
        // a second launch is a no-op
        assert!(s.launch().is_empty());
    }

    #[test]
    fn ready_ball_rides_the_paddle() {
        let mut s = seeded(Difficulty::Medium);
        s.paddle_to(100.0);
        assert_eq!(s.paddle_x, 50.0);
        assert_eq!(s.ball.x, 100.0);
        s.paddle_to(10_000.0);
        assert_eq!(s.paddle_x, WIDTH - s.paddle_width);
    }

    #[test]
    fn side_wall_reflects_and_clamps() {
        let mut s = seeded(Difficulty::Medium);
        s.phase = Phase::Running;
        s.ball = Ball {
            x: 12.0,
            y: 300.0,
            dx: -4.0,
            dy: 0.5,
        };
        s.step();
        assert!(s.ball.dx > 0.0);
        assert_eq!(s.ball.x, BALL_RADIUS);
    }

    #[test]
    fn ceiling_reflects_and_clamps() {
        let mut s = seeded(Difficulty::Medium);
        s.phase = Phase::Running;
        s.ball = Ball {
            x: 400.0,
            y: 12.0,
            dx: 1.0,
            dy: -4.0,
        };
        s.step();
        assert!(s.ball.dy > 0.0);
        assert!(s.ball.dx > 0.0);
        assert_eq!(s.ball.y, BALL_RADIUS);
    }

    #[test]
    fn paddle_centre_sends_ball_straight_up() {
        let mut s = seeded(Difficulty::Medium);
        s.phase = Phase::Running;
        let centre = s.paddle_x + s.paddle_width / 2.0;
        s.ball = Ball {
            x: centre,
            y: PADDLE_Y - BALL_RADIUS - 2.0,
            dx: 0.0,
            dy: 4.0,
        };
        s.step();
        assert!(s.ball.dx.abs() < 1e-4);
        assert!(s.ball.dy < 0.0);
        assert_eq!(s.ball.y, PADDLE_Y - BALL_RADIUS - 1.0);
    }

    #[test]
    fn paddle_edge_caps_the_angle() {
        let mut s = seeded(Difficulty::Medium);
        s.phase = Phase::Running;
        s.ball = Ball {
            x: s.paddle_x + s.paddle_width + 5.0,
            y: PADDLE_Y - BALL_RADIUS + 1.0,
            dx: 0.0,
            dy: 4.0,
        };
        s.step();
        let angle = s.ball.dx.atan2(-s.ball.dy);
        assert!((angle - MAX_BOUNCE).abs() < 1e-3);
    }

    #[test]
    fn rising_ball_passes_through_paddle() {
        let mut s = seeded(Difficulty::Medium);
        s.phase = Phase::Running;
        let centre = s.paddle_x + s.paddle_width / 2.0;
        s.ball = Ball {
            x: centre,
            y: PADDLE_Y + 4.0,
            dx: 0.0,
            dy: -4.0,
        };
        s.step();
        assert!(s.ball.dy < 0.0);
    }

    #[test]
    fn brick_hit_scores_and_reflects() {
        let mut s = seeded(Difficulty::Medium);
        s.phase = Phase::Running;
        let last = s.bricks.len() - 1;
        aim_at(&mut s, last);
        let events = s.step();
        assert_eq!(events, vec![GameEvent::BrickHit]);
        assert_eq!(s.score, 10);
        assert!(!s.bricks[last].visible);
        assert!(s.ball.dy > 0.0);
        assert_eq!(s.ball.y, s.bricks[last].bottom() + BALL_RADIUS);
    }

    #[test]
    fn losing_a_life_returns_to_ready() {
        let mut s = seeded(Difficulty::Medium);
        s.launch();
        s.ball = Ball {
            x: 20.0,
            y: HEIGHT + 1.0,
            dx: 0.0,
            dy: 4.0,
        };
        let events = s.step();
        assert_eq!(events, vec![GameEvent::LifeLost { lives_left: 2 }]);
        assert_eq!(s.phase, Phase::Ready);
        assert_eq!(s.ball.dx, 0.0);
        assert_eq!(s.frames, 0);
    }

    #[test]
    fn last_life_ends_the_game() {
        let mut s = seeded(Difficulty::Medium);
        s.launch();
        s.lives = 1;
        s.ball = Ball {
            x: 20.0,
            y: HEIGHT + 1.0,
            dx: 0.0,
            dy: 4.0,
        };
        assert_eq!(s.step(), vec![GameEvent::GameOver { score: 0 }]);
        assert_eq!(s.phase, Phase::GameOver);
        assert!(s.step().is_empty());
    }

    #[test]
    fn medium_clear_awards_500_and_next_level() {
        let mut s = seeded(Difficulty::Medium);
        s.launch();
        let mut completed = false;
        for index in (0..s.bricks.len()).rev() {
            aim_at(&mut s, index);
            let events = s.step();
            assert!(events.contains(&GameEvent::BrickHit));
            if events.contains(&GameEvent::LevelComplete { level: 2 }) {
                completed = true;
            }
        }
        assert!(completed);
        assert_eq!(s.score, 500);
        assert_eq!(s.level, 2);
        assert_eq!(s.lives, 4);
        assert_eq!(s.phase, Phase::Ready);
        assert_eq!(s.bricks_left(), 50);
        assert!((s.base_speed - 4.3).abs() < 1e-4);
    }

    #[test]
    fn difficulty_locked_once_play_began() {
        let mut s = seeded(Difficulty::Medium);
        assert!(s.set_difficulty(Difficulty::Hard));
        assert_eq!(s.paddle_width, 80.0);
        s.launch();
        assert!(!s.set_difficulty(Difficulty::Easy));
        assert_eq!(s.difficulty, Difficulty::Hard);
    }

    #[test]
    fn pause_freezes_the_ball() {
        let mut s = seeded(Difficulty::Medium);
        s.launch();
        s.toggle_pause();
        let before = s.ball;
        assert!(s.step().is_empty());
        assert_eq!(s.ball, before);
        s.paddle_to(0.0);
        assert_ne!(s.paddle_x, 0.0);
    }
}
