//! Flappy Bird: gravity, flaps and scrolling pipe pairs on a 400x600 field.

pub mod render;

pub use render::FlappyGame;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::games::{Difficulty, GameEvent};

pub const WIDTH: f32 = 400.0;
pub const HEIGHT: f32 = 600.0;
pub const BIRD_X: f32 = 100.0;
pub const BIRD_SIZE: f32 = 30.0;
pub const PIPE_WIDTH: f32 = 45.0;

const GRAVITY: f32 = 0.5;
/// Smallest pipe segment above or below the gap.
const GAP_MARGIN: f32 = 50.0;
const BASE_SPAWN_FRAMES: u32 = 120;
const MIN_SPAWN_FRAMES: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub base_speed: f32,
    /// Pipe speed added per frame.
    pub ramp: f32,
    pub gap: f32,
    /// Velocity a flap sets, negative is up.
    pub jump: f32,
}

pub fn preset(difficulty: Difficulty) -> Preset {
    match difficulty {
        Difficulty::Easy => Preset {
            base_speed: 2.0,
            ramp: 0.002,
            gap: 200.0,
            jump: -10.0,
        },
        Difficulty::Medium => Preset {
            base_speed: 2.5,
            ramp: 0.003,
            gap: 180.0,
            jump: -11.0,
        },
        Difficulty::Hard => Preset {
            base_speed: 3.5,
            ramp: 0.004,
            gap: 160.0,
            jump: -12.0,
        },
    }
}

/// Frames between pipe spawns; faster pipes spawn more often, down to a floor.
pub fn spawn_interval(pipe_speed: f32) -> u32 {
    let shortened = BASE_SPAWN_FRAMES.saturating_sub((pipe_speed * 2.0).floor() as u32);
    shortened.max(MIN_SPAWN_FRAMES)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: f32,
    /// Bottom edge of the upper pipe.
    pub top_height: f32,
    /// Top edge of the lower pipe.
    pub bottom_y: f32,
    pub passed: bool,
}

/// Bird box against a pipe pair: inside the pipe's columns and outside
/// its gap.
pub fn bird_hits_pipe(bird_y: f32, pipe: &Pipe) -> bool {
    let overlaps_x = BIRD_X + BIRD_SIZE > pipe.x && BIRD_X < pipe.x + PIPE_WIDTH;
    overlaps_x && (bird_y < pipe.top_height || bird_y + BIRD_SIZE > pipe.bottom_y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Paused,
    GameOver,
}

pub struct FlappyState {
    pub difficulty: Difficulty,
    pub bird_y: f32,
    pub velocity: f32,
    pub pipes: Vec<Pipe>,
    pub pipe_speed: f32,
    pub frames: u32,
    pub score: u32,
    pub phase: Phase,
    rng: StdRng,
}

impl FlappyState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    pub fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        let mut state = Self {
            difficulty,
            bird_y: 0.0,
            velocity: 0.0,
            pipes: Vec::new(),
            pipe_speed: 0.0,
            frames: 0,
            score: 0,
            phase: Phase::Ready,
            rng,
        };
        state.reset();
        state
    }

    pub fn preset(&self) -> Preset {
        preset(self.difficulty)
    }

    pub fn reset(&mut self) {
        self.bird_y = HEIGHT / 2.0;
        self.velocity = 0.0;
        self.pipes.clear();
        self.pipe_speed = self.preset().base_speed;
        self.frames = 0;
        self.score = 0;
        self.phase = Phase::Ready;
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if !matches!(self.phase, Phase::Ready | Phase::GameOver) {
            return false;
        }
        self.difficulty = difficulty;
        self.reset();
        true
    }

    /// Set the bird's velocity to the jump strength. Starts the run from
    /// the ready screen and resumes a paused one.
    pub fn flap(&mut self) -> Vec<GameEvent> {
        match self.phase {
            Phase::Ready => {
                self.phase = Phase::Running;
                self.velocity = self.preset().jump;
                log::debug!("flappy run started on {}", self.difficulty.label());
                vec![GameEvent::Started]
            }
            Phase::Running => {
                self.velocity = self.preset().jump;
                Vec::new()
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                vec![GameEvent::Resumed]
            }
            Phase::GameOver => Vec::new(),
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

    /// Add a pipe pair at the right edge with a random gap position.
    pub fn spawn_pipe(&mut self) {
        let gap = self.preset().gap;
        let max_top = HEIGHT - gap - GAP_MARGIN;
        let top_height = self.rng.gen_range(GAP_MARGIN..max_top);
        self.pipes.push(Pipe {
            x: WIDTH,
            top_height,
            bottom_y: top_height + gap,
            passed: false,
        });
    }

    /// One physics frame.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }
        let p = self.preset();

        self.frames += 1;
        self.pipe_speed = p.base_speed + self.frames as f32 * p.ramp;

        self.velocity += GRAVITY;
        self.bird_y += self.velocity;
        if self.bird_y < 0.0 {
            self.bird_y = 0.0;
            self.velocity = 0.0;
        }
        if self.bird_y + BIRD_SIZE > HEIGHT {
            self.finish(&mut events);
            return events;
        }

        if self.frames % spawn_interval(self.pipe_speed) == 0 {
            self.spawn_pipe();
        }

        let speed = self.pipe_speed;
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }
        self.pipes.retain(|pipe| pipe.x + PIPE_WIDTH >= 0.0);

        if self.pipes.iter().any(|pipe| bird_hits_pipe(self.bird_y, pipe)) {
            self.finish(&mut events);
            return events;
        }

        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.x + PIPE_WIDTH < BIRD_X {
                pipe.passed = true;
                self.score += 1;
                events.push(GameEvent::PipePassed);
            }
        }
        events
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = Phase::GameOver;
        log::info!("flappy game over: score {}", self.score);
        events.push(GameEvent::GameOver { score: self.score });
    }
}
