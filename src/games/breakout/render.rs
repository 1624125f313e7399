use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::theme::{BreakoutTheme, THEME_KEY};
use super::{preset, BreakoutState, Phase, BALL_RADIUS, HEIGHT, PADDLE_HEIGHT, PADDLE_Y, WIDTH};
use crate::clock::FixedStep;
use crate::games::{Difficulty, Game, GameEvent, GameMode};
use crate::input::{Direction as Heading, Intent};
use crate::ui::canvas::{self, CellCanvas};

const ACCENT: Color = Color::Rgb(220, 80, 80);
const FRAME_HZ: u32 = 60;
/// Paddle travel per arrow key press, in field pixels.
const KEY_NUDGE: f32 = 40.0;

pub struct BreakoutGame {
    state: BreakoutState,
    clock: FixedStep,
    high_score: u32,
    theme: BreakoutTheme,
}

impl BreakoutGame {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            state: BreakoutState::new(difficulty),
            clock: FixedStep::per_second(FRAME_HZ),
            high_score: 0,
            theme: BreakoutTheme::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &BreakoutState {
        &self.state
    }

    fn draw_field(&self, frame: &mut Frame, area: Rect) {
        let palette = self.theme.palette();
        let bg = palette.background;
        let field = canvas::fit_aspect(area, WIDTH, HEIGHT);
        let mut canvas = CellCanvas::new(field, WIDTH, HEIGHT, bg);

        for brick in self.state.bricks.iter().filter(|b| b.visible) {
            canvas.fill_rect(
                brick.x,
                brick.y,
                brick.width,
                brick.height,
                '█',
                Style::default().fg(palette.brick(brick.row)).bg(bg),
            );
        }

        let (paddle_x, paddle_w) = (self.state.paddle_x, self.state.paddle_width);
        canvas.fill_rect(
            paddle_x,
            PADDLE_Y,
            paddle_w,
            PADDLE_HEIGHT,
            '▀',
            Style::default()
                .fg(palette.paddle)
                .bg(palette.paddle_dark)
                .add_modifier(Modifier::BOLD),
        );
        let edge = Style::default().fg(palette.paddle_border).bg(bg);
        canvas.put(paddle_x, PADDLE_Y, '▐', edge);
        canvas.put((paddle_x + paddle_w - 1.0).max(0.0), PADDLE_Y, '▌', edge);

        let ball = self.state.ball;
        canvas.put(
            ball.x.clamp(0.0, WIDTH - 1.0),
            (ball.y - BALL_RADIUS / 2.0).clamp(0.0, HEIGHT - 1.0),
            '●',
            Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD),
        );

        frame.render_widget(Paragraph::new(canvas.into_lines()), field);

        match self.state.phase {
            Phase::Ready => {
                let title = if self.state.score == 0 && self.state.level == 1 {
                    format!("Breakout: {}", self.state.difficulty.label())
                } else {
                    format!("Level {}  Lives {}", self.state.level, self.state.lives)
                };
                canvas::overlay(
                    frame,
                    field,
                    vec![
                        Line::styled(title, Style::default().add_modifier(Modifier::BOLD)),
                        Line::from("Press SPACE to launch"),
                    ],
                    ACCENT,
                );
            }
            Phase::Paused => {
                canvas::overlay(frame, field, vec![Line::from("PAUSED")], Color::Yellow)
            }
            Phase::GameOver => canvas::overlay(
                frame,
                field,
                vec![
                    Line::styled(
                        "GAME OVER",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Line::from(format!("Score: {}  Level: {}", self.state.score, self.state.level)),
                    Line::from("Space/R to play again, L to submit"),
                ],
                Color::Red,
            ),
            Phase::Running => {}
        }
    }
}

impl Game for BreakoutGame {
    fn mode(&self) -> GameMode {
        GameMode::Breakout
    }

    fn handle_input(&mut self, intent: Intent) -> Vec<GameEvent> {
        match intent {
            Intent::Steer(Heading::Left) => {
                self.state.move_paddle(-KEY_NUDGE);
                Vec::new()
            }
            Intent::Steer(Heading::Right) => {
                self.state.move_paddle(KEY_NUDGE);
                Vec::new()
            }
            Intent::Pointer(fraction) => {
                self.state.paddle_to(fraction.clamp(0.0, 1.0) * WIDTH);
                Vec::new()
            }
            Intent::Action | Intent::Steer(Heading::Up) => {
                if self.state.phase == Phase::GameOver {
                    self.reset();
                    return Vec::new();
                }
                let events = self.state.launch();
                if !events.is_empty() {
                    self.clock.reset();
                }
                events
            }
            Intent::Steer(Heading::Down) => Vec::new(),
            Intent::Pause => self.state.toggle_pause(),
            Intent::Restart => {
                self.reset();
                Vec::new()
            }
            Intent::CycleVariant => {
                let next = self.state.difficulty.next();
                self.state.set_difficulty(next);
                Vec::new()
            }
            Intent::CycleTheme if self.state.between_rounds() => {
                self.theme = self.theme.next();
                vec![GameEvent::AppearanceChanged]
            }
            Intent::CycleTheme | Intent::CycleSkin => Vec::new(),
        }
    }

    fn update(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        if self.state.phase != Phase::Running {
            return Vec::new();
        }
        if self.clock.advance(elapsed, 1.0) {
            self.state.step()
        } else {
            Vec::new()
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status, field, help] = canvas::game_layout(frame, area, "Breakout", ACCENT);

        let total = {
            let p = preset(self.state.difficulty);
            p.rows * p.cols
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" Score: {} ", self.state.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            canvas::status_separator(),
            Span::styled(
                format!("Lives: {}", "♥ ".repeat(self.state.lives as usize)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            canvas::status_separator(),
            Span::styled(format!("High: {} ", self.high_score), Style::default().fg(Color::Cyan)),
            canvas::status_separator(),
            Span::styled(
                format!("Level: {} ", self.state.level),
                Style::default().fg(Color::Magenta),
            ),
            canvas::status_separator(),
            Span::styled(
                format!("Bricks: {}/{} ", self.state.bricks_left(), total),
                Style::default().fg(Color::Green),
            ),
            canvas::status_separator(),
            Span::styled(
                format!("{} ", self.state.difficulty.label()),
                Style::default().fg(Color::Gray),
            ),
            canvas::status_separator(),
            Span::styled(self.theme.label(), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), status);

        self.draw_field(frame, field);

        frame.render_widget(
            Paragraph::new(canvas::key_hints(&[
                ("←→/Mouse", "Paddle"),
                ("Space", "Launch"),
                ("P", "Pause"),
                ("R", "Restart"),
                ("M", "Difficulty"),
                ("T", "Theme"),
                ("Esc", "Menu"),
            ])),
            help,
        );
    }

    fn reset(&mut self) {
        self.state.reset();
        self.clock.reset();
    }

    fn is_game_over(&self) -> bool {
        self.state.phase == Phase::GameOver
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }

    fn appearance(&self) -> Vec<(&'static str, &'static str)> {
        vec![(THEME_KEY, self.theme.key())]
    }

    fn restore_appearance(&mut self, key: &str, value: &str) {
        if key == THEME_KEY {
            if let Some(theme) = BreakoutTheme::from_key(value) {
                self.theme = theme;
            }
        }
    }
}
