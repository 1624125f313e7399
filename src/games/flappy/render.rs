use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::{FlappyState, Phase, BIRD_SIZE, BIRD_X, HEIGHT, PIPE_WIDTH, WIDTH};
use crate::clock::FixedStep;
use crate::games::{Difficulty, Game, GameEvent, GameMode};
use crate::input::{Direction as Heading, Intent};
use crate::ui::canvas::{self, CellCanvas};

const ACCENT: Color = Color::Rgb(112, 197, 206);
const SKY: Color = Color::Rgb(30, 60, 90);
const FRAME_HZ: u32 = 60;

pub struct FlappyGame {
    state: FlappyState,
    clock: FixedStep,
    high_score: u32,
}

impl FlappyGame {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            state: FlappyState::new(difficulty),
            clock: FixedStep::per_second(FRAME_HZ),
            high_score: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &FlappyState {
        &self.state
    }

    fn draw_field(&self, frame: &mut Frame, area: Rect) {
        let field = canvas::fit_aspect(area, WIDTH, HEIGHT);
        let mut canvas = CellCanvas::new(field, WIDTH, HEIGHT, SKY);

        let pipe_style = Style::default().fg(Color::Rgb(83, 176, 58)).bg(SKY);
        for pipe in &self.state.pipes {
            let x = pipe.x.max(0.0);
            let w = (pipe.x + PIPE_WIDTH).min(WIDTH) - x;
            if w <= 0.0 {
                continue;
            }
            canvas.fill_rect(x, 0.0, w, pipe.top_height, '█', pipe_style);
            canvas.fill_rect(x, pipe.bottom_y, w, HEIGHT - pipe.bottom_y, '█', pipe_style);
        }

        let bird_style = Style::default()
            .fg(Color::Rgb(255, 215, 0))
            .bg(SKY)
            .add_modifier(Modifier::BOLD);
        let glyph = if self.state.velocity < 0.0 { '▲' } else { '▼' };
        canvas.fill_rect(BIRD_X, self.state.bird_y, BIRD_SIZE, BIRD_SIZE, '◉', bird_style);
        canvas.put(BIRD_X + BIRD_SIZE, self.state.bird_y + BIRD_SIZE / 2.0, glyph, bird_style);

        frame.render_widget(Paragraph::new(canvas.into_lines()), field);

        match self.state.phase {
            Phase::Ready => canvas::overlay(
                frame,
                field,
                vec![
                    Line::from(format!("Flappy: {}", self.state.difficulty.label())),
                    Line::from("SPACE to flap and start"),
                    Line::from("M to change difficulty"),
                ],
                ACCENT,
            ),
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
                    Line::from(format!("Pipes: {}", self.state.score)),
                    Line::from("R to play again, L to submit"),
                ],
                Color::Red,
            ),
            Phase::Running => {}
        }
    }
}

impl Game for FlappyGame {
    fn mode(&self) -> GameMode {
        GameMode::Flappy
    }

    fn handle_input(&mut self, intent: Intent) -> Vec<GameEvent> {
        match intent {
            // A flap right after dying should not skip the game-over screen.
            Intent::Action | Intent::Steer(Heading::Up) => {
                let events = self.state.flap();
                if events.contains(&GameEvent::Started) {
                    self.clock.reset();
                }
                events
            }
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
            Intent::Steer(_) | Intent::Pointer(_) | Intent::CycleTheme | Intent::CycleSkin => {
                Vec::new()
            }
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
        let [status, field, help] = canvas::game_layout(frame, area, "Flappy Bird", ACCENT);

        let line = Line::from(vec![
            Span::styled(
                format!(" Score: {} ", self.state.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            canvas::status_separator(),
            Span::styled(format!("High: {} ", self.high_score), Style::default().fg(Color::Cyan)),
            canvas::status_separator(),
            Span::styled(
                format!("Speed: {:.2} ", self.state.pipe_speed),
                Style::default().fg(Color::Green),
            ),
            canvas::status_separator(),
            Span::styled(
                self.state.difficulty.label().to_string(),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), status);

        self.draw_field(frame, field);

        frame.render_widget(
            Paragraph::new(canvas::key_hints(&[
                ("Space/Click", "Flap"),
                ("P", "Pause"),
                ("R", "Restart"),
                ("M", "Difficulty"),
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_after_death_keeps_game_over() {
        let mut game = FlappyGame::new(Difficulty::Easy);
        game.handle_input(Intent::Action);
        game.state.phase = Phase::GameOver;
        assert!(game.handle_input(Intent::Action).is_empty());
        assert!(game.is_game_over());
        game.handle_input(Intent::Restart);
        assert_eq!(game.state().phase, Phase::Ready);
    }

    #[test]
    fn bird_moves_with_time() {
        let mut game = FlappyGame::new(Difficulty::Easy);
        game.handle_input(Intent::Action);
        let y = game.state().bird_y;
        game.update(Duration::from_millis(17));
        assert!(game.state().bird_y < y);
    }
}
