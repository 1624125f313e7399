use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::skin::{Palette, Skin, SnakeTheme, SKIN_KEY, THEME_KEY};
use super::{
    FoodKind, Phase, SnakeMode, SnakeState, BASE_INTERVAL_MS, CELL_SIZE, GRID_HEIGHT, GRID_WIDTH,
};
use crate::clock::FixedStep;
use crate::games::{Game, GameEvent, GameMode};
use crate::input::Intent;
use crate::ui::canvas::{self, CellCanvas};

const ACCENT: Color = Color::Rgb(80, 200, 120);

pub struct SnakeGame {
    state: SnakeState,
    clock: FixedStep,
    high_score: u32,
    theme: SnakeTheme,
    skin: Skin,
}

impl SnakeGame {
    pub fn new(mode: SnakeMode) -> Self {
        Self {
            state: SnakeState::new(mode),
            clock: FixedStep::new(Duration::from_millis(BASE_INTERVAL_MS)),
            high_score: 0,
            theme: SnakeTheme::default(),
            skin: Skin::default(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    /// Special food and the ticks it has left.
    fn food_timer(&self) -> Option<String> {
        let left = self.state.food.expires_in?;
        Some(format!("{} ({left})", self.state.food.kind.label()))
    }

    fn between_rounds(&self) -> bool {
        matches!(self.state.phase, Phase::NotStarted | Phase::GameOver)
    }

    fn draw_field(&self, frame: &mut Frame, area: Rect) {
        let field = canvas::fit_aspect(
            area,
            (GRID_WIDTH * CELL_SIZE) as f32,
            (GRID_HEIGHT * CELL_SIZE) as f32,
        );
        let palette = self.theme.palette();
        let bg = palette.background;
        let mut canvas = CellCanvas::new(field, GRID_WIDTH as f32, GRID_HEIGHT as f32, bg);

        let dot = Style::default().fg(palette.grid).bg(bg);
        for y in 0..GRID_HEIGHT {
            for x in 0..GRID_WIDTH {
                canvas.put(x as f32 + 0.5, y as f32 + 0.5, '·', dot);
            }
        }

        let (ch, color) = food_glyph(self.state.food.kind, &palette);
        let food = self.state.food.cell;
        canvas.fill_rect(
            food.x as f32,
            food.y as f32,
            1.0,
            1.0,
            ch,
            Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
        );

        let tick = self.state.ticks;
        for (i, cell) in self.state.body.iter().enumerate().rev() {
            let (ch, style) = if i == 0 {
                let (fill, border) = self.skin.head(&palette, tick);
                ('■', Style::default().fg(fill).bg(border))
            } else {
                ('▓', Style::default().fg(self.skin.body(&palette, tick, i)).bg(bg))
            };
            canvas.fill_rect(cell.x as f32, cell.y as f32, 1.0, 1.0, ch, style);
        }

        frame.render_widget(Paragraph::new(canvas.into_lines()), field);

        match self.state.phase {
            Phase::NotStarted => canvas::overlay(
                frame,
                field,
                vec![
                    Line::from(format!("Snake: {}", self.state.mode.label())),
                    Line::from(format!("{} board, {} skin", self.theme.label(), self.skin.label())),
                    Line::from("Press an arrow key to start"),
                    Line::from("M mode  T theme  K skin"),
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
                    Line::from(format!("Score: {}", self.state.score)),
                    Line::from("Space/R to play again, L to submit"),
                ],
                Color::Red,
            ),
            Phase::Running => {}
        }
    }
}

fn food_glyph(kind: FoodKind, palette: &Palette) -> (char, Color) {
    match kind {
        FoodKind::Normal => ('●', palette.food),
        FoodKind::Golden => ('★', Color::Rgb(255, 215, 0)),
        FoodKind::BluePotion => ('◆', Color::Rgb(80, 140, 255)),
        FoodKind::RedPotion => ('◆', Color::Rgb(255, 60, 120)),
        FoodKind::Scissors => ('✂', Color::Rgb(200, 200, 200)),
    }
}

impl Game for SnakeGame {
    fn mode(&self) -> GameMode {
        self.state.mode.game_mode()
    }

    fn handle_input(&mut self, intent: Intent) -> Vec<GameEvent> {
        match intent {
            Intent::Steer(dir) => {
                let events = self.state.queue_direction(dir);
                if events.contains(&GameEvent::Started) {
                    self.clock.reset();
                }
                events
            }
            Intent::Action if self.state.phase == Phase::GameOver => {
                self.reset();
                Vec::new()
            }
            Intent::Action | Intent::Pause => self.state.toggle_pause(),
            Intent::Restart => {
                self.reset();
                Vec::new()
            }
            Intent::CycleVariant => {
                let next = self.state.mode.next();
                self.state.set_mode(next);
                Vec::new()
            }
            Intent::CycleTheme if self.between_rounds() => {
                self.theme = self.theme.next();
                vec![GameEvent::AppearanceChanged]
            }
            Intent::CycleSkin if self.between_rounds() => {
                self.skin = self.skin.next();
                vec![GameEvent::AppearanceChanged]
            }
            Intent::CycleTheme | Intent::CycleSkin | Intent::Pointer(_) => Vec::new(),
        }
    }

    fn update(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        if self.state.phase != Phase::Running {
            return Vec::new();
        }
        if self.clock.advance(elapsed, self.state.speed.factor()) {
            self.state.step()
        } else {
            Vec::new()
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status, field, help] = canvas::game_layout(frame, area, "Snake", ACCENT);

        let mut spans = vec![
            Span::styled(
                format!(" Score: {} ", self.state.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            canvas::status_separator(),
            Span::styled(format!("High: {} ", self.high_score), Style::default().fg(Color::Cyan)),
            canvas::status_separator(),
            Span::styled(
                format!("Length: {} ", self.state.body.len()),
                Style::default().fg(Color::Green),
            ),
            canvas::status_separator(),
            Span::styled(
                format!("Mode: {} ", self.state.mode.label()),
                Style::default().fg(Color::Magenta),
            ),
        ];
        if let Some(timer) = self.food_timer() {
            let (_, color) = food_glyph(self.state.food.kind, &self.theme.palette());
            spans.push(canvas::status_separator());
            spans.push(Span::styled(timer, Style::default().fg(color)));
        }
        if self.state.speed.is_active() {
            spans.push(canvas::status_separator());
            spans.push(Span::styled(
                format!(
                    "Speed x{:.1} ({})",
                    self.state.speed.factor(),
                    self.state.speed.remaining()
                ),
                Style::default().fg(Color::LightBlue),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), status);

        self.draw_field(frame, field);

        frame.render_widget(
            Paragraph::new(canvas::key_hints(&[
                ("←↑↓→", "Steer"),
                ("P", "Pause"),
                ("R", "Restart"),
                ("M", "Mode"),
                ("T", "Theme"),
                ("K", "Skin"),
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
        vec![(THEME_KEY, self.theme.key()), (SKIN_KEY, self.skin.key())]
    }

    fn restore_appearance(&mut self, key: &str, value: &str) {
        match key {
            THEME_KEY => {
                if let Some(theme) = SnakeTheme::from_key(value) {
                    self.theme = theme;
                }
            }
            SKIN_KEY => {
                if let Some(skin) = Skin::from_key(value) {
                    self.skin = skin;
                }
            }
            _ => {}
        }
    }
}
