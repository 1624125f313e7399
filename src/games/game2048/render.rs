use std::time::Duration;

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use super::{Game2048State, SIZE, WIN_TILE};
use crate::games::{Game, GameEvent, GameMode};
use crate::input::Intent;
use crate::ui::canvas;

const ACCENT: Color = Color::Rgb(237, 194, 46);

fn tile_colors(value: u32) -> (Color, Color) {
    match value {
        0 => (Color::Rgb(205, 193, 180), Color::Rgb(205, 193, 180)),
        2 => (Color::Rgb(238, 228, 218), Color::Rgb(119, 110, 101)),
        4 => (Color::Rgb(237, 224, 200), Color::Rgb(119, 110, 101)),
        8 => (Color::Rgb(242, 177, 121), Color::White),
        16 => (Color::Rgb(245, 149, 99), Color::White),
        32 => (Color::Rgb(246, 124, 95), Color::White),
        64 => (Color::Rgb(246, 94, 59), Color::White),
        128 => (Color::Rgb(237, 207, 114), Color::White),
        256 => (Color::Rgb(237, 204, 97), Color::White),
        512 => (Color::Rgb(237, 200, 80), Color::White),
        1024 => (Color::Rgb(237, 197, 63), Color::White),
        2048 => (Color::Rgb(237, 194, 46), Color::White),
        _ => (Color::Rgb(60, 58, 50), Color::White),
    }
}

pub struct Game2048 {
    state: Game2048State,
    high_score: u32,
}

impl Game2048 {
    pub fn new() -> Self {
        Self {
            state: Game2048State::new(),
            high_score: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &Game2048State {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn load(&mut self, board: super::Board, score: u32) {
        self.state.board = board;
        self.state.score = score;
        self.state.over = false;
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        // Tiles are roughly square: twice as many columns as rows.
        let side = area.height.min(area.width / 2);
        let board = Rect {
            x: area.x + (area.width - side * 2) / 2,
            y: area.y + (area.height - side) / 2,
            width: side * 2,
            height: side,
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, SIZE as u32); SIZE])
            .split(board);

        for (r, row_area) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, SIZE as u32); SIZE])
                .split(*row_area);
            for (c, cell) in cols.iter().enumerate() {
                let value = self.state.board.rows()[r][c];
                let (bg, fg) = tile_colors(value);
                let label = if value == 0 { String::new() } else { value.to_string() };
                let pad = cell.height.saturating_sub(3) / 2;
                let mut lines = vec![Line::from(""); pad as usize];
                lines.push(Line::styled(
                    label,
                    Style::default().fg(fg).add_modifier(Modifier::BOLD),
                ));
                let tile = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .style(Style::default().bg(bg))
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(Color::Rgb(187, 173, 160)).bg(bg)),
                    );
                frame.render_widget(tile, *cell);
            }
        }

        if self.state.over {
            canvas::overlay(
                frame,
                board,
                vec![
                    Line::styled(
                        "GAME OVER",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Line::from(format!("Score: {}", self.state.score)),
                    Line::from("Space/R to play again, L to submit"),
                ],
                Color::Red,
            );
        } else if self.state.show_win_banner {
            canvas::overlay(
                frame,
                board,
                vec![
                    Line::styled(
                        format!("{WIN_TILE}!"),
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    ),
                    Line::from("Space to keep going"),
                ],
                ACCENT,
            );
        }
    }
}

impl Default for Game2048 {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Game2048 {
    fn mode(&self) -> GameMode {
        GameMode::Game2048
    }

    fn handle_input(&mut self, intent: Intent) -> Vec<GameEvent> {
        match intent {
            Intent::Steer(dir) => {
                self.state.dismiss_banner();
                self.state.play(dir)
            }
            Intent::Action if self.state.over => {
                self.reset();
                Vec::new()
            }
            Intent::Action => {
                self.state.dismiss_banner();
                Vec::new()
            }
            Intent::Restart => {
                self.reset();
                Vec::new()
            }
            Intent::Pause
            | Intent::CycleVariant
            | Intent::CycleTheme
            | Intent::CycleSkin
            | Intent::Pointer(_) => Vec::new(),
        }
    }

    /// Moves happen on input; nothing advances with time.
    fn update(&mut self, _elapsed: Duration) -> Vec<GameEvent> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status, field, help] = canvas::game_layout(frame, area, "2048", ACCENT);

        let line = Line::from(vec![
            Span::styled(
                format!(" Score: {} ", self.state.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            canvas::status_separator(),
            Span::styled(format!("High: {} ", self.high_score), Style::default().fg(Color::Cyan)),
            canvas::status_separator(),
            Span::styled(
                format!("Best tile: {} ", self.state.board.max_tile()),
                Style::default().fg(ACCENT),
            ),
            canvas::status_separator(),
            Span::styled(format!("Moves: {}", self.state.moves), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), status);

        self.draw_board(frame, field);

        frame.render_widget(
            Paragraph::new(canvas::key_hints(&[
                ("←↑↓→/Drag", "Slide"),
                ("R", "Restart"),
                ("Esc", "Menu"),
            ])),
            help,
        );
    }

    fn reset(&mut self) {
        self.state.reset();
    }

    fn is_game_over(&self) -> bool {
        self.state.over
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::game2048::Board;
    use crate::input::Direction as Heading;

    #[test]
    fn steering_dismisses_win_banner() {
        let mut game = Game2048::new();
        game.state.board = Board::from_rows([
            [1024, 1024, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        game.handle_input(Intent::Steer(Heading::Left));
        assert!(game.state().show_win_banner);
        game.handle_input(Intent::Action);
        assert!(!game.state().show_win_banner);
        assert!(game.state().won);
    }

    #[test]
    fn time_alone_changes_nothing() {
        let mut game = Game2048::new();
        let before = game.state().board;
        assert!(game.update(Duration::from_secs(3)).is_empty());
        assert_eq!(game.state().board, before);
    }
}
