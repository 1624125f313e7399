pub mod canvas;
pub mod home;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, PendingScore, Tab};
use crate::games::Game;
use crate::scores::KeyValueStore;

const NAME_FIELD: usize = 16;

pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    let tab = app.current_tab;
    match tab {
        Tab::Home => home::render_home(frame, chunks[1], app),
        Tab::Snake => app.snake.render(frame, chunks[1]),
        Tab::Breakout => app.breakout.render(frame, chunks[1]),
        Tab::Flappy => app.flappy.render(frame, chunks[1]),
        Tab::Game2048 => app.game2048.render(frame, chunks[1]),
    }
    if tab != Tab::Home {
        app.game_area = chunks[1];
    }

    if let Some(status) = app.status() {
        let line = Line::styled(
            format!(" {status}"),
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        );
        frame.render_widget(Paragraph::new(line), chunks[2]);
    }

    if app.entering_name {
        if let Some(pending) = app.pending {
            render_name_entry(frame, frame.area(), &app.name_buffer, pending);
        }
    }
}

fn render_name_entry(frame: &mut Frame, area: Rect, name: &str, pending: PendingScore) {
    let width = 44u16.min(area.width.saturating_sub(4));
    let height = 13u16.min(area.height.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let accent = Color::Rgb(255, 220, 80);
    let bg = Color::Rgb(15, 15, 25);
    let dim = Style::default().fg(Color::Rgb(100, 100, 130));
    let key = Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(accent))
        .title(" NEW HIGH SCORE! ")
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(bg));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    // Show the tail of long names so the cursor stays visible.
    let typed: Vec<char> = name.chars().collect();
    let visible: String = typed[typed.len().saturating_sub(NAME_FIELD)..].iter().collect();
    let field = format!("{:_<width$}", visible, width = NAME_FIELD);

    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("  {}", pending.mode.title()),
            Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("  Score: {}", pending.score),
            Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled("  Enter your name:", Style::default().fg(Color::Rgb(180, 180, 200))),
        Line::from(""),
        Line::from(vec![
            Span::styled("    [ ", dim),
            Span::styled(field, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::styled(" ]", dim),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Enter", key),
            Span::styled(" save  ", dim),
            Span::styled("Esc", key),
            Span::styled(" skip", dim),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}
