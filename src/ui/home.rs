use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::games::GameMode;
use crate::scores::{KeyValueStore, ScoreEntry};

const GOLD: Color = Color::Rgb(255, 220, 80);
const KEY: Color = Color::Rgb(80, 200, 255);
const DIM: Color = Color::Rgb(120, 120, 140);
const LABEL: Color = Color::Rgb(140, 140, 140);
const PANEL_BORDER: Color = Color::Rgb(60, 150, 200);
const OVERLAY_BG: Color = Color::Rgb(15, 15, 25);

struct GameTile {
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 4] = [
    GameTile {
        icon: "🐍",
        name: "Snake",
        desc: "Eat, grow, and\nnever bite yourself",
        color: Color::Rgb(80, 220, 80),
        border_color: Color::Rgb(40, 120, 40),
    },
    GameTile {
        icon: "🧱",
        name: "Breakout",
        desc: "Clear the wall\nbrick by brick",
        color: Color::Rgb(220, 80, 80),
        border_color: Color::Rgb(120, 40, 40),
    },
    GameTile {
        icon: "🐤",
        name: "Flappy Bird",
        desc: "Thread the bird\nthrough the pipes",
        color: Color::Rgb(112, 197, 206),
        border_color: Color::Rgb(50, 100, 110),
    },
    GameTile {
        icon: "🔢",
        name: "2048",
        desc: "Slide and merge\nto reach 2048",
        color: Color::Rgb(237, 194, 46),
        border_color: Color::Rgb(130, 100, 20),
    },
];

const MEDALS: [Color; 3] = [
    Color::Rgb(255, 215, 0),
    Color::Rgb(192, 192, 192),
    Color::Rgb(205, 127, 50),
];

fn render_game_tile(frame: &mut Frame, area: Rect, number: usize, tile: &GameTile, selected: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
        .border_style(Style::default().fg(if selected { GOLD } else { tile.border_color }));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("[{number}] "),
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{} ", tile.icon)),
        Span::styled(
            tile.name,
            Style::default()
                .fg(if selected { Color::White } else { tile.color })
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { DIM };
    lines.extend(
        tile.desc
            .split('\n')
            .map(|l| Line::styled(l, Style::default().fg(desc_color))),
    );
    if selected {
        lines.push(Line::styled(
            "▶ Enter to play",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn key_row(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {key:<17}"), Style::default().fg(KEY)),
        Span::styled(label, Style::default().fg(LABEL)),
    ])
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::styled(
        format!("  {}", text.into()),
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
    )
}

fn controls() -> Vec<Line<'static>> {
    vec![
        heading("Navigation"),
        key_row("Tab / Shift+Tab", "Switch tabs"),
        key_row("1-4 / Enter", "Launch game"),
        key_row("← →", "Select game"),
        key_row("H", "Global leaderboard"),
        key_row("Esc", "Back to menu"),
        key_row("q / Ctrl+C", "Quit"),
        Line::from(""),
        heading("In game"),
        key_row("←↑↓→ / WASD", "Steer"),
        key_row("Space / Click", "Start, launch, flap"),
        key_row("Drag", "Swipe"),
        key_row("P / R", "Pause / Restart"),
        key_row("M", "Mode or difficulty"),
        key_row("T / K", "Theme / Snake skin"),
        key_row("L", "Submit to leaderboard"),
    ]
}

fn score_line(rank: usize, name: &str, score: u32, detail: String) -> Line<'static> {
    let color = MEDALS.get(rank).copied().unwrap_or(Color::Rgb(200, 200, 220));
    Line::from(vec![
        Span::styled(format!("    {:>2}. ", rank + 1), Style::default().fg(DIM)),
        Span::styled(format!("{name:<12.12} "), Style::default().fg(Color::Rgb(200, 200, 220))),
        Span::styled(
            format!("{score:>7}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {detail}"), Style::default().fg(DIM)),
    ])
}

fn hall_of_fame<S: KeyValueStore>(app: &App<S>) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Best per game")];
    for &mode in GameMode::all() {
        let best = app.high_scores.best_entry(mode);
        let value = match &best {
            Some(ScoreEntry { username, score, .. }) => format!("{score:>7}  {username}"),
            None => "      -".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("    {:<18}", mode.title()), Style::default().fg(LABEL)),
            Span::styled(value, Style::default().fg(Color::Rgb(200, 200, 220))),
        ]));
    }

    let selected = app.selected_mode();
    lines.push(Line::from(""));
    lines.push(heading(format!("Top {}", selected.title())));
    let entries = app.high_scores.load_scores(selected);
    if entries.is_empty() {
        lines.push(Line::styled("    No scores yet", Style::default().fg(Color::Rgb(60, 60, 80))));
    }
    for (rank, entry) in entries.iter().enumerate() {
        lines.push(score_line(rank, &entry.username, entry.score, entry.date_label()));
    }
    lines
}

pub fn render_home<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(vec![
        Line::styled(
            "P O C K E T C A D E",
            Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD),
        ),
        Line::styled("four games, one cabinet", Style::default().fg(DIM)),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().padding(Padding::top(1)));
    frame.render_widget(title, chunks[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);
    for (i, tile) in GAME_TILES.iter().enumerate() {
        render_game_tile(frame, cols[i], i + 1, tile, app.selected_game == i);
    }

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(chunks[2]);
    let panel = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(PANEL_BORDER))
            .title(title)
            .title_style(
                Style::default()
                    .fg(Color::Rgb(200, 120, 255))
                    .add_modifier(Modifier::BOLD),
            )
    };
    frame.render_widget(Paragraph::new(controls()).block(panel(" Controls ")), panels[0]);
    frame.render_widget(
        Paragraph::new(hall_of_fame(app)).block(panel(" Hall of Fame ")),
        panels[1],
    );

    let footer = Line::from(vec![
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::styled(" Global leaderboard", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]);
    frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), chunks[3]);

    if app.show_hall_of_fame {
        render_global_board(frame, area, app);
    }
}

fn render_global_board<S: KeyValueStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let width = 52u16.min(area.width.saturating_sub(4));
    let height = 18u16.min(area.height.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let mode = app.selected_mode();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(format!(" Global: {} ", mode.title()))
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(OVERLAY_BG));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from("")];
    match &app.global_board {
        _ if !app.leaderboard_available() => {
            lines.push(Line::styled("    Leaderboard not configured", Style::default().fg(DIM)));
            lines.push(Line::styled(
                "    Set leaderboard_path in pocketcade.toml",
                Style::default().fg(DIM),
            ));
        }
        Some((board_mode, entries)) if *board_mode == mode => {
            if entries.is_empty() {
                lines.push(Line::styled("    No scores yet", Style::default().fg(DIM)));
            }
            for (rank, entry) in entries.iter().enumerate() {
                let date = entry.created_at.format("%Y-%m-%d").to_string();
                lines.push(score_line(rank, &entry.name, entry.score, date));
            }
        }
        _ => lines.push(Line::styled("    Loading...", Style::default().fg(DIM))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(OVERLAY_BG)), inner);
}
