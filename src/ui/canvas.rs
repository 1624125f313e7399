//! Draw logical game coordinates onto a grid of terminal cells.

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

/// A char grid sized to a terminal area, addressed in the game's own
/// coordinate space and scaled on write.
pub struct CellCanvas {
    cols: usize,
    rows: usize,
    sx: f32,
    sy: f32,
    grid: Vec<Vec<(char, Style)>>,
}

impl CellCanvas {
    pub fn new(area: Rect, logical_width: f32, logical_height: f32, background: Color) -> Self {
        let cols = area.width as usize;
        let rows = area.height as usize;
        Self {
            cols,
            rows,
            sx: cols as f32 / logical_width.max(1.0),
            sy: rows as f32 / logical_height.max(1.0),
            grid: vec![vec![(' ', Style::default().bg(background)); cols]; rows],
        }
    }

    /// Terminal cell under a logical point, if it is on the canvas.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x * self.sx) as usize;
        let row = (y * self.sy) as usize;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    pub fn put(&mut self, x: f32, y: f32, ch: char, style: Style) {
        if let Some((col, row)) = self.to_cell(x, y) {
            self.grid[row][col] = (ch, style);
        }
    }

    /// Fill every cell a logical rectangle touches. Always covers at least
    /// one cell so small objects stay visible on small terminals.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, style: Style) {
        let x0 = (x.max(0.0) * self.sx) as usize;
        let y0 = (y.max(0.0) * self.sy) as usize;
        let x1 = (((x + w) * self.sx).ceil() as usize).max(x0 + 1).min(self.cols);
        let y1 = (((y + h) * self.sy).ceil() as usize).max(y0 + 1).min(self.rows);
        for row in y0..y1 {
            for col in x0..x1 {
                self.grid[row][col] = (ch, style);
            }
        }
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.grid
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Draw the rounded game border and split the inside into status, field
/// and help rows.
pub fn game_layout(frame: &mut Frame, area: Rect, title: &str, accent: Color) -> [Rect; 3] {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);
    [chunks[0], chunks[1], chunks[2]]
}

/// Fit a logical aspect ratio inside `area`, assuming cells are twice as
/// tall as they are wide.
pub fn fit_aspect(area: Rect, logical_width: f32, logical_height: f32) -> Rect {
    let want_ratio = logical_width / logical_height * 2.0;
    let mut width = area.width;
    let mut height = (area.width as f32 / want_ratio) as u16;
    if height > area.height {
        height = area.height;
        width = ((area.height as f32 * want_ratio) as u16).min(area.width);
    }
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn status_separator() -> Span<'static> {
    Span::styled(" │ ", Style::default().fg(Color::DarkGray))
}

/// Help bar of `key label` pairs.
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))));
        }
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("{label} "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// A small centred box over the field (game over, paused, won).
pub fn overlay(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>, accent: Color) {
    let height = (lines.len() as u16 + 2).min(area.height);
    let width = lines
        .iter()
        .map(|l| l.width() as u16 + 4)
        .max()
        .unwrap_or(10)
        .min(area.width);
    let rect = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().bg(Color::Rgb(15, 15, 30))),
        rect,
    );
}

/// Colour from hue in degrees plus saturation and lightness in 0.0..=1.0.
pub fn hsl(hue: u32, saturation: f32, lightness: f32) -> Color {
    let h = (hue % 360) as f32 / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_points_scale_to_cells() {
        let canvas = CellCanvas::new(Rect::new(0, 0, 40, 20), 400.0, 400.0, Color::Black);
        assert_eq!(canvas.to_cell(0.0, 0.0), Some((0, 0)));
        assert_eq!(canvas.to_cell(200.0, 200.0), Some((20, 10)));
        assert_eq!(canvas.to_cell(400.0, 10.0), None);
        assert_eq!(canvas.to_cell(-1.0, 10.0), None);
    }

    #[test]
    fn tiny_rects_still_cover_a_cell() {
        let mut canvas = CellCanvas::new(Rect::new(0, 0, 10, 10), 1000.0, 1000.0, Color::Black);
        canvas.fill_rect(505.0, 505.0, 2.0, 2.0, '#', Style::default());
        let lines = canvas.into_lines();
        assert_eq!(lines[5].spans[5].content, "#");
    }

    #[test]
    fn aspect_fit_stays_inside() {
        let area = Rect::new(0, 0, 120, 30);
        let fitted = fit_aspect(area, 400.0, 600.0);
        assert!(fitted.width <= area.width && fitted.height <= area.height);
        assert_eq!(fitted.height, 30);
    }

    #[test]
    fn hsl_hits_the_primaries() {
        assert_eq!(hsl(0, 1.0, 0.5), Color::Rgb(255, 0, 0));
        assert_eq!(hsl(120, 1.0, 0.5), Color::Rgb(0, 255, 0));
        assert_eq!(hsl(240, 1.0, 0.5), Color::Rgb(0, 0, 255));
        assert_eq!(hsl(360, 1.0, 0.5), Color::Rgb(255, 0, 0));
        assert_eq!(hsl(77, 0.0, 1.0), Color::Rgb(255, 255, 255));
    }
}
