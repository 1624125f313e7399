//! Breakout colour themes.

use ratatui::style::Color;

pub const THEME_KEY: &str = "breakoutTheme";

pub struct Palette {
    pub background: Color,
    /// Brick colour by row, repeating.
    pub bricks: [Color; 5],
    pub paddle: Color,
    pub paddle_dark: Color,
    pub paddle_border: Color,
}

impl Palette {
    pub fn brick(&self, row: usize) -> Color {
        self.bricks[row % self.bricks.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakoutTheme {
    #[default]
    Default,
    Neon,
    Ocean,
    Sunset,
}

impl BreakoutTheme {
    const ALL: [BreakoutTheme; 4] = [
        BreakoutTheme::Default,
        BreakoutTheme::Neon,
        BreakoutTheme::Ocean,
        BreakoutTheme::Sunset,
    ];

    pub fn key(self) -> &'static str {
        match self {
            BreakoutTheme::Default => "default",
            BreakoutTheme::Neon => "neon",
            BreakoutTheme::Ocean => "ocean",
            BreakoutTheme::Sunset => "sunset",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            BreakoutTheme::Default => "Classic",
            BreakoutTheme::Neon => "Neon",
            BreakoutTheme::Ocean => "Ocean",
            BreakoutTheme::Sunset => "Sunset",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            BreakoutTheme::Default => Palette {
                background: Color::Rgb(26, 26, 46),
                bricks: [
                    Color::Rgb(255, 107, 107),
                    Color::Rgb(78, 205, 196),
                    Color::Rgb(69, 183, 184),
                    Color::Rgb(255, 230, 109),
                    Color::Rgb(149, 225, 211),
                ],
                paddle: Color::Rgb(78, 205, 196),
                paddle_dark: Color::Rgb(42, 157, 143),
                paddle_border: Color::Rgb(26, 95, 87),
            },
            BreakoutTheme::Neon => Palette {
                background: Color::Rgb(10, 10, 26),
                bricks: [
                    Color::Rgb(255, 0, 255),
                    Color::Rgb(0, 255, 255),
                    Color::Rgb(255, 255, 0),
                    Color::Rgb(255, 0, 128),
                    Color::Rgb(128, 0, 255),
                ],
                paddle: Color::Rgb(0, 255, 255),
                paddle_dark: Color::Rgb(0, 128, 255),
                paddle_border: Color::Rgb(0, 64, 128),
            },
            BreakoutTheme::Ocean => Palette {
                background: Color::Rgb(0, 31, 63),
                bricks: [
                    Color::Rgb(0, 116, 217),
                    Color::Rgb(57, 204, 204),
                    Color::Rgb(127, 219, 255),
                    Color::Rgb(0, 168, 204),
                    Color::Rgb(0, 151, 230),
                ],
                paddle: Color::Rgb(57, 204, 204),
                paddle_dark: Color::Rgb(0, 168, 204),
                paddle_border: Color::Rgb(0, 105, 148),
            },
            BreakoutTheme::Sunset => Palette {
                background: Color::Rgb(45, 27, 27),
                bricks: [
                    Color::Rgb(255, 107, 53),
                    Color::Rgb(247, 147, 30),
                    Color::Rgb(255, 210, 63),
                    Color::Rgb(255, 140, 66),
                    Color::Rgb(255, 160, 122),
                ],
                paddle: Color::Rgb(255, 107, 53),
                paddle_dark: Color::Rgb(212, 84, 42),
                paddle_border: Color::Rgb(139, 58, 31),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_cycle_through_all_four() {
        let mut theme = BreakoutTheme::default();
        for _ in 0..4 {
            assert_eq!(BreakoutTheme::from_key(theme.key()), Some(theme));
            theme = theme.next();
        }
        assert_eq!(theme, BreakoutTheme::Default);
        assert_eq!(BreakoutTheme::from_key("pastel"), None);
    }

    #[test]
    fn brick_rows_repeat_the_palette() {
        let palette = BreakoutTheme::Ocean.palette();
        assert_eq!(palette.brick(0), palette.brick(5));
        assert_ne!(palette.brick(0), palette.brick(1));
    }
}
