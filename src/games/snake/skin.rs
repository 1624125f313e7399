//! Snake board themes and body skins. Both are cosmetic and persist as
//! plain string preferences.

use ratatui::style::Color;

use crate::ui::canvas::hsl;

pub const THEME_KEY: &str = "snakeTheme";
pub const SKIN_KEY: &str = "snakeSkin";

pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub food: Color,
    pub head: Color,
    pub head_border: Color,
    pub body: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnakeTheme {
    #[default]
    Default,
    Night,
    Garden,
    Space,
    Retro,
}

impl SnakeTheme {
    const ALL: [SnakeTheme; 5] = [
        SnakeTheme::Default,
        SnakeTheme::Night,
        SnakeTheme::Garden,
        SnakeTheme::Space,
        SnakeTheme::Retro,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SnakeTheme::Default => "default",
            SnakeTheme::Night => "night",
            SnakeTheme::Garden => "garden",
            SnakeTheme::Space => "space",
            SnakeTheme::Retro => "retro",
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
            SnakeTheme::Default => "Classic",
            SnakeTheme::Night => "Night",
            SnakeTheme::Garden => "Garden",
            SnakeTheme::Space => "Space",
            SnakeTheme::Retro => "Retro",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            SnakeTheme::Default => Palette {
                background: Color::Rgb(26, 26, 46),
                grid: Color::Rgb(22, 33, 62),
                food: Color::Rgb(255, 71, 87),
                head: Color::Rgb(78, 205, 196),
                head_border: Color::Rgb(110, 240, 240),
                body: Color::Rgb(69, 183, 184),
            },
            SnakeTheme::Night => Palette {
                background: Color::Rgb(10, 10, 26),
                grid: Color::Rgb(26, 26, 58),
                food: Color::Rgb(255, 165, 2),
                head: Color::Rgb(108, 92, 231),
                head_border: Color::Rgb(162, 155, 254),
                body: Color::Rgb(95, 77, 238),
            },
            SnakeTheme::Garden => Palette {
                background: Color::Rgb(45, 80, 22),
                grid: Color::Rgb(26, 48, 9),
                food: Color::Rgb(255, 56, 56),
                head: Color::Rgb(81, 207, 102),
                head_border: Color::Rgb(105, 219, 124),
                body: Color::Rgb(64, 192, 87),
            },
            SnakeTheme::Space => Palette {
                background: Color::Rgb(0, 8, 20),
                grid: Color::Rgb(0, 29, 61),
                food: Color::Rgb(255, 99, 72),
                head: Color::Rgb(74, 144, 226),
                head_border: Color::Rgb(107, 179, 255),
                body: Color::Rgb(53, 122, 189),
            },
            SnakeTheme::Retro => Palette {
                background: Color::Rgb(30, 58, 30),
                grid: Color::Rgb(15, 31, 15),
                food: Color::Rgb(255, 20, 147),
                head: Color::Rgb(0, 255, 65),
                head_border: Color::Rgb(0, 255, 136),
                body: Color::Rgb(0, 204, 51),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Skin {
    #[default]
    Classic,
    Rainbow,
    Robot,
}

impl Skin {
    const ALL: [Skin; 3] = [Skin::Classic, Skin::Rainbow, Skin::Robot];

    pub fn key(self) -> &'static str {
        match self {
            Skin::Classic => "classic",
            Skin::Rainbow => "rainbow",
            Skin::Robot => "robot",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Skin::Classic => "Classic",
            Skin::Rainbow => "Rainbow",
            Skin::Robot => "Robot",
        }
    }

    /// Head fill and outline colours. `tick` drives the rainbow cycle.
    pub fn head(self, palette: &Palette, tick: u64) -> (Color, Color) {
        match self {
            Skin::Classic => (palette.head, palette.head_border),
            Skin::Rainbow => {
                let hue = rainbow_hue(tick, 0);
                (hsl(hue, 0.7, 0.6), hsl(hue + 30, 0.9, 0.7))
            }
            Skin::Robot => (Color::Rgb(224, 224, 224), Color::Rgb(255, 255, 255)),
        }
    }

    /// Colour of the body segment at `index` (the head is index 0).
    pub fn body(self, palette: &Palette, tick: u64, index: usize) -> Color {
        match self {
            Skin::Classic => palette.body,
            Skin::Rainbow => hsl(rainbow_hue(tick, index), 0.7, 0.5),
            Skin::Robot if index % 2 == 0 => Color::Rgb(128, 128, 128),
            Skin::Robot => Color::Rgb(160, 160, 160),
        }
    }
}

fn rainbow_hue(tick: u64, index: usize) -> u32 {
    ((tick * 2 + index as u64 * 30) % 360) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_and_cycle() {
        for theme in SnakeTheme::ALL {
            assert_eq!(SnakeTheme::from_key(theme.key()), Some(theme));
        }
        assert_eq!(SnakeTheme::Retro.next(), SnakeTheme::Default);
        assert_eq!(Skin::from_key("robot"), Some(Skin::Robot));
        assert_eq!(Skin::from_key("plaid"), None);
        assert_eq!(Skin::Robot.next(), Skin::Classic);
    }

    #[test]
    fn robot_body_alternates() {
        let palette = SnakeTheme::Default.palette();
        assert_ne!(Skin::Robot.body(&palette, 0, 1), Skin::Robot.body(&palette, 0, 2));
        assert_eq!(Skin::Robot.body(&palette, 0, 1), Skin::Robot.body(&palette, 9, 3));
    }

    #[test]
    fn rainbow_shifts_with_ticks() {
        let palette = SnakeTheme::Night.palette();
        assert_eq!(Skin::Rainbow.head(&palette, 0).0, hsl(0, 0.7, 0.6));
        assert_ne!(Skin::Rainbow.head(&palette, 0), Skin::Rainbow.head(&palette, 30));
        assert_eq!(Skin::Rainbow.body(&palette, 180, 0), Skin::Rainbow.body(&palette, 0, 0));
        assert_eq!(Skin::Classic.body(&palette, 5, 5), palette.body);
    }
}
