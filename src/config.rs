//! Settings file: `pocketcade.toml`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::games::snake::SnakeMode;
use crate::games::Difficulty;

pub const CONFIG_ENV: &str = "POCKETCADE_CONFIG";
pub const CONFIG_FILE: &str = "pocketcade.toml";
const LOG_FILE: &str = "pocketcade.log";

const MIN_FRAME_RATE: u32 = 10;
const MAX_FRAME_RATE: u32 = 240;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the active settings came from, reported once logging is up.
#[derive(Debug)]
pub enum Source {
    File(PathBuf),
    Missing(PathBuf),
    Invalid(ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding score files. Defaults to the executable's directory.
    pub data_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub frame_rate: u32,
    pub snake_mode: SnakeMode,
    pub breakout_difficulty: Difficulty,
    pub flappy_difficulty: Difficulty,
    /// Shared leaderboard file; the leaderboard is disabled when unset.
    pub leaderboard_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_file: None,
            frame_rate: 60,
            snake_mode: SnakeMode::Classic,
            breakout_difficulty: Difficulty::Medium,
            flappy_difficulty: Difficulty::Medium,
            leaderboard_path: None,
        }
    }
}

impl Settings {
    /// Load from the configured location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> (Self, Source) {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(settings) => (settings, Source::File(path)),
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                (Self::default(), Source::Missing(path))
            }
            Err(e) => (Self::default(), Source::Invalid(e)),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(exe_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join(LOG_FILE))
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate()
    }
}

/// `$POCKETCADE_CONFIG`, else next to the executable if present there,
/// else the working directory.
fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    let beside_exe = exe_dir().join(CONFIG_FILE);
    if beside_exe.exists() {
        beside_exe
    } else {
        PathBuf::from(CONFIG_FILE)
    }
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("pocketcade-config-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = scratch("partial");
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "breakout_difficulty = \"hard\"\nsnake_mode = \"zen\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.breakout_difficulty, Difficulty::Hard);
        assert_eq!(settings.snake_mode, SnakeMode::Zen);
        assert_eq!(settings.flappy_difficulty, Difficulty::Medium);
        assert_eq!(settings.frame_rate, 60);
        assert!(settings.leaderboard_path.is_none());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = scratch("malformed");
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "frame_rate = \"fast\"").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(ConfigError::Parse { .. })));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = scratch("missing").join("nope.toml");
        match Settings::load_from(&path) {
            Err(ConfigError::Read { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn frame_rate_is_clamped() {
        let mut settings = Settings {
            frame_rate: 1,
            ..Settings::default()
        };
        assert_eq!(settings.frame_rate(), MIN_FRAME_RATE);
        settings.frame_rate = 10_000;
        assert_eq!(settings.frame_rate(), MAX_FRAME_RATE);
        settings.frame_rate = 50;
        assert_eq!(settings.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn log_file_defaults_into_data_dir() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/tmp/arcade")),
            ..Settings::default()
        };
        assert_eq!(settings.log_path(), PathBuf::from("/tmp/arcade").join(LOG_FILE));
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = Settings {
            leaderboard_path: Some(PathBuf::from("board.json")),
            flappy_difficulty: Difficulty::Easy,
            ..Settings::default()
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        assert!(text.contains("flappy_difficulty = \"easy\""));
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
