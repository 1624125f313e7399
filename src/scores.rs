//! Local high scores and the player profile.
//!
//! Everything lives in a string key-value store shaped like browser local
//! storage: each game mode keeps a JSON array of its top ten entries under
//! `arcade_<mode>_scores`, and the player name sits under `arcade_username`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::games::GameMode;

pub const MAX_ENTRIES: usize = 10;
pub const DEFAULT_USERNAME: &str = "Player";
pub const USERNAME_KEY: &str = "arcade_username";
pub const MAX_USERNAME_CHARS: usize = 50;

/// Keys written by older snake builds, merged into the current layout once.
const LEGACY_KEYS: [(&str, GameMode); 2] = [
    ("snakeHighScores", GameMode::SnakeClassic),
    ("snakePowerUpHighScores", GameMode::SnakePowerUp),
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// All keys in one JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub const FILE_NAME: &'static str = "pocketcade-store.json";

    /// Open the store in `dir`. A missing file starts empty; an unreadable
    /// one is logged and replaced on the next write.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(Self::FILE_NAME);
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(values) => {
                    log::info!("loaded {} keys from {}", values.len(), path.display());
                    values
                }
                Err(e) => {
                    log::warn!("ignoring corrupt store {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("cannot read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.values).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ScoreEntry {
    pub fn new(username: impl Into<String>, score: u32) -> Self {
        Self {
            username: username.into(),
            score,
            timestamp: Some(Utc::now()),
        }
    }

    pub fn date_label(&self) -> String {
        self.timestamp
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Any shape a score has been stored in: a bare number from old builds, or
/// an object whose time field may be `timestamp` or `date`.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Bare(f64),
    Full {
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        score: f64,
        #[serde(default, alias = "date")]
        timestamp: Option<String>,
    },
}

impl From<StoredEntry> for ScoreEntry {
    fn from(stored: StoredEntry) -> Self {
        match stored {
            StoredEntry::Bare(score) => ScoreEntry {
                username: DEFAULT_USERNAME.to_string(),
                score: score as u32,
                timestamp: None,
            },
            StoredEntry::Full {
                username,
                score,
                timestamp,
            } => ScoreEntry {
                username: username
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
                score: score as u32,
                timestamp: timestamp
                    .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
                    .map(|t| t.with_timezone(&Utc)),
            },
        }
    }
}

/// Read a stored list. Elements that are not a score are dropped one by
/// one; anything that is not a list reads as empty.
fn parse_entries(key: &str, text: &str) -> Vec<ScoreEntry> {
    let values = match serde_json::from_str::<Vec<serde_json::Value>>(text) {
        Ok(values) => values,
        Err(e) => {
            log::warn!("discarding unreadable scores under {key}: {e}");
            return Vec::new();
        }
    };
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<StoredEntry>(value) {
            Ok(stored) => Some(ScoreEntry::from(stored)),
            Err(e) => {
                log::warn!("skipping malformed score under {key}: {e}");
                None
            }
        })
        .collect()
}

fn sort_and_trim(entries: &mut Vec<ScoreEntry>) {
    // Stable, so an equal score ranks below the one already there.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);
}

pub fn scores_key(mode: GameMode) -> String {
    format!("arcade_{}_scores", mode.key())
}

pub struct HighScores<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HighScores<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Top entries for a mode, best first. Unreadable data reads as empty.
    pub fn load_scores(&self, mode: GameMode) -> Vec<ScoreEntry> {
        let key = scores_key(mode);
        let Some(text) = self.store.get(&key) else {
            return Vec::new();
        };
        let mut entries = parse_entries(&key, &text);
        sort_and_trim(&mut entries);
        entries
    }

    /// Record a score under the current username and return the new list.
    pub fn save_score(
        &mut self,
        mode: GameMode,
        score: u32,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        let entry = ScoreEntry::new(self.username(), score);
        self.insert(mode, vec![entry])
    }

    fn insert(
        &mut self,
        mode: GameMode,
        new: Vec<ScoreEntry>,
    ) -> Result<Vec<ScoreEntry>, StoreError> {
        let mut entries = self.load_scores(mode);
        entries.extend(new);
        sort_and_trim(&mut entries);

        let key = scores_key(mode);
        let text = serde_json::to_string(&entries).map_err(|source| StoreError::Encode {
            key: key.clone(),
            source,
        })?;
        self.store.set(&key, text)?;
        log::debug!("{} now holds {} scores", key, entries.len());
        Ok(entries)
    }

    pub fn best_entry(&self, mode: GameMode) -> Option<ScoreEntry> {
        self.load_scores(mode).into_iter().next()
    }

    pub fn best_score(&self, mode: GameMode) -> u32 {
        self.best_entry(mode).map(|e| e.score).unwrap_or(0)
    }

    /// Whether `score` would make the top ten. Zero never qualifies.
    pub fn qualifies(&self, mode: GameMode, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        let entries = self.load_scores(mode);
        entries.len() < MAX_ENTRIES || entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    pub fn username(&self) -> String {
        self.store
            .get(USERNAME_KEY)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string())
    }

    /// Store a trimmed name of at most 50 characters. A blank name is not
    /// stored and the default is returned.
    pub fn set_username(&mut self, name: &str) -> Result<String, StoreError> {
        let clean: String = name.trim().chars().take(MAX_USERNAME_CHARS).collect();
        let clean = clean.trim_end().to_string();
        if clean.is_empty() {
            return Ok(DEFAULT_USERNAME.to_string());
        }
        self.store.set(USERNAME_KEY, clean.clone())?;
        log::info!("username set to {clean}");
        Ok(clean)
    }

    pub fn has_username(&self) -> bool {
        self.store.get(USERNAME_KEY).is_some()
    }

    /// A stored display choice such as a colour theme.
    pub fn preference(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.store.set(key, value.to_string())?;
        log::debug!("{key} set to {value}");
        Ok(())
    }

    /// Fold scores from the old snake keys into their modes and delete the
    /// old keys. Returns how many entries were read.
    pub fn migrate_legacy(&mut self) -> Result<usize, StoreError> {
        let mut migrated = 0;
        for (legacy_key, mode) in LEGACY_KEYS {
            let Some(text) = self.store.get(legacy_key) else {
                continue;
            };
            let entries = parse_entries(legacy_key, &text);
            migrated += entries.len();
            if !entries.is_empty() {
                self.insert(mode, entries)?;
            }
            self.store.remove(legacy_key)?;
            log::info!("migrated {legacy_key} into {}", scores_key(mode));
        }
        Ok(migrated)
    }
}
