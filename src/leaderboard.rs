//! Global leaderboard.
//!
//! Submissions and fetches run on a worker thread; the UI only ever sees
//! their outcome as a `Response` picked up by `poll`. The shipped backend is
//! a JSON file that several machines can share (e.g. over a network mount).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::games::GameMode;

/// Arcade-style initials.
pub const NAME_LEN: usize = 3;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard not configured")]
    NotConfigured,
    #[error("name is required")]
    EmptyName,
    #[error("invalid score")]
    InvalidScore,
    #[error("leaderboard worker stopped")]
    Disconnected,
    #[error("leaderboard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("leaderboard file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Trim, keep the first three characters and upper-case them.
pub fn normalize_name(name: &str) -> Result<String, LeaderboardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LeaderboardError::EmptyName);
    }
    Ok(trimmed.chars().take(NAME_LEN).collect::<String>().to_uppercase())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub game: String,
    pub created_at: DateTime<Utc>,
}

pub trait LeaderboardBackend: Send {
    fn submit(&mut self, entry: LeaderboardEntry) -> Result<(), LeaderboardError>;
    /// Best entries for `game`, highest first.
    fn fetch(&self, game: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

pub struct FileLeaderboard {
    path: PathBuf,
}

impl FileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(LeaderboardError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| LeaderboardError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl LeaderboardBackend for FileLeaderboard {
    fn submit(&mut self, entry: LeaderboardEntry) -> Result<(), LeaderboardError> {
        let mut all = self.read_all()?;
        all.push(entry);
        let text = serde_json::to_string_pretty(&all).map_err(|source| LeaderboardError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let io_err = |source| LeaderboardError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&self.path, text).map_err(io_err)
    }

    fn fetch(&self, game: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut entries: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.game == game)
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.created_at.cmp(&b.created_at)));
        entries.truncate(limit);
        Ok(entries)
    }
}

enum Request {
    Submit(GameMode, LeaderboardEntry),
    Fetch(GameMode, usize),
}

#[derive(Debug)]
pub enum Response {
    Submitted {
        mode: GameMode,
        name: String,
        score: u32,
    },
    Fetched {
        mode: GameMode,
        entries: Vec<LeaderboardEntry>,
    },
    Failed {
        mode: GameMode,
        error: LeaderboardError,
    },
}

/// Handle to the worker thread. A disabled client rejects every request
/// with `NotConfigured`.
pub struct LeaderboardClient {
    tx: Option<Sender<Request>>,
    rx: Option<Receiver<Response>>,
    handle: Option<JoinHandle<()>>,
}

impl LeaderboardClient {
    pub fn spawn<B: LeaderboardBackend + 'static>(mut backend: B) -> Self {
        let (tx, requests) = mpsc::channel::<Request>();
        let (responses, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            for request in requests {
                let response = match request {
                    Request::Submit(mode, entry) => {
                        let (name, score) = (entry.name.clone(), entry.score);
                        match backend.submit(entry) {
                            Ok(()) => {
                                log::info!(
                                    "leaderboard: {name} submitted {score} for {}",
                                    mode.key()
                                );
                                Response::Submitted { mode, name, score }
                            }
                            Err(error) => Response::Failed { mode, error },
                        }
                    }
                    Request::Fetch(mode, limit) => match backend.fetch(mode.key(), limit) {
                        Ok(entries) => Response::Fetched { mode, entries },
                        Err(error) => Response::Failed { mode, error },
                    },
                };
                if let Response::Failed { mode, error } = &response {
                    log::warn!("leaderboard request for {} failed: {error}", mode.key());
                }
                if responses.send(response).is_err() {
                    break;
                }
            }
        });

        Self {
            tx: Some(tx),
            rx: Some(rx),
            handle: Some(handle),
        }
    }

    pub fn disabled() -> Self {
        Self {
            tx: None,
            rx: None,
            handle: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.tx.is_some()
    }

    /// Validate and queue a submission. Validation errors come back
    /// immediately; backend errors arrive later through `poll`.
    pub fn submit(
        &self,
        mode: GameMode,
        name: &str,
        score: i64,
    ) -> Result<String, LeaderboardError> {
        let tx = self.tx.as_ref().ok_or(LeaderboardError::NotConfigured)?;
        let name = normalize_name(name)?;
        let score = u32::try_from(score).map_err(|_| LeaderboardError::InvalidScore)?;
        let entry = LeaderboardEntry {
            name: name.clone(),
            score,
            game: mode.key().to_string(),
            created_at: Utc::now(),
        };
        tx.send(Request::Submit(mode, entry))
            .map_err(|_| LeaderboardError::Disconnected)?;
        Ok(name)
    }

    pub fn fetch(&self, mode: GameMode, limit: usize) -> Result<(), LeaderboardError> {
        let tx = self.tx.as_ref().ok_or(LeaderboardError::NotConfigured)?;
        tx.send(Request::Fetch(mode, limit))
            .map_err(|_| LeaderboardError::Disconnected)
    }

    /// Responses that have arrived since the last call.
    pub fn poll(&self) -> Vec<Response> {
        match &self.rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        }
    }
}

impl Drop for LeaderboardClient {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
