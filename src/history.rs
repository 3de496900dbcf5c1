//! Game history: an append-only log of completed-game records.

use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{board::Player, ports::HistoryRepository};

/// Default history filename in the working directory
pub const DEFAULT_HISTORY_FILE: &str = "game_history.json";

/// Who made the first move of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstMover {
    User,
    Opponent,
}

/// Final outcome of a game, from the session's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    #[serde(rename = "user")]
    UserWin,
    #[serde(rename = "opponent")]
    OpponentWin,
    #[serde(rename = "draw")]
    Draw,
}

/// Immutable summary of one completed game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub timestamp: String,
    pub user_symbol: Player,
    pub opponent_symbol: Player,
    pub first_to_move: FirstMover,
    pub outcome: GameOutcome,
    /// Human-readable move descriptions in play order
    pub moves: Vec<String>,
}

impl GameRecord {
    /// Build a record for a game that just finished, timestamped now
    pub fn new(
        user_symbol: Player,
        first_to_move: FirstMover,
        outcome: GameOutcome,
        moves: Vec<String>,
    ) -> Self {
        GameRecord {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            user_symbol,
            opponent_symbol: user_symbol.opponent(),
            first_to_move,
            outcome,
            moves,
        }
    }
}

/// Ordered log of completed games.
///
/// Persisted as a JSON array of [`GameRecord`] objects. Appends only;
/// records are never rewritten or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameHistory {
    records: Vec<GameRecord>,
}

impl GameHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from raw JSON array elements, dropping any that
    /// fail to deserialize as a [`GameRecord`].
    pub fn from_raw(raw: Vec<Value>) -> Self {
        let mut records = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<GameRecord>(value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(index, error = %e, "dropping malformed history record");
                }
            }
        }
        GameHistory { records }
    }

    /// Append one record to the end of the log
    pub fn append(&mut self, record: GameRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Load the history, degrading to empty on any failure.
    ///
    /// Same contract as the knowledge base: a missing file is the normal
    /// first run, anything else logs a warning, and the caller always
    /// receives a usable log.
    pub fn load_or_empty<R: HistoryRepository>(repo: &R, path: &Path) -> Self {
        match repo.load(path) {
            Ok(history) => {
                debug!(path = %path.display(), games = history.len(), "game history loaded");
                history
            }
            Err(crate::Error::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                info!(path = %path.display(), "game history not found, starting empty");
                Self::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load game history, starting empty");
                Self::new()
            }
        }
    }
}
