//! Knowledge base: the opponent's persistent move memo table.
//!
//! Maps exact board states (canonical 9-character keys) to the move the
//! opponent played from that state in a game it went on to win. The table
//! is strictly first-write-wins: once a state has a recommendation it is
//! never overwritten, and losses and draws never touch it.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{board::BoardKey, ports::KnowledgeRepository};

/// Default knowledge base filename in the working directory
pub const DEFAULT_KB_FILE: &str = "tic_tac_toe_kb.json";

/// Memo table from board keys to recommended move indices.
///
/// Persisted as a flat JSON object mapping 9-character board strings to
/// integers in `[0, 8]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    entries: BTreeMap<BoardKey, u8>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a knowledge base from raw JSON object entries, dropping any
    /// that fail schema validation (bad key or out-of-range move index).
    ///
    /// Invalid entries are logged and skipped so a partially corrupted
    /// file still yields its valid portion.
    pub fn from_raw(raw: serde_json::Map<String, Value>) -> Self {
        let mut entries = BTreeMap::new();
        for (key, value) in raw {
            let board_key = match BoardKey::parse(&key) {
                Ok(k) => k,
                Err(e) => {
                    warn!(key = %key, error = %e, "dropping knowledge entry with invalid key");
                    continue;
                }
            };
            let mv = match value.as_u64() {
                Some(mv) if mv <= 8 => mv as u8,
                _ => {
                    warn!(key = %key, value = %value, "dropping knowledge entry with invalid move index");
                    continue;
                }
            };
            entries.insert(board_key, mv);
        }
        KnowledgeBase { entries }
    }

    /// Get the recommended move for a board state, if one was memorized
    pub fn lookup(&self, key: &BoardKey) -> Option<usize> {
        self.entries.get(key).map(|&mv| mv as usize)
    }

    /// Memorize a move for a board state.
    ///
    /// First-write-wins: if the key is already present the call is a
    /// no-op, leaving the originally recorded move unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `mv` is outside `[0, 8]`.
    pub fn record(&mut self, key: BoardKey, mv: usize) -> Result<(), crate::Error> {
        if mv > 8 {
            return Err(crate::Error::InvalidMoveIndex { value: mv as u64 });
        }
        self.entries.entry(key).or_insert(mv as u8);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&BoardKey, usize)> {
        self.entries.iter().map(|(k, &mv)| (k, mv as usize))
    }

    /// Load the knowledge base, degrading to empty on any failure.
    ///
    /// A missing file is the normal first-run case and logs at info;
    /// malformed content or I/O failures log at warn. The caller always
    /// receives a usable table.
    pub fn load_or_empty<R: KnowledgeRepository>(repo: &R, path: &Path) -> Self {
        match repo.load(path) {
            Ok(kb) => {
                debug!(path = %path.display(), entries = kb.len(), "knowledge base loaded");
                kb
            }
            Err(crate::Error::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                info!(path = %path.display(), "knowledge base not found, starting empty");
                Self::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load knowledge base, starting empty");
                Self::new()
            }
        }
    }
}
