//! Repository ports for store persistence.
//!
//! This module defines the trait boundary between the domain stores and the
//! storage layer. The production adapter writes pretty-printed JSON files;
//! tests use an in-memory implementation.

use std::path::Path;

use crate::{Result, history::GameHistory, knowledge::KnowledgeBase};

/// Port for persisting and loading the knowledge base.
///
/// Implementations decide the storage mechanism; the domain only sees
/// save/load by path.
pub trait KnowledgeRepository {
    /// Save the knowledge base to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization
    /// fails. Callers treat save failures as non-fatal.
    fn save(&self, kb: &KnowledgeBase, path: &Path) -> Result<()>;

    /// Load the knowledge base from persistent storage.
    ///
    /// Entries that fail schema validation (bad key, out-of-range move)
    /// are dropped rather than failing the load.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or not a JSON
    /// object. Callers degrade to an empty knowledge base on error.
    fn load(&self, path: &Path) -> Result<KnowledgeBase>;
}

/// Port for persisting and loading the game history.
pub trait HistoryRepository {
    /// Save the history to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be written or serialization
    /// fails. Callers treat save failures as non-fatal.
    fn save(&self, history: &GameHistory, path: &Path) -> Result<()>;

    /// Load the history from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or not a JSON
    /// array. Callers degrade to an empty history on error.
    fn load(&self, path: &Path) -> Result<GameHistory>;
}
