//! JSON file implementation of the repository ports.
//!
//! Writes the knowledge base as a pretty-printed JSON object and the game
//! history as a pretty-printed JSON array, matching the on-disk format the
//! session's files use. Loads go through the stores' `from_raw` builders
//! so individually malformed entries are dropped instead of failing the
//! whole file.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde_json::Value;

use crate::{
    Result,
    error::Error,
    history::GameHistory,
    knowledge::KnowledgeBase,
    ports::{HistoryRepository, KnowledgeRepository},
};

/// JSON-file-backed repository for both stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    /// Create a new JSON file repository.
    pub fn new() -> Self {
        Self
    }

    fn create_writer(path: &Path) -> Result<BufWriter<File>> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        Ok(BufWriter::new(file))
    }

    fn open_reader(path: &Path) -> Result<BufReader<File>> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        Ok(BufReader::new(file))
    }

    fn flush(mut writer: BufWriter<File>, path: &Path) -> Result<()> {
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })
    }
}

impl KnowledgeRepository for JsonFileRepository {
    fn save(&self, kb: &KnowledgeBase, path: &Path) -> Result<()> {
        let mut writer = Self::create_writer(path)?;
        serde_json::to_writer_pretty(&mut writer, kb)?;
        Self::flush(writer, path)
    }

    fn load(&self, path: &Path) -> Result<KnowledgeBase> {
        let reader = Self::open_reader(path)?;
        let raw: serde_json::Map<String, Value> = serde_json::from_reader(reader)?;
        Ok(KnowledgeBase::from_raw(raw))
    }
}

impl HistoryRepository for JsonFileRepository {
    fn save(&self, history: &GameHistory, path: &Path) -> Result<()> {
        let mut writer = Self::create_writer(path)?;
        serde_json::to_writer_pretty(&mut writer, history)?;
        Self::flush(writer, path)
    }

    fn load(&self, path: &Path) -> Result<GameHistory> {
        let reader = Self::open_reader(path)?;
        let raw: Vec<Value> = serde_json::from_reader(reader)?;
        Ok(GameHistory::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::board::BoardKey;

    #[test]
    fn test_knowledge_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("kb.json");

        let repo = JsonFileRepository::new();
        let mut kb = KnowledgeBase::new();
        kb.record(BoardKey::parse("_________").unwrap(), 4).unwrap();
        kb.record(BoardKey::parse("X___O____").unwrap(), 0).unwrap();

        KnowledgeRepository::save(&repo, &kb, &file_path).expect("Failed to save");
        let loaded = KnowledgeRepository::load(&repo, &file_path).expect("Failed to load");

        assert_eq!(loaded, kb);
    }

    #[test]
    fn test_knowledge_file_is_pretty_printed_object() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("kb.json");

        let repo = JsonFileRepository::new();
        let mut kb = KnowledgeBase::new();
        kb.record(BoardKey::parse("_________").unwrap(), 4).unwrap();
        KnowledgeRepository::save(&repo, &kb, &file_path).unwrap();

        let contents = std::fs::read_to_string(&file_path).unwrap();
        assert!(contents.contains("\"_________\": 4"));
        assert!(contents.contains('\n'), "expected indented output");
    }

    #[test]
    fn test_history_roundtrip() {
        use crate::{
            board::Player,
            history::{FirstMover, GameOutcome, GameRecord},
        };

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("history.json");

        let repo = JsonFileRepository::new();
        let mut history = GameHistory::new();
        history.append(GameRecord::new(
            Player::X,
            FirstMover::Opponent,
            GameOutcome::OpponentWin,
            vec!["Opponent(O) played 4".to_string()],
        ));

        HistoryRepository::save(&repo, &history, &file_path).unwrap();
        let loaded = HistoryRepository::load(&repo, &file_path).unwrap();

        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = JsonFileRepository::new();
        let result = KnowledgeRepository::load(&repo, Path::new("/tmp/nonexistent_12345.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed_json_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("kb.json");
        std::fs::write(&file_path, "{ not json").unwrap();

        let repo = JsonFileRepository::new();
        assert!(KnowledgeRepository::load(&repo, &file_path).is_err());
    }

    #[test]
    fn test_load_wrong_shape_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("kb.json");
        // An array where the knowledge base expects an object
        std::fs::write(&file_path, "[1, 2, 3]").unwrap();

        let repo = JsonFileRepository::new();
        assert!(KnowledgeRepository::load(&repo, &file_path).is_err());
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = JsonFileRepository::new();
        let kb = KnowledgeBase::new();
        let result = KnowledgeRepository::save(&repo, &kb, Path::new("/invalid_dir_12345/kb.json"));
        assert!(result.is_err());
    }
}
