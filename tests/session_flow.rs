//! End-to-end session tests with a scripted console
//! Drives full games through the session controller and checks the
//! learning rule, record keeping, and store persistence

use std::path::{Path, PathBuf};

use rote::{
    Board, BoardKey, GameHistory, GameOutcome, KnowledgeBase, Player, Session, SessionConfig,
    adapters::InMemoryRepository,
    console::Console,
    history::FirstMover,
    ports::{HistoryRepository, KnowledgeRepository},
};

/// Console that answers prompts from a fixed script.
///
/// Move prompts cycle through `moves`, so a script of `0..9` acts as a
/// "first available cell" player: the session re-prompts on occupied
/// cells and the cycle always reaches an empty one.
struct ScriptedConsole {
    first_mover: FirstMover,
    user_symbol: Player,
    moves: Vec<usize>,
    cursor: usize,
}

impl ScriptedConsole {
    fn new(first_mover: FirstMover, user_symbol: Player, moves: Vec<usize>) -> Self {
        ScriptedConsole {
            first_mover,
            user_symbol,
            moves,
            cursor: 0,
        }
    }
}

impl Console for ScriptedConsole {
    fn show_board(&mut self, _board: &Board) -> rote::Result<()> {
        Ok(())
    }

    fn announce(&mut self, _message: &str) -> rote::Result<()> {
        Ok(())
    }

    fn prompt_first_mover(&mut self) -> rote::Result<FirstMover> {
        Ok(self.first_mover)
    }

    fn prompt_user_symbol(&mut self) -> rote::Result<Player> {
        Ok(self.user_symbol)
    }

    fn prompt_user_move(&mut self, _symbol: Player) -> rote::Result<usize> {
        let mv = self.moves[self.cursor % self.moves.len()];
        self.cursor += 1;
        Ok(mv)
    }

    fn prompt_play_again(&mut self) -> rote::Result<bool> {
        Ok(false)
    }

    fn opponent_thinking(&mut self, _symbol: Player) -> rote::Result<()> {
        Ok(())
    }
}

fn key(s: &str) -> BoardKey {
    BoardKey::parse(s).unwrap()
}

fn config() -> SessionConfig {
    SessionConfig {
        kb_path: PathBuf::from("kb.json"),
        history_path: PathBuf::from("history.json"),
        seed: Some(42),
    }
}

/// Seed the repository with a knowledge base so the opponent plays a
/// fully scripted, deterministic game.
fn preload_kb(repo: &InMemoryRepository, entries: &[(&str, usize)]) {
    let mut kb = KnowledgeBase::new();
    for &(state, mv) in entries {
        kb.record(key(state), mv).unwrap();
    }
    KnowledgeRepository::save(repo, &kb, Path::new("kb.json")).unwrap();
}

#[test]
fn user_win_is_recorded_and_does_not_teach_the_opponent() {
    let repo = InMemoryRepository::new();
    // Steer the opponent away from blocking the left column
    preload_kb(&repo, &[("X________", 1), ("XO_X_____", 2)]);

    let console = ScriptedConsole::new(FirstMover::User, Player::X, vec![0, 3, 6]);
    let mut session = Session::new(console, repo.clone(), config());

    let outcome = session.play_one_game().unwrap();
    assert_eq!(outcome, GameOutcome::UserWin);

    // The opponent lost, so the knowledge base is exactly as preloaded
    assert_eq!(session.knowledge_base().len(), 2);
    assert_eq!(session.knowledge_base().lookup(&key("X________")), Some(1));

    let record = &session.history().records()[0];
    assert_eq!(record.outcome, GameOutcome::UserWin);
    assert_eq!(record.user_symbol, Player::X);
    assert_eq!(record.opponent_symbol, Player::O);
    assert_eq!(record.first_to_move, FirstMover::User);
    assert_eq!(record.moves.len(), 5);
    assert_eq!(record.moves[0], "User(X) played 0");
    assert_eq!(record.moves[1], "Opponent(O) played 1");

    // Both stores were saved after the game
    assert!(repo.contains(Path::new("kb.json")));
    assert!(repo.contains(Path::new("history.json")));
}

#[test]
fn opponent_win_is_recorded_and_trail_is_committed() {
    let repo = InMemoryRepository::new();
    // Scripted opponent path to the 2-4-6 diagonal
    preload_kb(
        &repo,
        &[("X________", 4), ("X___O___X", 2), ("X_O_O__XX", 6)],
    );

    let console = ScriptedConsole::new(FirstMover::User, Player::X, vec![0, 8, 7]);
    let mut session = Session::new(console, repo.clone(), config());

    let outcome = session.play_one_game().unwrap();
    assert_eq!(outcome, GameOutcome::OpponentWin);

    // The trail states match the preloaded keys, and first-write-wins
    // keeps the original values
    let kb = session.knowledge_base();
    assert_eq!(kb.len(), 3);
    assert_eq!(kb.lookup(&key("X________")), Some(4));
    assert_eq!(kb.lookup(&key("X___O___X")), Some(2));
    assert_eq!(kb.lookup(&key("X_O_O__XX")), Some(6));

    let record = &session.history().records()[0];
    assert_eq!(record.outcome, GameOutcome::OpponentWin);
    assert_eq!(record.moves.last().unwrap(), "Opponent(O) played 6");

    // The persisted knowledge base matches the in-memory one
    let saved = KnowledgeRepository::load(&repo, Path::new("kb.json")).unwrap();
    assert_eq!(&saved, session.knowledge_base());
}

#[test]
fn draw_is_recorded_and_does_not_teach_the_opponent() {
    let repo = InMemoryRepository::new();
    // Scripted opponent path to a full board with no line
    preload_kb(
        &repo,
        &[
            ("X________", 1),
            ("XOX______", 4),
            ("XOXXO____", 5),
            ("XOXXOO_X_", 6),
        ],
    );

    let console = ScriptedConsole::new(FirstMover::User, Player::X, vec![0, 2, 3, 7, 8]);
    let mut session = Session::new(console, repo.clone(), config());

    let outcome = session.play_one_game().unwrap();
    assert_eq!(outcome, GameOutcome::Draw);

    assert_eq!(session.knowledge_base().len(), 4);

    let record = &session.history().records()[0];
    assert_eq!(record.outcome, GameOutcome::Draw);
    assert_eq!(record.moves.len(), 9);
}

#[test]
fn opponent_first_game_opens_with_opponent_and_is_recorded() {
    let repo = InMemoryRepository::new();
    // The symbol prompt is never reached: the opponent opens with a
    // randomly assigned symbol and the user gets the other one
    let console = ScriptedConsole::new(FirstMover::Opponent, Player::X, (0..9).collect());
    let mut session = Session::new(console, repo.clone(), config());

    let outcome = session.play_one_game().unwrap();

    let record = &session.history().records()[0];
    assert_eq!(record.first_to_move, FirstMover::Opponent);
    assert_eq!(record.opponent_symbol, record.user_symbol.opponent());
    assert_eq!(record.outcome, outcome);

    // The opponent made the opening move and the game ran to completion
    assert!(record.moves[0].starts_with(&format!("Opponent({})", record.opponent_symbol)));
    assert!((5..=9).contains(&record.moves.len()));
    assert!(repo.contains(Path::new("history.json")));
}

#[test]
fn knowledge_base_grows_only_on_opponent_wins() {
    let repo = InMemoryRepository::new();
    // "First available cell" player against the random opponent
    let console = ScriptedConsole::new(FirstMover::User, Player::X, (0..9).collect());
    let mut session = Session::new(console, repo.clone(), config());

    let mut kb_len = session.knowledge_base().len();
    for _ in 0..100 {
        let outcome = session.play_one_game().unwrap();
        let after = session.knowledge_base().len();
        match outcome {
            GameOutcome::OpponentWin => assert!(after >= kb_len),
            _ => assert_eq!(after, kb_len, "KB changed after {outcome:?}"),
        }
        kb_len = after;
    }

    assert_eq!(session.history().len(), 100);

    // Every completed game was persisted
    let saved = HistoryRepository::load(&repo, Path::new("history.json")).unwrap();
    assert_eq!(saved.len(), 100);
}

#[test]
fn session_starts_empty_with_fresh_repository() {
    let repo = InMemoryRepository::new();
    let console = ScriptedConsole::new(FirstMover::User, Player::X, vec![0]);
    let session = Session::new(console, repo, config());

    assert!(session.knowledge_base().is_empty());
    assert!(session.history().is_empty());
}

/// Repository whose saves always fail, to exercise the non-fatal save path.
#[derive(Clone)]
struct FailingRepository;

impl KnowledgeRepository for FailingRepository {
    fn save(&self, _kb: &KnowledgeBase, _path: &Path) -> rote::Result<()> {
        Err(rote::Error::Io {
            operation: "save knowledge base".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn load(&self, _path: &Path) -> rote::Result<KnowledgeBase> {
        Err(rote::Error::Io {
            operation: "load knowledge base".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        })
    }
}

impl HistoryRepository for FailingRepository {
    fn save(&self, _history: &GameHistory, _path: &Path) -> rote::Result<()> {
        Err(rote::Error::Io {
            operation: "save game history".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn load(&self, _path: &Path) -> rote::Result<GameHistory> {
        Err(rote::Error::Io {
            operation: "load game history".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        })
    }
}

#[test]
fn save_failures_are_non_fatal() {
    let console = ScriptedConsole::new(FirstMover::User, Player::X, (0..9).collect());
    let mut session = Session::new(console, FailingRepository, config());

    // The game completes and is recorded in memory even though both
    // saves fail
    session.play_one_game().unwrap();
    assert_eq!(session.history().len(), 1);
}
