//! Terminal tic-tac-toe against an opponent that learns by rote.
//!
//! This crate provides:
//! - A tic-tac-toe board engine with move validation and win/draw detection
//! - A knowledge base memoizing winning moves by exact board state,
//!   persisted as a human-readable JSON file
//! - An append-only game history persisted alongside it
//! - A scripted opponent that replays memorized moves and otherwise picks
//!   randomly among the empty cells
//! - A session controller driving interactive games on the terminal

pub mod adapters;
pub mod board;
pub mod console;
pub mod error;
pub mod history;
pub mod knowledge;
pub mod lines;
pub mod policy;
pub mod ports;
pub mod session;

pub use board::{Board, BoardKey, Cell, GameStatus, Player};
pub use error::{Error, Result};
pub use history::{FirstMover, GameHistory, GameOutcome, GameRecord};
pub use knowledge::KnowledgeBase;
pub use policy::OpponentPolicy;
pub use session::{Session, SessionConfig};
