//! Session controller: drives games, learning, and store persistence.
//!
//! The session owns the single board, the opponent policy, and both
//! stores for the process lifetime. Stores are loaded once at startup and
//! saved after every completed game; save failures are logged and the
//! session keeps going.

use std::path::PathBuf;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{info, warn};

use crate::{
    Result,
    board::{Board, Player},
    console::Console,
    history::{FirstMover, GameHistory, GameOutcome, GameRecord},
    knowledge::KnowledgeBase,
    policy::OpponentPolicy,
    ports::{HistoryRepository, KnowledgeRepository},
};

/// File locations and seeding for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Knowledge base file path
    pub kb_path: PathBuf,
    /// Game history file path
    pub history_path: PathBuf,
    /// Seed for the opponent's RNG and the symbol coin flip
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            kb_path: PathBuf::from(crate::knowledge::DEFAULT_KB_FILE),
            history_path: PathBuf::from(crate::history::DEFAULT_HISTORY_FILE),
            seed: None,
        }
    }
}

/// One interactive session: a sequence of games against the opponent.
pub struct Session<C, R>
where
    C: Console,
    R: KnowledgeRepository + HistoryRepository,
{
    console: C,
    repo: R,
    config: SessionConfig,
    board: Board,
    policy: OpponentPolicy,
    kb: KnowledgeBase,
    history: GameHistory,
    rng: StdRng,
}

impl<C, R> Session<C, R>
where
    C: Console,
    R: KnowledgeRepository + HistoryRepository,
{
    /// Create a session, loading both stores with graceful degradation.
    pub fn new(console: C, repo: R, config: SessionConfig) -> Self {
        let kb = KnowledgeBase::load_or_empty(&repo, &config.kb_path);
        let history = GameHistory::load_or_empty(&repo, &config.history_path);

        let seed = config.seed.unwrap_or_else(rand::random);
        Session {
            console,
            repo,
            config,
            board: Board::new(),
            policy: OpponentPolicy::with_seed(seed),
            kb,
            history,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The loaded knowledge base
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// The loaded game history
    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    /// Play games until the player declines another round.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.play_one_game()?;
            if !self.console.prompt_play_again()? {
                break;
            }
        }
        self.console.announce(
            "Thanks for playing! The knowledge base and game history have been updated.",
        )?;
        Ok(())
    }

    /// Play a single game from setup to persistence.
    ///
    /// Returns the outcome, mostly for tests.
    pub fn play_one_game(&mut self) -> Result<GameOutcome> {
        self.board.reset();
        self.policy.reset_trail();

        let first_to_move = self.console.prompt_first_mover()?;
        let user_symbol = match first_to_move {
            FirstMover::User => {
                let symbol = self.console.prompt_user_symbol()?;
                self.console.announce(&format!("You start ({symbol})!"))?;
                symbol
            }
            FirstMover::Opponent => {
                // The opponent opens with a random symbol, as the player
                // never chose one.
                let opponent_symbol = if self.rng.random::<bool>() {
                    Player::X
                } else {
                    Player::O
                };
                let symbol = opponent_symbol.opponent();
                self.console
                    .announce(&format!("The opponent starts ({opponent_symbol})!"))?;
                self.console.announce(&format!("Your symbol is {symbol}."))?;
                symbol
            }
        };
        let opponent_symbol = user_symbol.opponent();

        let mut mover = match first_to_move {
            FirstMover::User => user_symbol,
            FirstMover::Opponent => opponent_symbol,
        };
        let mut move_log = Vec::new();

        let outcome = loop {
            self.console.show_board(&self.board)?;

            if mover == user_symbol {
                loop {
                    let pos = self.console.prompt_user_move(user_symbol)?;
                    match self.board.make_move(pos, mover) {
                        Ok(()) => {
                            move_log.push(format!("User({user_symbol}) played {pos}"));
                            break;
                        }
                        Err(crate::Error::InvalidMove { .. }) => {
                            self.console.announce(
                                "Invalid move. That cell is occupied or out of range. Try again.",
                            )?;
                        }
                        Err(e) => return Err(e),
                    }
                }
            } else {
                self.console.opponent_thinking(opponent_symbol)?;
                let pos = self.policy.choose_move(&self.board, &self.kb)?;
                self.board.make_move(pos, mover)?;
                move_log.push(format!("Opponent({opponent_symbol}) played {pos}"));
            }

            // Win must be checked before draw: a full board whose last
            // move completed a line is a win.
            if self.board.check_win(mover) {
                break if mover == user_symbol {
                    GameOutcome::UserWin
                } else {
                    GameOutcome::OpponentWin
                };
            }
            if self.board.check_draw() {
                break GameOutcome::Draw;
            }

            mover = mover.opponent();
        };

        self.console.show_board(&self.board)?;
        match outcome {
            GameOutcome::UserWin => {
                self.console
                    .announce(&format!("{user_symbol} has won. Congratulations!"))?;
            }
            GameOutcome::OpponentWin => {
                self.console.announce(&format!(
                    "{opponent_symbol} has won. The opponent is memorizing its moves..."
                ))?;
            }
            GameOutcome::Draw => {
                self.console.announce("It's a draw!")?;
            }
        }

        self.policy.finish_game(outcome, &mut self.kb)?;
        self.history.append(GameRecord::new(
            user_symbol,
            first_to_move,
            outcome,
            move_log,
        ));
        self.save_stores()?;

        info!(?outcome, kb_entries = self.kb.len(), games = self.history.len(), "game finished");
        Ok(outcome)
    }

    /// Save both stores, logging failures without aborting the session.
    fn save_stores(&mut self) -> Result<()> {
        if let Err(e) = KnowledgeRepository::save(&self.repo, &self.kb, &self.config.kb_path) {
            warn!(path = %self.config.kb_path.display(), error = %e, "failed to save knowledge base");
            self.console
                .announce("Warning: the knowledge base could not be saved.")?;
        }
        if let Err(e) =
            HistoryRepository::save(&self.repo, &self.history, &self.config.history_path)
        {
            warn!(path = %self.config.history_path.display(), error = %e, "failed to save game history");
            self.console
                .announce("Warning: the game history could not be saved.")?;
        }
        Ok(())
    }
}
