//! Opponent move selection and the win-only learning rule.
//!
//! The opponent consults the knowledge base for the exact current board
//! state. A memorized move is used only when it is still valid on the
//! live board; otherwise selection falls back to a uniform choice among
//! the empty cells. Every choice is appended to a per-game trail, and the
//! trail is committed to the knowledge base only when the opponent wins.

use rand::{SeedableRng, prelude::IndexedRandom, rngs::StdRng};
use tracing::debug;

use crate::{
    board::{Board, BoardKey},
    history::GameOutcome,
    knowledge::KnowledgeBase,
};

/// The scripted opponent.
///
/// Owns the per-game `(state, move)` trail and a seedable RNG for the
/// random fallback.
pub struct OpponentPolicy {
    trail: Vec<(BoardKey, usize)>,
    rng: StdRng,
}

impl std::fmt::Debug for OpponentPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpponentPolicy")
            .field("trail_len", &self.trail.len())
            .finish()
    }
}

impl OpponentPolicy {
    /// Create a policy with a randomly seeded RNG
    pub fn new() -> Self {
        Self::with_seed(rand::random::<u64>())
    }

    /// Create a policy with a fixed seed for reproducible games
    pub fn with_seed(seed: u64) -> Self {
        OpponentPolicy {
            trail: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick the opponent's move for the current board.
    ///
    /// Uses the knowledge base recommendation for the exact board state
    /// when it exists and is still playable, otherwise a uniform random
    /// empty cell. The `(state, move)` pair is appended to the trail.
    /// The board itself is never mutated here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if the board has no empty cell.
    /// The session checks win/draw before every opponent turn, so hitting
    /// this indicates a caller-ordering bug rather than a game state.
    ///
    /// [`Error::NoValidMoves`]: crate::Error::NoValidMoves
    pub fn choose_move(
        &mut self,
        board: &Board,
        kb: &KnowledgeBase,
    ) -> Result<usize, crate::Error> {
        let key = board.encode();

        let mv = match kb.lookup(&key) {
            Some(recommended) if board.is_valid_move(recommended) => {
                debug!(state = %key, position = recommended, "playing memorized move");
                recommended
            }
            _ => {
                let empty = board.empty_positions();
                *empty.choose(&mut self.rng).ok_or(crate::Error::NoValidMoves)?
            }
        };

        self.trail.push((key, mv));
        Ok(mv)
    }

    /// Clear the per-game trail at the start of a new game
    pub fn reset_trail(&mut self) {
        self.trail.clear();
    }

    /// The `(state, move)` pairs recorded so far this game
    pub fn trail(&self) -> &[(BoardKey, usize)] {
        &self.trail
    }

    /// Consume the trail at game end.
    ///
    /// On an opponent win every trail pair is recorded into the knowledge
    /// base (first-write-wins, so states seen in earlier wins keep their
    /// original move). Losses and draws leave the knowledge base
    /// untouched. The trail is drained either way.
    ///
    /// # Errors
    ///
    /// Propagates knowledge base recording errors; the trail only holds
    /// moves the board accepted, so this does not happen in practice.
    pub fn finish_game(
        &mut self,
        outcome: GameOutcome,
        kb: &mut KnowledgeBase,
    ) -> Result<(), crate::Error> {
        if outcome == GameOutcome::OpponentWin {
            debug!(moves = self.trail.len(), "opponent won, memorizing trail");
            for (key, mv) in self.trail.drain(..) {
                kb.record(key, mv)?;
            }
        } else {
            self.trail.clear();
        }
        Ok(())
    }
}

impl Default for OpponentPolicy {
    fn default() -> Self {
        Self::new()
    }
}
