//! Interactive text interface for the game session.
//!
//! The session loop talks to the player through the [`Console`] trait so
//! it can be driven by a scripted implementation in tests. The production
//! [`TerminalConsole`] wraps stdin/stdout, clears the screen before each
//! render, and shows a short spinner while the opponent "thinks".

use std::{
    io::{BufRead, Write},
    thread,
    time::Duration,
};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Result,
    board::{Board, Player},
    history::FirstMover,
};

/// How long the opponent pretends to think before moving
const THINKING_PAUSE: Duration = Duration::from_secs(1);

/// Interface between the session loop and the player.
///
/// Implementations are responsible for producing validated answers: move
/// prompts return an integer in `[0, 8]` (occupied cells are re-prompted
/// by the session, which owns the board).
pub trait Console {
    /// Render the board, replacing any previous render
    fn show_board(&mut self, board: &Board) -> Result<()>;

    /// Print an informational line
    fn announce(&mut self, message: &str) -> Result<()>;

    /// Ask who makes the first move of the game
    fn prompt_first_mover(&mut self) -> Result<FirstMover>;

    /// Ask which symbol the human plays
    fn prompt_user_symbol(&mut self) -> Result<Player>;

    /// Ask for the human's move index, re-prompting until a number in
    /// `[0, 8]` is supplied
    fn prompt_user_move(&mut self, symbol: Player) -> Result<usize>;

    /// Ask whether to play another game
    fn prompt_play_again(&mut self) -> Result<bool>;

    /// Signal the opponent's turn (the terminal shows a thinking pause)
    fn opponent_thinking(&mut self, symbol: Player) -> Result<()>;
}

/// Production console on stdin/stdout.
pub struct TerminalConsole {
    stdin: std::io::Stdin,
    stdout: std::io::Stdout,
}

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole {
            stdin: std::io::stdin(),
            stdout: std::io::stdout(),
        }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.stdin
            .lock()
            .read_line(&mut line)
            .map_err(|source| crate::Error::Io {
                operation: "read line from stdin".to_string(),
                source,
            })?;
        Ok(line.trim().to_string())
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.stdout, "{text}").and_then(|_| self.stdout.flush()).map_err(|source| {
            crate::Error::Io {
                operation: "write prompt to stdout".to_string(),
                source,
            }
        })?;
        self.read_line()
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn show_board(&mut self, board: &Board) -> Result<()> {
        execute!(self.stdout, Clear(ClearType::All), MoveTo(0, 0)).map_err(|source| {
            crate::Error::Io {
                operation: "clear terminal".to_string(),
                source,
            }
        })?;

        println!("\n--- Tic-Tac-Toe ---");
        for row in 0..3 {
            let base = row * 3;
            println!("  {} | {} | {}", base, base + 1, base + 2);
            println!(
                "  {} | {} | {}",
                board.get(base).to_char(),
                board.get(base + 1).to_char(),
                board.get(base + 2).to_char()
            );
            if row < 2 {
                println!(" ---+---+---");
            }
        }
        println!("--------------------\n");
        Ok(())
    }

    fn announce(&mut self, message: &str) -> Result<()> {
        println!("{message}");
        Ok(())
    }

    fn prompt_first_mover(&mut self) -> Result<FirstMover> {
        loop {
            let answer = self
                .prompt("Who moves first? (you/opponent): ")?
                .to_lowercase();
            match answer.as_str() {
                "you" | "me" | "user" => return Ok(FirstMover::User),
                "opponent" | "machine" => return Ok(FirstMover::Opponent),
                _ => println!("Please answer 'you' or 'opponent'."),
            }
        }
    }

    fn prompt_user_symbol(&mut self) -> Result<Player> {
        loop {
            let answer = self.prompt("Which symbol do you want? (X/O): ")?.to_uppercase();
            match answer.as_str() {
                "X" => return Ok(Player::X),
                "O" => return Ok(Player::O),
                _ => println!("Please choose 'X' or 'O'."),
            }
        }
    }

    fn prompt_user_move(&mut self, symbol: Player) -> Result<usize> {
        loop {
            let answer = self.prompt(&format!("Your turn ({symbol}). Enter a cell (0-8): "))?;
            match answer.parse::<usize>() {
                Ok(pos) if pos <= 8 => return Ok(pos),
                _ => println!("Invalid input. Please enter a number between 0 and 8."),
            }
        }
    }

    fn prompt_play_again(&mut self) -> Result<bool> {
        let answer = self.prompt("Play again? (yes/no): ")?.to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    fn opponent_thinking(&mut self, symbol: Player) -> Result<()> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Invalid spinner template"),
        );
        spinner.set_message(format!("Opponent ({symbol}) is thinking..."));
        spinner.enable_steady_tick(Duration::from_millis(80));
        thread::sleep(THINKING_PAUSE);
        spinner.finish_and_clear();
        Ok(())
    }
}
