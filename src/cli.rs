//! Command-line interface for the console demo.

use clap::Parser;
use tictactoe_arena::Difficulty;

/// Tic-tac-toe against the computer, first to five wins takes the round.
#[derive(Parser, Debug)]
#[command(name = "tictactoe_arena")]
#[command(about = "Play tic-tac-toe against a computer opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Opponent difficulty
    #[arg(short, long, value_enum, default_value_t = Difficulty::Hard)]
    pub difficulty: Difficulty,

    /// Seed for the opponent's random choices (reproducible games)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Emit engine events as JSON lines instead of formatted text
    #[arg(long)]
    pub json: bool,
}
