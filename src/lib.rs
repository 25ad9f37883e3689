//! Tic-tac-toe match engine with a computer opponent.
//!
//! The engine is split into three layers:
//!
//! - **Game**: pure board model, win/draw rules, and the three opponent
//!   policies (easy / medium / hard).
//! - **Session**: the round/match controller. Owns all mutable state and
//!   reports everything worth rendering as [`SessionEvent`]s.
//! - **Runtime**: a thin async wrapper that defers the computer's move by
//!   one second and clears transient messages, using tokio timers.
//!
//! A round is first-to-five game wins; taking a round wipes both game
//! scores while round tallies accumulate.
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_arena::{Difficulty, MatchRuntime, Position};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (runtime, mut events) = MatchRuntime::new(Difficulty::Hard);
//! runtime.human_move(Position::Center)?;
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod game;
mod runtime;
mod session;

pub use game::{
    Board, Difficulty, LINES, MoveError, Player, Position, Square, StrategyError, check_winner,
    choose_move, is_draw, winning_line,
};
pub use runtime::{GAME_OVER_MESSAGE_DURATION, MatchRuntime, THINKING_DELAY};
pub use session::{GameSession, MoveOutcome, ROUND_LIMIT, ScoreBoard, SessionEvent};
