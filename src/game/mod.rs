//! Pure game logic: board model, win/draw rules, opponent policies.

mod position;
mod rules;
mod strategy;
mod types;

pub use position::Position;
pub use rules::{LINES, check_winner, is_draw, winning_line};
pub use strategy::{Difficulty, StrategyError, choose_move};
pub use types::{Board, MoveError, Player, Square};
